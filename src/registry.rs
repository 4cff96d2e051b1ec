use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::KeyResolver;
use crate::service::Service;
use crate::table::RowsPerPage;

/// Everything a service needs at construction time.
#[derive(Clone)]
pub struct ServiceContext {
    pub api: ApiClient,
    pub resolver: Arc<KeyResolver>,
    pub rows_per_page: RowsPerPage,
}

/// Entry of the resource picker.
///
/// Implement this to make a screen selectable from the start page and
/// through `--resource`.
pub trait ServiceProvider: Send + Sync {
    /// Unique key, e.g. "careers". Used on the command line.
    fn key(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    fn icon(&self) -> Option<&'static str> {
        None
    }

    fn create_service(&self, ctx: &ServiceContext) -> Box<dyn Service>;
}

/// Ordered set of providers, keyed by [`ServiceProvider::key`].
#[derive(Default)]
pub struct ServiceRegistry {
    providers: Vec<Arc<dyn ServiceProvider>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any existing one with the same key
    /// in place.
    pub fn register<P: ServiceProvider + 'static>(&mut self, provider: P) {
        let provider: Arc<dyn ServiceProvider> = Arc::new(provider);
        match self.providers.iter_mut().find(|p| p.key() == provider.key()) {
            Some(existing) => *existing = provider,
            None => self.providers.push(provider),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ServiceProvider>> {
        self.providers
            .iter()
            .find(|p| p.key().eq_ignore_ascii_case(key))
            .cloned()
    }

    pub fn all(&self) -> Vec<Arc<dyn ServiceProvider>> {
        self.providers.clone()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;
    use ratatui::Frame;
    use ratatui::layout::Rect;

    use super::*;
    use crate::Theme;
    use crate::service::ServiceMsg;
    use crate::ui::EventResult;

    struct MockProvider {
        key: &'static str,
        name: &'static str,
    }

    impl ServiceProvider for MockProvider {
        fn key(&self) -> &'static str {
            self.key
        }

        fn display_name(&self) -> &'static str {
            self.name
        }

        fn create_service(&self, _ctx: &ServiceContext) -> Box<dyn Service> {
            Box::new(MockService)
        }
    }

    struct MockService;

    impl Service for MockService {
        fn handle_key(&mut self, _key: KeyEvent) -> EventResult<()> {
            EventResult::Ignored
        }

        fn update(&mut self) -> color_eyre::Result<ServiceMsg> {
            Ok(ServiceMsg::Idle)
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn breadcrumbs(&self) -> Vec<String> {
            vec!["Mock".to_string()]
        }
    }

    #[test]
    fn test_register_keeps_order_and_replaces_by_key() {
        let mut registry = ServiceRegistry::new();
        registry.register(MockProvider {
            key: "users",
            name: "Users",
        });
        registry.register(MockProvider {
            key: "careers",
            name: "Careers",
        });
        registry.register(MockProvider {
            key: "users",
            name: "Accounts",
        });

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.keys(), vec!["users", "careers"]);
        assert_eq!(registry.get("users").unwrap().display_name(), "Accounts");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = ServiceRegistry::new();
        registry.register(MockProvider {
            key: "careers",
            name: "Careers",
        });
        assert!(registry.get("Careers").is_some());
        assert!(registry.get("jobs").is_none());
        assert!(!registry.is_empty());
    }
}
