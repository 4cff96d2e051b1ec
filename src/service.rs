use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, ListItem};

use crate::Theme;
use crate::commands::Command;
use crate::config::{KeyResolver, SearchAction};
use crate::registry::{ServiceProvider, ServiceRegistry};
use crate::search::Matcher;
use crate::ui::{
    Component, EventResult, Keybinding, List, ListEvent, ListRow, TextInput, TextInputEvent,
};

pub enum ServiceMsg {
    /// No action needed
    Idle,
    /// Run one or more commands
    Run(Vec<Box<dyn Command>>),
    /// Push a nested service on top of this one
    Open(Box<dyn Service>),
    /// Close this service and return to the previous screen
    Close,
}

impl<T: Command> From<T> for ServiceMsg {
    fn from(value: T) -> Self {
        Self::Run(vec![Box::new(value)])
    }
}

/// A resource screen.
///
/// Services own their state and a message queue. The App calls:
///
/// 1. `init()` once when the service becomes active
/// 2. `update()` right after init to process startup messages
/// 3. For each event:
///    - `handle_tick()` on ticks
///    - `handle_key()` on input, then `update()` if consumed
/// 4. `update()` whenever a command completes
/// 5. `destroy()` when the service is closed
pub trait Service {
    fn init(&mut self) {}

    fn destroy(&mut self) {}

    fn handle_tick(&mut self) {}

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()>;

    /// Process queued messages.
    ///
    /// # Errors
    /// An error is shown in the error dialog; the service stays open.
    fn update(&mut self) -> Result<ServiceMsg>;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Breadcrumb segments for the header.
    fn breadcrumbs(&self) -> Vec<String>;

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}

#[derive(Clone)]
struct ResourceItem {
    provider: Arc<dyn ServiceProvider>,
}

impl ListRow for ResourceItem {
    fn render_row(&self, theme: &Theme) -> ListItem<'static> {
        let name = self.provider.icon().map_or_else(
            || self.provider.display_name().to_string(),
            |icon| format!("{icon} {}", self.provider.display_name()),
        );
        ListItem::new(Line::from(vec![
            Span::styled(
                format!("{name:<18}"),
                Style::default()
                    .fg(theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                self.provider.description(),
                Style::default().fg(theme.subtext0()),
            ),
        ]))
    }
}

/// Start page: pick a resource by arrow keys or by fuzzy search.
pub struct ResourceSelector {
    all: Vec<ResourceItem>,
    list: List<ResourceItem>,
    query: TextInput,
    searching: bool,
    matcher: Matcher,
    resolver: Arc<KeyResolver>,
}

impl ResourceSelector {
    pub fn new(registry: &ServiceRegistry, resolver: Arc<KeyResolver>) -> Self {
        let all: Vec<ResourceItem> = registry
            .all()
            .into_iter()
            .map(|provider| ResourceItem { provider })
            .collect();
        Self {
            list: List::new(all.clone(), resolver.clone()),
            all,
            query: TextInput::new("Find resource").with_placeholder("type a name"),
            searching: false,
            matcher: Matcher::new(),
            resolver,
        }
    }

    fn apply_query(&mut self) {
        let ranked = self.matcher.rank(self.all.clone(), self.query.value(), |item| {
            vec![
                item.provider.display_name(),
                item.provider.key(),
                item.provider.description(),
            ]
        });
        self.list.set_items(ranked);
    }

    pub fn selected_key(&self) -> Option<&'static str> {
        self.list.selected().map(|item| item.provider.key())
    }

    pub fn keybindings(&self) -> Vec<Keybinding> {
        vec![Keybinding::hint(
            self.resolver.display_search(SearchAction::Toggle),
            "Find",
        )]
    }
}

impl Component for ResourceSelector {
    /// Key of the chosen provider.
    type Output = &'static str;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.searching {
            return Ok(match self.query.handle_key(key)? {
                EventResult::Event(TextInputEvent::Submitted(_)) => {
                    self.searching = false;
                    self.selected_key().map_or(EventResult::Consumed, EventResult::Event)
                }
                EventResult::Event(TextInputEvent::Cancelled) => {
                    self.searching = false;
                    self.query.set_value("");
                    self.apply_query();
                    EventResult::Consumed
                }
                EventResult::Consumed => {
                    self.apply_query();
                    EventResult::Consumed
                }
                EventResult::Ignored => {
                    // Arrow keys still move the highlight while typing.
                    self.list.handle_key(key)?;
                    EventResult::Consumed
                }
            });
        }

        if self.resolver.matches_search(&key, SearchAction::Toggle) {
            self.searching = true;
            return Ok(EventResult::Consumed);
        }

        Ok(match self.list.handle_key(key)? {
            EventResult::Event(ListEvent::Activated(item)) => item.provider.key().into(),
            EventResult::Event(ListEvent::Changed(_)) | EventResult::Consumed => {
                EventResult::Consumed
            }
            EventResult::Ignored => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let show_query = self.searching || !self.query.value().is_empty();
        let [list_area, query_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(if show_query { 3 } else { 0 }),
        ])
        .areas(area);

        let block = Block::default()
            .title(" Resources ")
            .title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()));
        let inner = block.inner(list_area);
        frame.render_widget(block, list_area);
        self.list.render(frame, inner, theme);

        if show_query {
            self.query.set_focused(self.searching);
            self.query.render(frame, query_area, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::registry::ServiceContext;
    use crate::ui::testing::{chars, key};

    struct Named(&'static str, &'static str);

    impl ServiceProvider for Named {
        fn key(&self) -> &'static str {
            self.0
        }

        fn display_name(&self) -> &'static str {
            self.1
        }

        fn create_service(&self, _ctx: &ServiceContext) -> Box<dyn Service> {
            unreachable!("not opened in selector tests")
        }
    }

    fn selector() -> ResourceSelector {
        let mut registry = ServiceRegistry::new();
        registry.register(Named("articles", "Articles"));
        registry.register(Named("careers", "Careers"));
        registry.register(Named("partners", "Partners"));
        ResourceSelector::new(&registry, Arc::new(KeyResolver::default()))
    }

    #[test]
    fn test_enter_selects_highlighted_resource() {
        let mut selector = selector();
        selector.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(
            selector.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event("careers")
        );
    }

    #[test]
    fn test_query_narrows_and_submits() {
        let mut selector = selector();
        selector.handle_key(key(KeyCode::Char('/'))).unwrap();
        for k in chars("prt") {
            selector.handle_key(k).unwrap();
        }
        assert_eq!(selector.list.items().len(), 1);
        assert_eq!(
            selector.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event("partners")
        );
    }

    #[test]
    fn test_cancel_restores_full_list() {
        let mut selector = selector();
        selector.handle_key(key(KeyCode::Char('/'))).unwrap();
        for k in chars("car") {
            selector.handle_key(k).unwrap();
        }
        selector.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(selector.list.items().len(), 3);
        assert!(!selector.searching);
    }

    #[test]
    fn test_unknown_keys_bubble_up() {
        let mut selector = selector();
        assert_eq!(
            selector.handle_key(key(KeyCode::Char('q'))).unwrap(),
            EventResult::Ignored
        );
    }
}
