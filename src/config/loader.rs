use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "lazyadmin";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the config from an explicit path, or from the platform config dir.
///
/// A missing file yields the defaults; a malformed one is an error.
pub fn load(explicit: Option<&Path>) -> color_eyre::Result<AppConfig> {
    let path = match explicit.map(Path::to_path_buf).or_else(config_path) {
        Some(p) => p,
        None => {
            debug!("No config directory found, using defaults");
            return Ok(AppConfig::default());
        }
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> color_eyre::Result<AppConfig> {
    if !path.exists() {
        debug!(?path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .wrap_err_with(|| format!("Invalid config {}", path.display()))?;
    debug!(?path, "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::table::RowsPerPage;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.table.rows_per_page, RowsPerPage::Five);
        assert_eq!(config.theme.name, "Catppuccin Mocha");
    }

    #[test]
    fn test_partial_sections() {
        let file = write_config(
            r#"
            [api]
            base_url = "http://localhost:8000"
            token = "secret"

            [table]
            rows_per_page = 15

            [keybindings.records]
            delete = "x"
            "#,
        );
        let config = load_from(file.path()).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.table.rows_per_page, RowsPerPage::Fifteen);

        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(config.keybindings.records.delete.matches(&x));
        // untouched bindings keep their defaults
        let n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        assert!(config.keybindings.records.new.matches(&n));
    }

    #[test]
    fn test_invalid_rows_per_page_is_rejected() {
        let file = write_config("[table]\nrows_per_page = 7\n");
        let err = load_from(file.path()).unwrap_err();
        assert!(format!("{err:?}").contains("rows per page must be one of 5, 10 or 15"));
    }
}
