use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};
use tracing::warn;

use crate::state::{Theme, ThemeStore};

const APP_DIR: &str = "prompt-architect";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub api_key: Option<String>,

    /// File this config was loaded from and is saved back to
    #[serde(skip)]
    path: Option<PathBuf>,

    /// Set when the file on disk could not be read; saving would clobber it
    #[serde(skip)]
    read_only: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a session whose config file failed to load. Never saved.
    pub fn detached() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn is_detached(&self) -> bool {
        self.read_only
    }

    /// Load from the per-user config directory, or defaults if no file exists yet
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let config_content = fs::read_to_string(path)?;
            serde_json::from_str::<Config>(&config_content)
                .map_err(|e| anyhow!("Invalid config file {:?}: {}", path, e))?
        } else {
            Self::new()
        };
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        if self.read_only {
            return Err(anyhow!("config file could not be read at startup; leaving it untouched"));
        }

        let config_path = match &self.path {
            Some(path) => path.clone(),
            None => Self::get_config_path()?,
        };

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join(APP_DIR))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}

impl ThemeStore for Config {
    fn load_theme(&self) -> Option<Theme> {
        self.theme
    }

    fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = Some(theme);
        self.save().inspect_err(|e| warn!(error = %e, "failed to persist theme"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Session;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.theme, None);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_theme_persists_across_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::load_from(&path).unwrap();
        let mut session = Session::load(&config);
        session.toggle_theme(&mut config).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"theme\": \"dark\""));

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.load_theme(), Some(Theme::Dark));
    }

    #[test]
    fn test_theme_toggled_twice_is_persisted_as_original() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::load_from(&path).unwrap();
        let mut session = Session::load(&config);

        session.toggle_theme(&mut config).unwrap();
        session.toggle_theme(&mut config).unwrap();

        assert_eq!(session.theme, Theme::Light);
        assert_eq!(Config::load_from(&path).unwrap().theme, Some(Theme::Light));
    }

    #[test]
    fn test_keeps_api_key_when_saving_theme() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_key": "secret"}"#).unwrap();

        let mut config = Config::load_from(&path).unwrap();
        config.save_theme(Theme::Dark).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.api_key.as_deref(), Some("secret"));
        assert_eq!(reloaded.theme, Some(Theme::Dark));
    }

    #[test]
    fn test_unreadable_file_is_not_overwritten_on_toggle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let original = r#"{"theme": "Dark", "api_key": "secret"}"#;
        fs::write(&path, original).unwrap();

        let mut config = Config::load_from(&path).unwrap_or_else(|_| Config::detached());
        assert!(config.is_detached());

        let mut session = Session::load(&config);
        assert!(session.toggle_theme(&mut config).is_err());
        // The theme still flips for this session
        assert_eq!(session.theme, Theme::Dark);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_rejects_unknown_theme() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"theme": "sepia"}"#).unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
