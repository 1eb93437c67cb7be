use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::balance::SetlistLimits;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults — the config file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Catalogue CSV path (used when the CLI gives no --catalog).
    pub catalog_path: Option<PathBuf>,
    /// Where accepted setlists are written (overridden by --output).
    pub output_path: Option<PathBuf>,
    /// Duration window and size caps for generated setlists.
    pub setlist: SetlistLimits,
}

impl AppConfig {
    /// Load config from `~/.config/setcraft/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match config_path {
            Some(path) if path.exists() => {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => {
                        match toml::from_str::<AppConfig>(&contents) {
                            Ok(config) => {
                                log::info!("Loaded config from {}", path.display());
                                config
                            }
                            Err(e) => {
                                log::warn!(
                                    "Failed to parse {}: {}. Using defaults.",
                                    path.display(),
                                    e
                                );
                                Self::default()
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!(
                            "Failed to read {}: {}. Using defaults.",
                            path.display(),
                            e
                        );
                        Self::default()
                    }
                }
            }
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Default output path when neither CLI nor config provides one.
pub fn default_output_path() -> PathBuf {
    PathBuf::from("setlist.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.catalog_path.is_none());
        assert!(config.output_path.is_none());
        assert_eq!(config.setlist.min_total_secs, 31200);
        assert_eq!(config.setlist.max_tracks, 16);
        assert_eq!(config.setlist.moderate_insert_index, 7);
    }

    #[test]
    fn test_partial_setlist_table_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            "catalog_path = \"data/catalogue.csv\"\n\n[setlist]\nmin_total_secs = 3120\n",
        )
        .unwrap();
        assert_eq!(
            config.catalog_path.as_deref(),
            Some(std::path::Path::new("data/catalogue.csv"))
        );
        assert_eq!(config.setlist.min_total_secs, 3120);
        assert_eq!(config.setlist.max_tracks, 16);
    }
}
