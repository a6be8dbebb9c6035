use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::domain::language;
use crate::app::infrastructure::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Language of a fresh session when nothing is stored
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Quiet period before an edit becomes an undo snapshot
    #[serde(default = "default_history_debounce_ms")]
    pub history_debounce_ms: u64,

    #[serde(default = "default_restore_last_document")]
    pub restore_last_document: bool,

    /// Base of generated share links
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
}

fn default_language() -> String {
    language::DEFAULT_LANGUAGE.to_string()
}

fn default_history_debounce_ms() -> u64 {
    1000
}

fn default_restore_last_document() -> bool {
    true
}

fn default_share_base_url() -> String {
    "https://scriptpad.dev/".to_string()
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            history_debounce_ms: default_history_debounce_ms(),
            restore_last_document: default_restore_last_document(),
            share_base_url: default_share_base_url(),
        }
    }
}

impl EditorSettings {
    pub fn history_debounce(&self) -> Duration {
        Duration::from_millis(self.history_debounce_ms)
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                // Try to save defaults for next time
                let _ = default.save_to(path);
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if self.history_debounce_ms == 0 {
            return Err(AppError::Settings(
                "history debounce window must be positive".to_string(),
            ));
        }

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("scriptpad");
        path.push("settings.json");
        path
    }
}
