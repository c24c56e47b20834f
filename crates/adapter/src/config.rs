//! Adapter configuration from environment variables

use std::env;
use std::path::PathBuf;

pub const DEFAULT_HISTORY_PATH: &str = "match_history.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// JSON file holding the match history
    pub history_path: PathBuf,
    /// Save completed matches to history
    pub save_enabled: bool,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            save_enabled: true,
            log_json: false,
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

impl AdapterConfig {
    /// Read `CRICKET_SCORER_HISTORY`, `CRICKET_SCORER_SAVE_DISABLED` and
    /// `CRICKET_SCORER_LOG_JSON`.
    pub fn from_env() -> Self {
        let history_path = env::var("CRICKET_SCORER_HISTORY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH));

        Self {
            history_path,
            save_enabled: !env_flag("CRICKET_SCORER_SAVE_DISABLED"),
            log_json: env_flag("CRICKET_SCORER_LOG_JSON"),
        }
    }
}
