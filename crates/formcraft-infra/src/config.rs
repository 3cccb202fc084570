//! Global configuration loader for formcraft.
//!
//! Reads `config.toml` from the data directory (`~/.formcraft/` by default)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use formcraft_types::config::GlobalConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FORMCRAFT_DATA_DIR";

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "FORMCRAFT_API_URL";

/// Resolve the data directory.
///
/// Priority:
/// 1. `FORMCRAFT_DATA_DIR` environment variable
/// 2. `~/.formcraft`
/// 3. `.formcraft` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".formcraft");
    }

    PathBuf::from(".formcraft")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or unparsable file: logs a warning, returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Apply an explicit API URL override (from `FORMCRAFT_API_URL` or a CLI flag).
pub fn with_api_url(mut config: GlobalConfig, api_url: Option<String>) -> GlobalConfig {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        config.api_base_url = url;
    }
    config
}
