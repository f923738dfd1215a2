use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::{FileStore, SessionStore, TenantSession};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HOME environment variable not set")]
    NoHome,
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Connection settings kept in `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl CliConfig {
    /// Configured base URL, else the app config default.
    pub fn base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| crate::config::config().client.api_base_url.clone())
    }
}

pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = if let Ok(custom_dir) = std::env::var("TENANTCTL_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| ConfigError::NoHome)?;
        PathBuf::from(home).join(".config").join("tenantctl")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_config_from(dir: &Path) -> Result<CliConfig, ConfigError> {
    let config_file = dir.join("config.json");
    if !config_file.exists() {
        return Ok(CliConfig::default());
    }

    let content = fs::read_to_string(config_file)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_config_to(dir: &Path, config: &CliConfig) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(dir.join("config.json"), content)?;
    Ok(())
}

pub fn load_config() -> Result<CliConfig, ConfigError> {
    load_config_from(&get_config_dir()?)
}

pub fn save_config(config: &CliConfig) -> Result<(), ConfigError> {
    save_config_to(&get_config_dir()?, config)
}

/// Session store backing the tenant context between invocations.
pub fn session_store() -> Result<FileStore, ConfigError> {
    Ok(FileStore::new(get_config_dir()?.join("session.json")))
}

/// Connect with the saved base URL and token, then wait for the stored
/// tenant (if any) to be verified.
pub async fn open_session() -> anyhow::Result<TenantSession> {
    let config = load_config()?;
    let store: Arc<dyn SessionStore> = Arc::new(session_store()?);
    let session = TenantSession::connect(&config.base_url(), config.token.as_deref(), store)?;
    session.context.restored().await;
    Ok(session)
}
