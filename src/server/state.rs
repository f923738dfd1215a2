use std::sync::Arc;

use tokio::sync::RwLock;

use super::store::TenantStore;
use crate::config::{AppConfig, PaginationConfig};

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<TenantStore>>,
    pub jwt_secret: Arc<str>,
    pub jwt_expiry_hours: u64,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(store: TenantStore, config: &AppConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            jwt_secret: Arc::from(config.security.jwt_secret.as_str()),
            jwt_expiry_hours: config.security.jwt_expiry_hours,
            pagination: config.pagination.clone(),
        }
    }

    /// Same as [`AppState::new`] with a fixed signing secret.
    pub fn with_secret(store: TenantStore, config: &AppConfig, secret: &str) -> Self {
        Self {
            jwt_secret: Arc::from(secret),
            ..Self::new(store, config)
        }
    }
}
