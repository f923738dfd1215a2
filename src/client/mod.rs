//! Client side of tenant management: REST wrapper, tenant context and the
//! request interceptor that propagates it.

pub mod context;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod service;
pub mod store;

use std::sync::Arc;

pub use context::{TenantContext, TenantContextService, STORAGE_KEY};
pub use error::{first_error_message, ClientError};
pub use http::{ApiClient, BearerAuth, RequestInterceptor};
pub use interceptor::{TenantInterceptor, TENANT_HEADER};
pub use service::{ListQuery, TenantApi, TenantService};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};

/// Everything one client session needs, wired together.
#[derive(Clone)]
pub struct TenantSession {
    pub api: Arc<dyn TenantApi>,
    pub context: TenantContextService,
}

impl TenantSession {
    /// Build a session against `base_url`. The HTTP client carries the
    /// bearer token (if any) and the tenant interceptor bound to this
    /// session's context. Must be called inside a tokio runtime for the
    /// stored tenant to be restored.
    pub fn connect(
        base_url: &str,
        token: Option<&str>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        let context = TenantContext::new(store);

        let mut builder = ApiClient::builder(base_url);
        if let Some(token) = token {
            builder = builder.interceptor(BearerAuth::new(token));
        }
        let client = builder
            .interceptor(TenantInterceptor::new(context.clone()))
            .build()?;

        let api: Arc<dyn TenantApi> = Arc::new(TenantService::new(client));
        let context = TenantContextService::new(context, api.clone());

        Ok(Self { api, context })
    }
}
