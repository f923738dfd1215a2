use reqwest::header::HeaderValue;
use reqwest::Request;

use super::context::TenantContext;
use super::http::RequestInterceptor;

/// `X-Tenant-ID`, in the lowercase form header maps require.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Stamps `X-Tenant-ID` with the current tenant id, read at the moment the
/// request is prepared. Requests pass through untouched when no tenant is set.
#[derive(Clone)]
pub struct TenantInterceptor {
    context: TenantContext,
}

impl TenantInterceptor {
    pub fn new(context: TenantContext) -> Self {
        Self { context }
    }
}

impl RequestInterceptor for TenantInterceptor {
    fn intercept(&self, mut request: Request) -> Request {
        if let Some(tenant_id) = self.context.current_tenant_id() {
            request
                .headers_mut()
                .insert(TENANT_HEADER, HeaderValue::from(tenant_id));
        }
        request
    }
}
