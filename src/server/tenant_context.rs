use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use super::state::AppState;
use crate::client::TENANT_HEADER;
use crate::error::ApiError;
use crate::models::Tenant;

/// Tenant the request acts as; `None` only for superusers without an association.
#[derive(Clone, Debug)]
pub struct RequestTenant(pub Option<Tenant>);

/// Resolve the request's tenant from the `X-Tenant-ID` header, falling back
/// to the caller's own association. Must run after the JWT middleware.
pub async fn resolve_tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before tenant resolution"))?;

    let header = match request.headers().get(TENANT_HEADER) {
        Some(value) => Some(
            value
                .to_str()
                .map(|s| s.trim().to_string())
                .map_err(|_| ApiError::bad_request("Invalid tenant ID format."))?,
        ),
        None => None,
    };

    let tenant = {
        let store = state.store.read().await;
        match header.as_deref() {
            Some(raw) if !raw.is_empty() => {
                let tenant_id: i64 = raw.parse().map_err(|_| {
                    tracing::warn!("Invalid tenant ID format in header: {}", raw);
                    ApiError::bad_request("Invalid tenant ID format.")
                })?;

                let tenant = store
                    .find(tenant_id)
                    .filter(|t| t.is_usable())
                    .cloned()
                    .ok_or_else(|| {
                        tracing::warn!("Invalid tenant ID in header: {}", tenant_id);
                        ApiError::bad_request("Invalid tenant ID.")
                    })?;

                if let Some(own) = auth_user.tenant_id {
                    if own != tenant.id {
                        tracing::warn!(
                            "Tenant ID mismatch: user {} has tenant {}, but header specifies {}",
                            auth_user.id,
                            own,
                            tenant.id
                        );
                        return Err(ApiError::forbidden(
                            "Tenant ID in header does not match your tenant association.",
                        ));
                    }
                }

                tracing::debug!("Tenant context set from header: {} for user {}", tenant.id, auth_user.id);
                Some(tenant)
            }
            _ => match auth_user.tenant_id.and_then(|id| store.find(id)) {
                Some(tenant) if tenant.is_usable() => {
                    tracing::debug!("Tenant context set from user: {} for user {}", tenant.id, auth_user.id);
                    Some(tenant.clone())
                }
                Some(tenant) => {
                    tracing::warn!(
                        "User {} has inactive tenant: {} (is_active={}, deleted={})",
                        auth_user.id,
                        tenant.id,
                        tenant.is_active,
                        tenant.is_deleted()
                    );
                    return Err(ApiError::forbidden("Your tenant account is inactive."));
                }
                None if auth_user.is_superuser => None,
                None => {
                    tracing::warn!(
                        "User {} ({}) has no tenant association - access denied",
                        auth_user.id,
                        auth_user.username
                    );
                    return Err(ApiError::forbidden(
                        "No tenant association found. Please contact your administrator.",
                    ));
                }
            },
        }
    };

    request.extensions_mut().insert(RequestTenant(tenant));
    Ok(next.run(request).await)
}
