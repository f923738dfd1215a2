// server/handlers/tenants/delete.rs - DELETE /api/tenants/:id/ and POST /api/tenants/:id/hard-delete/

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
};

use crate::error::ApiResult;
use crate::server::auth::AuthUser;
use crate::server::state::AppState;

/// Soft delete: the tenant is hidden and deactivated, its identifier stays reserved.
pub async fn tenant_delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    auth_user.require_superuser()?;

    state.store.write().await.soft_delete(id)?;
    tracing::info!("Tenant {} soft-deleted by {}", id, auth_user.username);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn tenant_hard_delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    auth_user.require_superuser()?;

    state.store.write().await.hard_delete(id)?;
    tracing::warn!("Tenant {} permanently deleted by {}", id, auth_user.username);

    Ok(StatusCode::NO_CONTENT)
}
