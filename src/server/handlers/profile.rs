// server/handlers/profile.rs - Caller-scoped profile and tenant lookups

use axum::{
    extract::{Extension, Path, State},
    response::Json,
};

use crate::error::{ApiError, ApiResult};
use crate::models::{CurrentUser, Tenant};
use crate::server::auth::AuthUser;
use crate::server::state::AppState;
use crate::server::tenant_context::RequestTenant;

/// GET /api/profile/
pub async fn profile(Extension(auth_user): Extension<AuthUser>) -> Json<CurrentUser> {
    Json(CurrentUser {
        id: auth_user.id,
        username: auth_user.username,
        is_superuser: auth_user.is_superuser,
    })
}

/// GET /api/profile/tenant/
pub async fn profile_tenant(
    Extension(RequestTenant(tenant)): Extension<RequestTenant>,
) -> ApiResult<Json<Tenant>> {
    tenant
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No tenant association found."))
}

/// GET /api/users/:id/tenants/
pub async fn user_tenants(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<Tenant>>> {
    if auth_user.id != user_id && !auth_user.is_superuser {
        return Err(ApiError::forbidden("You can only view your own tenants."));
    }

    let store = state.store.read().await;
    let user = store.user(user_id).ok_or_else(|| ApiError::not_found("Not found."))?;
    let tenants = user
        .tenant_id
        .and_then(|id| store.find(id))
        .filter(|t| !t.is_deleted())
        .cloned()
        .into_iter()
        .collect();

    Ok(Json(tenants))
}
