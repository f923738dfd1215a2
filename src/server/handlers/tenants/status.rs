// server/handlers/tenants/status.rs - POST /api/tenants/:id/{activate,deactivate}/ handlers

use axum::{
    extract::{Extension, Path, State},
    response::Json,
};

use crate::error::ApiResult;
use crate::models::Tenant;
use crate::server::auth::AuthUser;
use crate::server::state::AppState;

pub async fn tenant_activate(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Tenant>> {
    set_active(state, auth_user, id, true).await
}

pub async fn tenant_deactivate(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Tenant>> {
    set_active(state, auth_user, id, false).await
}

async fn set_active(
    state: AppState,
    auth_user: AuthUser,
    id: i64,
    is_active: bool,
) -> ApiResult<Json<Tenant>> {
    auth_user.require_superuser()?;

    let tenant = state.store.write().await.set_active(id, is_active)?;
    tracing::info!(
        "Tenant {} {} by {}",
        tenant.id,
        if is_active { "activated" } else { "deactivated" },
        auth_user.username
    );

    Ok(Json(tenant))
}
