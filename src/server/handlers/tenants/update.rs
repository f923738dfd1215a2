// server/handlers/tenants/update.rs - PATCH /api/tenants/:id/ handler

use axum::{
    extract::{Extension, Path, State},
    response::Json,
};

use crate::error::ApiResult;
use crate::models::{Tenant, TenantDraft};
use crate::server::auth::AuthUser;
use crate::server::state::AppState;

pub async fn tenant_update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(draft): Json<TenantDraft>,
) -> ApiResult<Json<Tenant>> {
    auth_user.require_superuser()?;

    let tenant = state.store.write().await.update(id, &draft)?;
    tracing::info!("Tenant {} updated by {}", tenant.id, auth_user.username);

    Ok(Json(tenant))
}
