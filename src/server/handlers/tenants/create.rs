// server/handlers/tenants/create.rs - POST /api/tenants/ handler

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
};

use crate::error::ApiResult;
use crate::models::{Tenant, TenantDraft};
use crate::server::auth::AuthUser;
use crate::server::state::AppState;

pub async fn tenant_create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(draft): Json<TenantDraft>,
) -> ApiResult<(StatusCode, Json<Tenant>)> {
    auth_user.require_superuser()?;

    let tenant = state.store.write().await.create(&draft)?;
    tracing::info!("Tenant {} ({}) created by {}", tenant.id, tenant.identifier, auth_user.username);

    Ok((StatusCode::CREATED, Json(tenant)))
}
