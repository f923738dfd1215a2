// server/handlers/tenants/show.rs - GET /api/tenants/:id/ handler

use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::models::Tenant;
use crate::server::auth::AuthUser;
use crate::server::state::AppState;

/// Tenant plus the number of users associated with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantDetail {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub user_count: usize,
}

pub async fn tenant_show(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TenantDetail>> {
    auth_user.require_superuser()?;

    let store = state.store.read().await;
    let tenant = store.live(id)?.clone();
    let user_count = store.user_count(id);

    Ok(Json(TenantDetail { tenant, user_count }))
}
