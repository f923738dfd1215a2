// server/handlers/tenants/list.rs - GET /api/tenants/ handler

use axum::{
    extract::{Extension, Query, State},
    http::Uri,
    response::Json,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::{Page, Tenant};
use crate::server::auth::AuthUser;
use crate::server::state::AppState;
use crate::server::store::TenantFilter;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
    pub is_active: Option<String>,
}

impl ListParams {
    fn filter(&self) -> TenantFilter {
        TenantFilter {
            search: self.search.clone().filter(|s| !s.is_empty()),
            is_active: self.is_active.as_deref().map(|v| v.eq_ignore_ascii_case("true")),
        }
    }

    fn page_number(&self) -> ApiResult<u64> {
        match self.page.as_deref() {
            None | Some("") => Ok(1),
            Some("last") => Ok(u64::MAX),
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(invalid_page),
        }
    }

    fn page_size(&self, default: u32, max: u32) -> u64 {
        let size = self
            .page_size
            .as_deref()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(default);
        u64::from(size.min(max).max(1))
    }
}

fn invalid_page() -> ApiError {
    ApiError::not_found("Invalid page.")
}

pub async fn tenant_list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
    uri: Uri,
) -> ApiResult<Json<Page<Tenant>>> {
    auth_user.require_superuser()?;

    let tenants = state.store.read().await.list(&params.filter());
    let page_size = params.page_size(
        state.pagination.default_page_size,
        state.pagination.max_page_size,
    );

    let count = tenants.len() as u64;
    let last_page = count.div_ceil(page_size).max(1);
    let page = match params.page_number()? {
        u64::MAX => last_page,
        n if n > last_page => return Err(invalid_page()),
        n => n,
    };

    let results: Vec<Tenant> = tenants
        .into_iter()
        .skip(((page - 1) * page_size) as usize)
        .take(page_size as usize)
        .collect();

    let link = |target: u64| page_link(uri.path(), &params, target, page_size);
    Ok(Json(Page {
        count,
        next: (page < last_page).then(|| link(page + 1)),
        previous: (page > 1).then(|| link(page - 1)),
        results,
    }))
}

fn page_link(path: &str, params: &ListParams, page: u64, page_size: u64) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("page", &page.to_string());
    if params.page_size.is_some() {
        query.append_pair("page_size", &page_size.to_string());
    }
    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query.append_pair("search", search);
    }
    if let Some(is_active) = params.is_active.as_deref() {
        query.append_pair("is_active", is_active);
    }
    format!("{}?{}", path, query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_to_one_and_rejects_garbage() {
        assert_eq!(ListParams::default().page_number().unwrap(), 1);

        let zero = ListParams {
            page: Some("0".into()),
            ..Default::default()
        };
        assert!(zero.page_number().is_err());

        let word = ListParams {
            page: Some("abc".into()),
            ..Default::default()
        };
        assert!(word.page_number().is_err());
    }

    #[test]
    fn page_size_falls_back_and_clamps() {
        let params = ListParams {
            page_size: Some("500".into()),
            ..Default::default()
        };
        assert_eq!(params.page_size(25, 100), 100);
        assert_eq!(ListParams::default().page_size(25, 100), 25);
    }

    #[test]
    fn is_active_filter_is_true_only_for_true() {
        let params = ListParams {
            is_active: Some("False".into()),
            ..Default::default()
        };
        assert_eq!(params.filter().is_active, Some(false));
    }

    #[test]
    fn links_keep_filters() {
        let params = ListParams {
            search: Some("acme corp".into()),
            is_active: Some("true".into()),
            ..Default::default()
        };
        assert_eq!(
            page_link("/api/tenants/", &params, 2, 25),
            "/api/tenants/?page=2&search=acme+corp&is_active=true"
        );
    }
}
