use async_trait::async_trait;
use serde_json::json;

use super::error::ClientError;
use super::http::ApiClient;
use crate::models::{CurrentUser, Page, Tenant, TenantDraft};

const ENDPOINT: &str = "tenants";

/// Filters for `GET tenants/`. Unset (or zero/empty) values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl ListQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size.filter(|p| *p > 0) {
            pairs.push(("page_size", page_size.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(is_active) = self.is_active {
            pairs.push(("is_active", is_active.to_string()));
        }
        pairs
    }
}

/// Tenant REST operations. Each call maps to exactly one HTTP request.
#[async_trait]
pub trait TenantApi: Send + Sync {
    /// `GET profile/tenant/`
    async fn get_current_user_tenant(&self) -> Result<Tenant, ClientError>;
    /// `GET users/{id}/tenants/`
    async fn get_user_tenants(&self, user_id: i64) -> Result<Vec<Tenant>, ClientError>;
    /// `GET tenants/?page=&page_size=&search=&is_active=`
    async fn list(&self, query: &ListQuery) -> Result<Page<Tenant>, ClientError>;
    async fn get(&self, id: i64) -> Result<Tenant, ClientError>;
    async fn create(&self, draft: &TenantDraft) -> Result<Tenant, ClientError>;
    async fn update(&self, id: i64, draft: &TenantDraft) -> Result<Tenant, ClientError>;
    /// Soft delete.
    async fn delete(&self, id: i64) -> Result<(), ClientError>;
    async fn activate(&self, id: i64) -> Result<Tenant, ClientError>;
    async fn deactivate(&self, id: i64) -> Result<Tenant, ClientError>;
    /// Permanent removal.
    async fn hard_delete(&self, id: i64) -> Result<(), ClientError>;
    /// `GET profile/`
    async fn current_user(&self) -> Result<CurrentUser, ClientError>;
}

#[derive(Clone)]
pub struct TenantService {
    client: ApiClient,
}

impl TenantService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl TenantApi for TenantService {
    async fn get_current_user_tenant(&self) -> Result<Tenant, ClientError> {
        self.client.get("profile/tenant/").await
    }

    async fn get_user_tenants(&self, user_id: i64) -> Result<Vec<Tenant>, ClientError> {
        self.client.get(&format!("users/{}/tenants/", user_id)).await
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Tenant>, ClientError> {
        self.client
            .get_with_query(&format!("{}/", ENDPOINT), &query.to_pairs())
            .await
    }

    async fn get(&self, id: i64) -> Result<Tenant, ClientError> {
        self.client.get(&format!("{}/{}/", ENDPOINT, id)).await
    }

    async fn create(&self, draft: &TenantDraft) -> Result<Tenant, ClientError> {
        self.client.post(&format!("{}/", ENDPOINT), draft).await
    }

    async fn update(&self, id: i64, draft: &TenantDraft) -> Result<Tenant, ClientError> {
        self.client.patch(&format!("{}/{}/", ENDPOINT, id), draft).await
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.client.delete(&format!("{}/{}/", ENDPOINT, id)).await
    }

    async fn activate(&self, id: i64) -> Result<Tenant, ClientError> {
        self.client
            .post(&format!("{}/{}/activate/", ENDPOINT, id), &json!({}))
            .await
    }

    async fn deactivate(&self, id: i64) -> Result<Tenant, ClientError> {
        self.client
            .post(&format!("{}/{}/deactivate/", ENDPOINT, id), &json!({}))
            .await
    }

    async fn hard_delete(&self, id: i64) -> Result<(), ClientError> {
        self.client
            .post_empty(&format!("{}/{}/hard-delete/", ENDPOINT, id))
            .await
    }

    async fn current_user(&self) -> Result<CurrentUser, ClientError> {
        self.client.get("profile/").await
    }
}
