use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::client::{ClientError, ListQuery, TenantApi};
use crate::models::{CurrentUser, Page, Tenant, TenantDraft};

/// Active tenant with no timestamps.
pub fn tenant(id: i64, name: &str, identifier: &str) -> Tenant {
    Tenant {
        id,
        name: name.to_string(),
        identifier: identifier.to_string(),
        is_active: true,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    }
}

/// In-memory [`TenantApi`] that records every call it receives.
#[derive(Default)]
pub struct FakeTenantApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    tenants: BTreeMap<i64, Tenant>,
    user_tenant: Option<Tenant>,
    user: Option<CurrentUser>,
    calls: Vec<String>,
    failure: Option<(u16, Value)>,
    delay: Option<Duration>,
}

impl FakeTenantApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_tenant(tenant: Tenant) -> Self {
        let api = Self::new();
        api.lock().user_tenant = Some(tenant);
        api
    }

    pub fn with_tenants(tenants: Vec<Tenant>) -> Self {
        let api = Self::new();
        api.lock().tenants = tenants.into_iter().map(|t| (t.id, t)).collect();
        api
    }

    pub fn with_user(self, user: CurrentUser) -> Self {
        self.lock().user = Some(user);
        self
    }

    /// Every call fails with this status and payload.
    pub fn failing(self, status: u16, body: Value) -> Self {
        self.lock().failure = Some((status, body));
        self
    }

    /// Every call sleeps before answering.
    pub fn delayed(self, delay: Duration) -> Self {
        self.lock().delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn tenant(&self, id: i64) -> Option<Tenant> {
        self.lock().tenants.get(&id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state poisoned")
    }

    async fn record(&self, call: String) -> Result<(), ClientError> {
        let (delay, failure) = {
            let mut state = self.lock();
            state.calls.push(call);
            (state.delay, state.failure.clone())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some((status, body)) => Err(ClientError::Api { status, body }),
            None => Ok(()),
        }
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: 404,
            body: json!({"detail": "No Tenant matches the given query."}),
        }
    }

    fn live(&self, id: i64) -> Result<Tenant, ClientError> {
        self.lock()
            .tenants
            .get(&id)
            .filter(|t| !t.is_deleted())
            .cloned()
            .ok_or_else(Self::not_found)
    }

    fn modify(&self, id: i64, change: impl FnOnce(&mut Tenant)) -> Result<Tenant, ClientError> {
        let mut state = self.lock();
        let tenant = state
            .tenants
            .get_mut(&id)
            .filter(|t| !t.is_deleted())
            .ok_or_else(Self::not_found)?;
        change(tenant);
        tenant.updated_at = Some(Utc::now());
        Ok(tenant.clone())
    }
}

#[async_trait]
impl TenantApi for FakeTenantApi {
    async fn get_current_user_tenant(&self) -> Result<Tenant, ClientError> {
        self.record("get_current_user_tenant".into()).await?;
        self.lock().user_tenant.clone().ok_or_else(|| ClientError::Api {
            status: 404,
            body: json!({"detail": "No tenant association found."}),
        })
    }

    async fn get_user_tenants(&self, user_id: i64) -> Result<Vec<Tenant>, ClientError> {
        self.record(format!("get_user_tenants {}", user_id)).await?;
        Ok(self.lock().user_tenant.clone().into_iter().collect())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Tenant>, ClientError> {
        self.record(format!("list page={}", query.page.unwrap_or(1))).await?;

        let search = query.search.as_deref().unwrap_or("").to_lowercase();
        let mut matching: Vec<Tenant> = self
            .lock()
            .tenants
            .values()
            .filter(|t| !t.is_deleted())
            .filter(|t| query.is_active.map_or(true, |a| t.is_active == a))
            .filter(|t| {
                search.is_empty()
                    || t.name.to_lowercase().contains(&search)
                    || t.identifier.to_lowercase().contains(&search)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        let page = query.page.unwrap_or(1).max(1) as usize;
        let page_size = query.page_size.unwrap_or(25).max(1) as usize;
        let count = matching.len() as u64;
        let results = matching
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        Ok(Page {
            count,
            next: None,
            previous: None,
            results,
        })
    }

    async fn get(&self, id: i64) -> Result<Tenant, ClientError> {
        self.record(format!("get {}", id)).await?;
        self.live(id)
    }

    async fn create(&self, draft: &TenantDraft) -> Result<Tenant, ClientError> {
        self.record("create".into()).await?;
        let mut state = self.lock();
        let id = state.tenants.keys().max().copied().unwrap_or(0) + 1;
        let tenant = Tenant {
            id,
            name: draft.name.clone().unwrap_or_default(),
            identifier: draft.identifier.clone().unwrap_or_default(),
            is_active: draft.is_active.unwrap_or(true),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
            deleted_at: None,
        };
        state.tenants.insert(id, tenant.clone());
        Ok(tenant)
    }

    async fn update(&self, id: i64, draft: &TenantDraft) -> Result<Tenant, ClientError> {
        self.record(format!("update {}", id)).await?;
        self.modify(id, |t| {
            if let Some(name) = &draft.name {
                t.name = name.clone();
            }
            if let Some(identifier) = &draft.identifier {
                t.identifier = identifier.clone();
            }
            if let Some(is_active) = draft.is_active {
                t.is_active = is_active;
            }
        })
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.record(format!("delete {}", id)).await?;
        self.modify(id, |t| {
            t.deleted_at = Some(Utc::now());
            t.is_active = false;
        })
        .map(|_| ())
    }

    async fn activate(&self, id: i64) -> Result<Tenant, ClientError> {
        self.record(format!("activate {}", id)).await?;
        self.modify(id, |t| t.is_active = true)
    }

    async fn deactivate(&self, id: i64) -> Result<Tenant, ClientError> {
        self.record(format!("deactivate {}", id)).await?;
        self.modify(id, |t| t.is_active = false)
    }

    async fn hard_delete(&self, id: i64) -> Result<(), ClientError> {
        self.record(format!("hard_delete {}", id)).await?;
        self.lock()
            .tenants
            .remove(&id)
            .map(|_| ())
            .ok_or_else(Self::not_found)
    }

    async fn current_user(&self) -> Result<CurrentUser, ClientError> {
        self.record("current_user".into()).await?;
        self.lock().user.clone().ok_or_else(|| ClientError::Api {
            status: 401,
            body: json!({"detail": "Authentication credentials were not provided."}),
        })
    }
}
