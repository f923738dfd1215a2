#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};

use tenant_console::client::{SessionStore, TenantSession};
use tenant_console::config::AppConfig;
use tenant_console::models::{Tenant, TenantDraft};
use tenant_console::server::{self, issue_token, AppState, TenantStore, UserRecord};

pub const SECRET: &str = "integration-test-secret";

/// API served in-process on a free port for the lifetime of one test runtime.
///
/// Seeded with: "Default Tenant" (admin's), "Acme" (alice's) and "Other"
/// (nobody's), plus `bob` who has no tenant at all.
pub struct TestServer {
    pub base_url: String,
    pub api_url: String,
    pub state: AppState,
    pub admin: UserRecord,
    pub member: UserRecord,
    pub orphan: UserRecord,
    pub default_tenant: Tenant,
    pub acme: Tenant,
    pub other: Tenant,
}

pub async fn start() -> Result<TestServer> {
    let config = AppConfig::from_env();

    let mut store = TenantStore::new();
    let admin = store
        .seed_defaults("admin")
        .map_err(|e| anyhow::anyhow!("seed failed: {}", e))?;
    let default_tenant = store
        .find(admin.tenant_id.context("admin has no tenant")?)
        .cloned()
        .context("default tenant missing")?;
    let acme = store
        .create(&TenantDraft::new("Acme", "acme"))
        .map_err(|e| anyhow::anyhow!("create failed: {}", e))?;
    let other = store
        .create(&TenantDraft::new("Other", "other"))
        .map_err(|e| anyhow::anyhow!("create failed: {}", e))?;
    let member = store.insert_user("alice", false, Some(acme.id));
    let orphan = store.insert_user("bob", false, None);

    let state = AppState::with_secret(store, &config, SECRET);

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    let app = server::app(state.clone(), &config);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    let base_url = format!("http://127.0.0.1:{}", port);
    Ok(TestServer {
        api_url: format!("{}/api/", base_url),
        base_url,
        state,
        admin,
        member,
        orphan,
        default_tenant,
        acme,
        other,
    })
}

impl TestServer {
    pub fn token(&self, user: &UserRecord) -> String {
        issue_token(&self.state, user).expect("token")
    }

    pub fn admin_token(&self) -> String {
        self.token(&self.admin)
    }

    pub fn member_token(&self) -> String {
        self.token(&self.member)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Client session for `user`, restored from `store`.
    pub async fn session(&self, user: &UserRecord, store: Arc<dyn SessionStore>) -> Result<TenantSession> {
        let session = TenantSession::connect(&self.api_url, Some(&self.token(user)), store)?;
        session.context.restored().await;
        Ok(session)
    }

    pub async fn live_tenant_count(&self) -> usize {
        self.state.store.read().await.list(&Default::default()).len()
    }
}
