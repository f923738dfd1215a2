use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::service::TenantApi;
use super::store::SessionStore;
use crate::models::Tenant;

/// Session-store key holding the selected tenant id as a string.
pub const STORAGE_KEY: &str = "paperless_current_tenant_id";

/// The single "current tenant" slot for a session.
///
/// The value is readable synchronously and observable through
/// [`TenantContext::subscribe`]; every write is mirrored into the session
/// store by id. Clones share the same slot.
#[derive(Clone)]
pub struct TenantContext {
    current: Arc<watch::Sender<Option<Tenant>>>,
    store: Arc<dyn SessionStore>,
}

impl TenantContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current: Arc::new(current),
            store,
        }
    }

    pub fn current_tenant(&self) -> Option<Tenant> {
        self.current.borrow().clone()
    }

    pub fn current_tenant_id(&self) -> Option<i64> {
        self.current.borrow().as_ref().map(|t| t.id)
    }

    /// Receiver that starts at the current value and sees every later change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Tenant>> {
        self.current.subscribe()
    }

    pub fn set_current_tenant(&self, tenant: Option<Tenant>) {
        let persisted = match &tenant {
            Some(t) => self.store.set(STORAGE_KEY, &t.id.to_string()),
            None => self.store.remove(STORAGE_KEY),
        };
        if let Err(e) = persisted {
            tracing::warn!("Failed to mirror tenant context into session store: {}", e);
        }

        match &tenant {
            Some(t) => tracing::debug!("Current tenant set to {} ({})", t.id, t.identifier),
            None => tracing::debug!("Current tenant cleared"),
        }
        self.current.send_replace(tenant);
    }

    pub fn clear_tenant(&self) {
        self.set_current_tenant(None);
    }

    /// Tenant id found in the session store, if it parses as an integer.
    pub fn stored_tenant_id(&self) -> Option<i64> {
        match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw.trim().parse().ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read tenant id from session store: {}", e);
                None
            }
        }
    }

    /// Remove the stored id, but only while it still names `tenant_id`.
    fn forget_stored(&self, tenant_id: i64) {
        if self.stored_tenant_id() != Some(tenant_id) {
            return;
        }
        if let Err(e) = self.store.remove(STORAGE_KEY) {
            tracing::warn!("Failed to clear stale tenant id: {}", e);
        }
    }
}

/// Tenant context plus the API calls that establish it.
#[derive(Clone)]
pub struct TenantContextService {
    context: TenantContext,
    api: Arc<dyn TenantApi>,
    restore: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TenantContextService {
    /// Wraps `context`. A tenant id left in the session store is verified
    /// in the background against `profile/tenant/`; see [`Self::restored`].
    pub fn new(context: TenantContext, api: Arc<dyn TenantApi>) -> Self {
        let service = Self {
            context,
            api,
            restore: Arc::new(Mutex::new(None)),
        };

        if let Some(tenant_id) = service.context.stored_tenant_id() {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let task = runtime.spawn(Self::restore_from_store(
                        service.context.clone(),
                        service.api.clone(),
                        tenant_id,
                        service.context.subscribe(),
                    ));
                    if let Ok(mut slot) = service.restore.lock() {
                        *slot = Some(task);
                    }
                }
                Err(_) => tracing::warn!(
                    "No async runtime available, stored tenant {} was not restored",
                    tenant_id
                ),
            }
        }

        service
    }

    /// Wait for the background restore started by [`Self::new`], if any.
    pub async fn restored(&self) {
        let task = self.restore.lock().ok().and_then(|mut slot| slot.take());
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!("Tenant restore task failed: {}", e);
            }
        }
    }

    async fn restore_from_store(
        context: TenantContext,
        api: Arc<dyn TenantApi>,
        tenant_id: i64,
        seen: watch::Receiver<Option<Tenant>>,
    ) {
        let result = api.get_current_user_tenant().await;

        // A tenant chosen while the fetch was in flight wins over the restore
        let superseded = seen.has_changed().unwrap_or(true) || context.current_tenant().is_some();
        if superseded {
            tracing::debug!("Tenant context changed during restore of {}, keeping it", tenant_id);
            return;
        }

        match result {
            Ok(tenant) if tenant.id == tenant_id => {
                tracing::debug!("Restored tenant {} from session store", tenant_id);
                context.set_current_tenant(Some(tenant));
            }
            Ok(tenant) => {
                tracing::warn!(
                    "Stored tenant {} does not match user's tenant {}, clearing",
                    tenant_id,
                    tenant.id
                );
                context.forget_stored(tenant_id);
            }
            Err(e) => {
                tracing::debug!("Could not restore tenant {}: {}", tenant_id, e);
                context.forget_stored(tenant_id);
            }
        }
    }

    /// Fetch the caller's tenant and make it current. Returns `[tenant]` on
    /// success and `[]` on any failure; the error itself is swallowed.
    pub async fn initialize_tenant_context(&self) -> Vec<Tenant> {
        match self.api.get_current_user_tenant().await {
            Ok(tenant) => {
                self.context.set_current_tenant(Some(tenant.clone()));
                vec![tenant]
            }
            Err(e) => {
                tracing::debug!("No tenant available for current user: {}", e);
                Vec::new()
            }
        }
    }

    pub fn context(&self) -> &TenantContext {
        &self.context
    }

    pub fn current_tenant(&self) -> Option<Tenant> {
        self.context.current_tenant()
    }

    pub fn current_tenant_id(&self) -> Option<i64> {
        self.context.current_tenant_id()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Tenant>> {
        self.context.subscribe()
    }

    pub fn set_current_tenant(&self, tenant: Option<Tenant>) {
        self.context.set_current_tenant(tenant);
    }

    pub fn clear_tenant(&self) {
        self.context.clear_tenant();
    }
}
