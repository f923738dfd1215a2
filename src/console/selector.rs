use std::sync::Arc;

use super::lifecycle::Lifecycle;
use super::ModalOutcome;
use crate::client::{TenantApi, TenantContextService};
use crate::models::Tenant;

/// Modal that lets the user pick the tenant the session acts as.
pub struct TenantSelector {
    api: Arc<dyn TenantApi>,
    context: TenantContextService,
    lifecycle: Lifecycle,
    pub tenants: Vec<Tenant>,
    pub title: String,
    pub message: String,
    selected: Option<Tenant>,
    pub error: Option<String>,
    outcome: Option<ModalOutcome<Tenant>>,
}

impl TenantSelector {
    pub fn new(api: Arc<dyn TenantApi>, context: TenantContextService, tenants: Vec<Tenant>) -> Self {
        Self {
            api,
            context,
            lifecycle: Lifecycle::new(),
            tenants,
            title: "Select Tenant".to_string(),
            message: "Please select a tenant to continue.".to_string(),
            selected: None,
            error: None,
            outcome: None,
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Load the caller's own tenant when no list was supplied.
    pub async fn init(&mut self) {
        if self.tenants.is_empty() {
            self.load_tenants().await;
        }
    }

    pub async fn load_tenants(&mut self) {
        let api = self.api.clone();
        let Some(result) = self
            .lifecycle
            .until_destroyed(async move { api.get_current_user_tenant().await })
            .await
        else {
            return;
        };

        match result {
            Ok(tenant) => {
                self.tenants = vec![tenant.clone()];
                self.selected = Some(tenant);
            }
            Err(e) => {
                tracing::error!("Failed to load tenants: {}", e);
                self.error = Some("Failed to load tenants. Please try again.".to_string());
            }
        }
    }

    pub fn select_tenant(&mut self, tenant: &Tenant) {
        self.selected = Some(tenant.clone());
    }

    pub fn selected_tenant(&self) -> Option<&Tenant> {
        self.selected.as_ref()
    }

    /// An inactive selection cannot be confirmed.
    pub fn can_confirm(&self) -> bool {
        self.selected.as_ref().is_some_and(|t| t.is_active)
    }

    /// Commit the selection to the tenant context and close.
    pub fn confirm(&mut self) -> Option<Tenant> {
        if !self.can_confirm() {
            return None;
        }
        let tenant = self.selected.clone()?;
        self.context.set_current_tenant(Some(tenant.clone()));
        self.outcome = Some(ModalOutcome::Closed(tenant.clone()));
        self.lifecycle.destroy();
        Some(tenant)
    }

    pub fn cancel(&mut self) {
        self.outcome = Some(ModalOutcome::Dismissed);
        self.lifecycle.destroy();
    }

    pub fn outcome(&self) -> Option<&ModalOutcome<Tenant>> {
        self.outcome.as_ref()
    }
}
