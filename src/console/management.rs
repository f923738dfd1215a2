use std::sync::Arc;

use super::edit_dialog::TenantEditDialog;
use super::lifecycle::Lifecycle;
use super::toast::Toasts;
use crate::client::{ListQuery, TenantApi};
use crate::config::config;
use crate::models::Tenant;

/// A mutating action waiting for the user's confirmation.
///
/// Pass it to [`TenantManagement::confirm`] to run it; dropping it cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub message_bold: String,
    pub message: String,
    pub btn_class: &'static str,
    pub btn_caption: String,
    action: PendingAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingAction {
    Deactivate(Tenant),
    Delete(Tenant),
}

impl Confirmation {
    pub fn tenant(&self) -> &Tenant {
        match &self.action {
            PendingAction::Deactivate(t) | PendingAction::Delete(t) => t,
        }
    }
}

/// Paginated tenant list with search and status filters.
pub struct TenantManagement {
    api: Arc<dyn TenantApi>,
    toasts: Toasts,
    lifecycle: Lifecycle,
    pub tenants: Vec<Tenant>,
    pub page: u32,
    pub page_size: u32,
    pub collection_size: u64,
    pub search_filter: String,
    pub status_filter: Option<bool>,
    pub loading: bool,
    pub show: bool,
}

impl TenantManagement {
    pub fn new(api: Arc<dyn TenantApi>, toasts: Toasts) -> Self {
        Self {
            api,
            toasts,
            lifecycle: Lifecycle::new(),
            tenants: Vec::new(),
            page: 1,
            page_size: config().client.page_size,
            collection_size: 0,
            search_filter: String::new(),
            status_filter: None,
            loading: false,
            show: false,
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn destroy(&self) {
        self.lifecycle.destroy();
    }

    pub async fn init(&mut self) {
        self.reload_data().await;
    }

    fn query(&self) -> ListQuery {
        ListQuery {
            page: Some(self.page),
            page_size: Some(self.page_size),
            search: Some(self.search_filter.clone()).filter(|s| !s.is_empty()),
            is_active: self.status_filter,
        }
    }

    pub async fn reload_data(&mut self) {
        self.loading = true;
        let query = self.query();
        let api = self.api.clone();

        let Some(result) = self
            .lifecycle
            .until_destroyed(async move { api.list(&query).await })
            .await
        else {
            return;
        };

        match result {
            Ok(page) => {
                self.tenants = page.results;
                self.collection_size = page.count;
                self.loading = false;
                self.show = true;
            }
            Err(e) => {
                tracing::debug!("Tenant list failed: {}", e);
                self.toasts.show_error("Error loading tenants");
                self.loading = false;
            }
        }
    }

    /// Reload after a mutation, starting again from the first page.
    async fn reload_first_page(&mut self) {
        self.page = 1;
        self.reload_data().await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
        self.reload_data().await;
    }

    pub async fn on_search_change(&mut self, search: impl Into<String>) {
        self.search_filter = search.into();
        self.page = 1;
        self.reload_data().await;
    }

    pub async fn on_status_filter_change(&mut self, status: Option<bool>) {
        self.status_filter = status;
        self.page = 1;
        self.reload_data().await;
    }

    pub fn open_create_dialog(&self) -> TenantEditDialog {
        TenantEditDialog::create(self.api.clone(), self.toasts.clone())
    }

    pub fn open_edit_dialog(&self, tenant: &Tenant) -> TenantEditDialog {
        TenantEditDialog::edit(self.api.clone(), self.toasts.clone(), tenant.clone())
    }

    /// Reload when the dialog closed with a saved tenant.
    pub async fn dialog_finished(&mut self, dialog: &TenantEditDialog) {
        if dialog.succeeded() {
            self.reload_data().await;
        }
    }

    pub async fn activate_tenant(&mut self, tenant: &Tenant) {
        let api = self.api.clone();
        let id = tenant.id;
        let Some(result) = self
            .lifecycle
            .until_destroyed(async move { api.activate(id).await })
            .await
        else {
            return;
        };

        match result {
            Ok(_) => {
                self.toasts.show_info("Tenant activated");
                self.reload_first_page().await;
            }
            Err(e) => {
                tracing::debug!("Activate tenant {} failed: {}", id, e);
                self.toasts.show_error("Error activating tenant");
            }
        }
    }

    pub fn deactivate_tenant(&self, tenant: &Tenant) -> Confirmation {
        Confirmation {
            title: "Deactivate Tenant".to_string(),
            message_bold: format!("Do you really want to deactivate \"{}\"?", tenant.name),
            message: "Users in this tenant will be logged out.".to_string(),
            btn_class: "btn-warning",
            btn_caption: "Deactivate".to_string(),
            action: PendingAction::Deactivate(tenant.clone()),
        }
    }

    pub fn delete_tenant(&self, tenant: &Tenant) -> Confirmation {
        Confirmation {
            title: "Delete Tenant".to_string(),
            message_bold: format!("Do you really want to delete \"{}\"?", tenant.name),
            message: "This will soft delete the tenant. This operation cannot be undone.".to_string(),
            btn_class: "btn-danger",
            btn_caption: "Delete".to_string(),
            action: PendingAction::Delete(tenant.clone()),
        }
    }

    /// Run a confirmed action, then reload on success.
    pub async fn confirm(&mut self, confirmation: Confirmation) {
        let api = self.api.clone();

        match confirmation.action {
            PendingAction::Deactivate(tenant) => {
                let Some(result) = self
                    .lifecycle
                    .until_destroyed(async move { api.deactivate(tenant.id).await })
                    .await
                else {
                    return;
                };
                match result {
                    Ok(_) => {
                        self.toasts.show_info("Tenant deactivated");
                        self.reload_first_page().await;
                    }
                    Err(e) => {
                        tracing::debug!("Deactivate tenant failed: {}", e);
                        self.toasts.show_error("Error deactivating tenant");
                    }
                }
            }
            PendingAction::Delete(tenant) => {
                let Some(result) = self
                    .lifecycle
                    .until_destroyed(async move { api.delete(tenant.id).await })
                    .await
                else {
                    return;
                };
                match result {
                    Ok(()) => {
                        self.toasts.show_info("Tenant deleted");
                        self.reload_first_page().await;
                    }
                    Err(e) => {
                        tracing::debug!("Delete tenant failed: {}", e);
                        self.toasts.show_error("Error deleting tenant");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::toast::ToastLevel;
    use crate::testing::{tenant, FakeTenantApi};
    use serde_json::json;
    use std::time::Duration;

    fn sample() -> Vec<Tenant> {
        vec![
            tenant(1, "Acme", "acme"),
            tenant(2, "Beta", "beta"),
            Tenant {
                is_active: false,
                ..tenant(3, "Gamma", "gamma")
            },
        ]
    }

    #[tokio::test]
    async fn init_loads_first_page() {
        let api = Arc::new(FakeTenantApi::with_tenants(sample()));
        let mut view = TenantManagement::new(api.clone(), Toasts::new());

        view.init().await;

        assert_eq!(view.tenants.len(), 3);
        assert_eq!(view.collection_size, 3);
        assert!(!view.loading);
        assert!(view.show);
        assert_eq!(api.calls(), vec!["list page=1"]);
    }

    #[tokio::test]
    async fn page_size_comes_from_client_config() {
        let api = Arc::new(FakeTenantApi::with_tenants(sample()));
        let mut view = TenantManagement::new(api, Toasts::new());
        assert_eq!(view.page_size, config().client.page_size);

        view.page_size = 2;
        view.init().await;
        assert_eq!(view.tenants.len(), 2);
        assert_eq!(view.collection_size, 3);
    }

    #[tokio::test]
    async fn filters_reset_page_and_reload() {
        let api = Arc::new(FakeTenantApi::with_tenants(sample()));
        let mut view = TenantManagement::new(api.clone(), Toasts::new());
        view.page = 4;

        view.on_status_filter_change(Some(false)).await;
        assert_eq!(view.page, 1);
        assert_eq!(view.tenants.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3]);

        view.on_status_filter_change(None).await;
        view.on_search_change("BET").await;
        assert_eq!(view.tenants.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }

    #[tokio::test]
    async fn delete_requires_confirmation_then_reloads() {
        let api = Arc::new(FakeTenantApi::with_tenants(sample()));
        let toasts = Toasts::new();
        let mut view = TenantManagement::new(api.clone(), toasts.clone());
        view.init().await;
        view.page = 2;

        let confirmation = view.delete_tenant(&view.tenants[0].clone());
        assert_eq!(confirmation.btn_class, "btn-danger");
        assert_eq!(confirmation.message_bold, "Do you really want to delete \"Acme\"?");
        assert_eq!(api.calls(), vec!["list page=1"]);

        view.confirm(confirmation).await;

        assert_eq!(api.calls(), vec!["list page=1", "delete 1", "list page=1"]);
        assert_eq!(view.page, 1);
        assert_eq!(view.collection_size, 2);
        assert!(view.tenants.iter().all(|t| t.id != 1));
        assert_eq!(toasts.last().unwrap().message, "Tenant deleted");
    }

    #[tokio::test]
    async fn deactivate_and_activate_reflect_in_reload() {
        let api = Arc::new(FakeTenantApi::with_tenants(sample()));
        let mut view = TenantManagement::new(api.clone(), Toasts::new());
        view.init().await;

        let beta = view.tenants[1].clone();
        let confirmation = view.deactivate_tenant(&beta);
        assert_eq!(confirmation.message, "Users in this tenant will be logged out.");
        view.confirm(confirmation).await;
        assert!(!view.tenants.iter().find(|t| t.id == 2).unwrap().is_active);

        view.activate_tenant(&beta).await;
        assert!(view.tenants.iter().find(|t| t.id == 2).unwrap().is_active);
        assert_eq!(
            api.calls(),
            vec!["list page=1", "deactivate 2", "list page=1", "activate 2", "list page=1"]
        );
    }

    #[tokio::test]
    async fn list_failure_shows_error_toast() {
        let api = Arc::new(FakeTenantApi::new().failing(500, json!({"detail": "boom"})));
        let toasts = Toasts::new();
        let mut view = TenantManagement::new(api, toasts.clone());

        view.reload_data().await;

        assert!(!view.loading);
        assert!(!view.show);
        let toast = toasts.last().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Error loading tenants");
    }

    #[tokio::test]
    async fn failed_mutation_does_not_reload() {
        let api = Arc::new(FakeTenantApi::new().failing(403, json!({"detail": "nope"})));
        let toasts = Toasts::new();
        let mut view = TenantManagement::new(api.clone(), toasts.clone());

        view.activate_tenant(&tenant(1, "Acme", "acme")).await;

        assert_eq!(api.calls(), vec!["activate 1"]);
        assert_eq!(toasts.last().unwrap().message, "Error activating tenant");
    }

    #[tokio::test]
    async fn successful_dialog_triggers_reload() {
        let api = Arc::new(FakeTenantApi::with_tenants(sample()));
        let mut view = TenantManagement::new(api.clone(), Toasts::new());

        let mut dialog = view.open_create_dialog();
        dialog.form.name.set("Delta".into());
        dialog.form.identifier.set("delta".into());
        dialog.save().await;
        view.dialog_finished(&dialog).await;

        assert_eq!(view.collection_size, 4);
        assert_eq!(api.calls(), vec!["create", "list page=1"]);
    }

    #[tokio::test]
    async fn destroyed_view_ignores_late_results() {
        let api = Arc::new(FakeTenantApi::with_tenants(sample()).delayed(Duration::from_millis(200)));
        let mut view = TenantManagement::new(api, Toasts::new());
        let lifecycle = view.lifecycle().clone();

        tokio::join!(view.reload_data(), async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            lifecycle.destroy();
        });

        assert!(view.tenants.is_empty());
        assert!(!view.show);
    }
}
