use std::sync::Arc;

use serde_json::{json, Value};

use super::lifecycle::Lifecycle;
use super::toast::Toasts;
use super::ModalOutcome;
use crate::client::{first_error_message, TenantApi};
use crate::models::{is_slug, Tenant, TenantDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField<T> {
    pub value: T,
    pub touched: bool,
}

impl<T> FormField<T> {
    fn new(value: T) -> Self {
        Self { value, touched: false }
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.touched = true;
    }
}

/// `name` (required), `identifier` (required, `[a-z0-9-]+`), `is_active`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantForm {
    pub name: FormField<String>,
    pub identifier: FormField<String>,
    pub is_active: FormField<bool>,
}

impl Default for TenantForm {
    fn default() -> Self {
        Self {
            name: FormField::new(String::new()),
            identifier: FormField::new(String::new()),
            is_active: FormField::new(true),
        }
    }
}

impl TenantForm {
    pub fn patch(&mut self, tenant: &Tenant) {
        self.name.value = tenant.name.clone();
        self.identifier.value = tenant.identifier.clone();
        self.is_active.value = tenant.is_active;
    }

    pub fn name_error(&self) -> Option<FieldError> {
        if self.name.value.is_empty() {
            return Some(FieldError::Required);
        }
        None
    }

    pub fn identifier_error(&self) -> Option<FieldError> {
        if self.identifier.value.is_empty() {
            return Some(FieldError::Required);
        }
        if !is_slug(&self.identifier.value) {
            return Some(FieldError::Pattern);
        }
        None
    }

    pub fn is_valid(&self) -> bool {
        self.name_error().is_none() && self.identifier_error().is_none()
    }

    pub fn mark_all_as_touched(&mut self) {
        self.name.touched = true;
        self.identifier.touched = true;
        self.is_active.touched = true;
    }

    pub fn all_touched(&self) -> bool {
        self.name.touched && self.identifier.touched && self.is_active.touched
    }

    pub fn value(&self) -> TenantDraft {
        TenantDraft {
            name: Some(self.name.value.clone()),
            identifier: Some(self.identifier.value.clone()),
            is_active: Some(self.is_active.value),
        }
    }
}

/// Create/edit dialog for a single tenant.
pub struct TenantEditDialog {
    api: Arc<dyn TenantApi>,
    toasts: Toasts,
    lifecycle: Lifecycle,
    mode: DialogMode,
    object: Option<Tenant>,
    pub form: TenantForm,
    pub network_active: bool,
    pub close_enabled: bool,
    pub error: Option<Value>,
    outcome: Option<ModalOutcome<Tenant>>,
}

impl TenantEditDialog {
    pub fn create(api: Arc<dyn TenantApi>, toasts: Toasts) -> Self {
        Self::open(api, toasts, DialogMode::Create, None)
    }

    pub fn edit(api: Arc<dyn TenantApi>, toasts: Toasts, tenant: Tenant) -> Self {
        Self::open(api, toasts, DialogMode::Edit, Some(tenant))
    }

    fn open(api: Arc<dyn TenantApi>, toasts: Toasts, mode: DialogMode, object: Option<Tenant>) -> Self {
        let mut form = TenantForm::default();
        if let (DialogMode::Edit, Some(tenant)) = (mode, &object) {
            form.patch(tenant);
        }
        Self {
            api,
            toasts,
            lifecycle: Lifecycle::new(),
            mode,
            object,
            form,
            network_active: false,
            close_enabled: false,
            error: None,
            outcome: None,
        }
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            DialogMode::Create => "Create Tenant",
            DialogMode::Edit => "Edit Tenant",
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn outcome(&self) -> Option<&ModalOutcome<Tenant>> {
        self.outcome.as_ref()
    }

    /// True once the dialog closed with a saved tenant.
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Some(ModalOutcome::Closed(_)))
    }

    /// First message from the last server error payload.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().and_then(first_error_message)
    }

    pub fn cancel(&mut self) {
        self.outcome = Some(ModalOutcome::Dismissed);
        self.lifecycle.destroy();
    }

    /// Validate and submit. An invalid form only marks every field touched;
    /// no request is made. Returns the saved tenant on success.
    pub async fn save(&mut self) -> Option<Tenant> {
        if !self.form.is_valid() {
            self.form.mark_all_as_touched();
            return None;
        }

        self.network_active = true;
        self.close_enabled = false;
        self.error = None;

        let draft = self.form.value();
        let api = self.api.clone();
        let target = match (self.mode, &self.object) {
            (DialogMode::Edit, Some(object)) => Some(object.id),
            _ => None,
        };
        let operation = async move {
            match target {
                Some(id) => api.update(id, &draft).await,
                None => api.create(&draft).await,
            }
        };
        let result = self.lifecycle.until_destroyed(operation).await?;

        self.network_active = false;
        self.close_enabled = true;

        match result {
            Ok(tenant) => {
                self.toasts.show_info(match self.mode {
                    DialogMode::Create => "Tenant created",
                    DialogMode::Edit => "Tenant updated",
                });
                self.outcome = Some(ModalOutcome::Closed(tenant.clone()));
                Some(tenant)
            }
            Err(e) => {
                tracing::debug!("Tenant save failed: {}", e);
                self.error = Some(
                    e.payload()
                        .cloned()
                        .unwrap_or_else(|| json!({ "detail": "An error occurred" })),
                );
                self.toasts.show_error(match self.mode {
                    DialogMode::Create => "Error creating tenant",
                    DialogMode::Edit => "Error updating tenant",
                });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::toast::ToastLevel;
    use crate::testing::{tenant, FakeTenantApi};

    #[tokio::test]
    async fn invalid_identifier_blocks_submission() {
        let api = Arc::new(FakeTenantApi::new());
        let mut dialog = TenantEditDialog::create(api.clone(), Toasts::new());
        dialog.form.name.set("Acme".into());
        dialog.form.identifier.set("Bad Slug!".into());

        assert_eq!(dialog.form.identifier_error(), Some(FieldError::Pattern));
        assert_eq!(dialog.save().await, None);

        assert!(api.calls().is_empty());
        assert!(dialog.form.all_touched());
        assert!(!dialog.network_active);
    }

    #[tokio::test]
    async fn empty_form_reports_required_fields() {
        let api = Arc::new(FakeTenantApi::new());
        let mut dialog = TenantEditDialog::create(api.clone(), Toasts::new());

        assert_eq!(dialog.save().await, None);
        assert_eq!(dialog.form.name_error(), Some(FieldError::Required));
        assert_eq!(dialog.form.identifier_error(), Some(FieldError::Required));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn create_mode_posts_and_closes() {
        let api = Arc::new(FakeTenantApi::new());
        let toasts = Toasts::new();
        let mut dialog = TenantEditDialog::create(api.clone(), toasts.clone());
        assert_eq!(dialog.title(), "Create Tenant");
        dialog.form.name.set("Acme Corp".into());
        dialog.form.identifier.set("acme-corp".into());

        let saved = dialog.save().await.expect("saved");

        assert_eq!(saved.identifier, "acme-corp");
        assert!(saved.is_active);
        assert_eq!(api.calls(), vec!["create"]);
        assert!(dialog.succeeded());
        assert!(dialog.close_enabled);
        assert_eq!(toasts.last().unwrap().message, "Tenant created");
    }

    #[tokio::test]
    async fn edit_mode_prefills_and_patches() {
        let existing = tenant(7, "Old Name", "old-name");
        let api = Arc::new(FakeTenantApi::with_tenants(vec![existing.clone()]));
        let mut dialog = TenantEditDialog::edit(api.clone(), Toasts::new(), existing);
        assert_eq!(dialog.title(), "Edit Tenant");
        assert_eq!(dialog.form.name.value, "Old Name");

        dialog.form.name.set("New Name".into());
        let saved = dialog.save().await.expect("saved");

        assert_eq!(api.calls(), vec!["update 7"]);
        assert_eq!(saved.name, "New Name");
        assert_eq!(api.tenant(7).unwrap().name, "New Name");
    }

    #[tokio::test]
    async fn server_error_is_surfaced() {
        let api = Arc::new(
            FakeTenantApi::new().failing(400, json!({"identifier": ["Identifier must be unique."]})),
        );
        let toasts = Toasts::new();
        let mut dialog = TenantEditDialog::create(api, toasts.clone());
        dialog.form.name.set("Dup".into());
        dialog.form.identifier.set("dup".into());

        assert_eq!(dialog.save().await, None);

        assert!(!dialog.succeeded());
        assert!(dialog.close_enabled);
        assert_eq!(
            dialog.error_message().as_deref(),
            Some("identifier: Identifier must be unique.")
        );
        let toast = toasts.last().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Error creating tenant");
    }

    #[tokio::test]
    async fn error_without_payload_uses_generic_detail() {
        let api = Arc::new(FakeTenantApi::new().failing(502, Value::Null));
        let mut dialog = TenantEditDialog::create(api, Toasts::new());
        dialog.form.name.set("Acme".into());
        dialog.form.identifier.set("acme".into());

        dialog.save().await;

        assert_eq!(dialog.error_message().as_deref(), Some("An error occurred"));
    }

    #[tokio::test]
    async fn cancel_dismisses() {
        let mut dialog = TenantEditDialog::create(Arc::new(FakeTenantApi::new()), Toasts::new());
        dialog.cancel();
        assert_eq!(dialog.outcome(), Some(&ModalOutcome::Dismissed));
        assert!(!dialog.succeeded());
    }
}
