//! Headless controllers for the tenant screens: management list, edit
//! dialog, selector modal and the super-admin guard.

pub mod edit_dialog;
pub mod guard;
pub mod lifecycle;
pub mod management;
pub mod selector;
pub mod toast;

pub use edit_dialog::{DialogMode, FieldError, TenantEditDialog, TenantForm};
pub use guard::{GuardDecision, SuperAdminGuard};
pub use lifecycle::Lifecycle;
pub use management::{Confirmation, TenantManagement};
pub use selector::TenantSelector;
pub use toast::{Toast, ToastLevel, Toasts};

/// How a modal ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome<T> {
    Closed(T),
    Dismissed,
}
