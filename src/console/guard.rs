use crate::client::TenantApi;
use crate::models::CurrentUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Route guard for the tenant administration screens.
pub struct SuperAdminGuard;

impl SuperAdminGuard {
    pub const REDIRECT_TO: &'static str = "/";

    pub fn can_activate(user: Option<&CurrentUser>) -> GuardDecision {
        match user {
            Some(user) if user.is_superuser => GuardDecision::Allow,
            _ => GuardDecision::Redirect(Self::REDIRECT_TO.to_string()),
        }
    }

    /// Look the current user up, then decide. A failed lookup redirects.
    pub async fn check(api: &dyn TenantApi) -> GuardDecision {
        match api.current_user().await {
            Ok(user) => Self::can_activate(Some(&user)),
            Err(e) => {
                tracing::debug!("Super admin check could not load current user: {}", e);
                Self::can_activate(None)
            }
        }
    }
}
