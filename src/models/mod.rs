pub mod page;
pub mod tenant;
pub mod user;

pub use page::Page;
pub use tenant::{is_model_identifier, is_slug, Tenant, TenantDraft};
pub use user::CurrentUser;
