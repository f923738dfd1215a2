// server/handlers/tenants/mod.rs - Tenant administration handlers (super admin only)

pub mod create; // POST   /api/tenants/
pub mod delete; // DELETE /api/tenants/:id/, POST /api/tenants/:id/hard-delete/
pub mod list; // GET    /api/tenants/
pub mod show; // GET    /api/tenants/:id/
pub mod status; // POST   /api/tenants/:id/activate/, /deactivate/
pub mod update; // PATCH  /api/tenants/:id/

pub use create::tenant_create;
pub use delete::{tenant_delete, tenant_hard_delete};
pub use list::tenant_list;
pub use show::{tenant_show, TenantDetail};
pub use status::{tenant_activate, tenant_deactivate};
pub use update::tenant_update;
