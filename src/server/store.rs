use std::collections::BTreeMap;

use chrono::Utc;

use crate::error::{ApiError, ApiResult};
use crate::models::{is_model_identifier, Tenant, TenantDraft};

const MAX_FIELD_LENGTH: usize = 255;

/// A user known to the API and the tenant it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub is_superuser: bool,
    pub tenant_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct TenantFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// In-memory tenant and user registry.
#[derive(Debug, Default)]
pub struct TenantStore {
    tenants: BTreeMap<i64, Tenant>,
    users: BTreeMap<i64, UserRecord>,
}

fn tenant_not_found() -> ApiError {
    ApiError::not_found("No Tenant matches the given query.")
}

impl TenantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the "Default Tenant" and an admin superuser exist.
    pub fn seed_defaults(&mut self, admin_username: &str) -> ApiResult<UserRecord> {
        let default_id = match self.tenants.values().find(|t| t.identifier == "default") {
            Some(tenant) => tenant.id,
            None => {
                let tenant = self.create(&TenantDraft::new("Default Tenant", "default"))?;
                tracing::info!("Created default tenant {}", tenant.id);
                tenant.id
            }
        };

        if let Some(admin) = self.users.values().find(|u| u.username == admin_username) {
            return Ok(admin.clone());
        }
        Ok(self.insert_user(admin_username, true, Some(default_id)))
    }

    pub fn insert_user(&mut self, username: &str, is_superuser: bool, tenant_id: Option<i64>) -> UserRecord {
        let id = self.users.keys().next_back().copied().unwrap_or(0) + 1;
        let user = UserRecord {
            id,
            username: username.to_string(),
            is_superuser,
            tenant_id,
        };
        self.users.insert(id, user.clone());
        user
    }

    pub fn user(&self, id: i64) -> Option<&UserRecord> {
        self.users.get(&id)
    }

    /// Any tenant, soft-deleted included.
    pub fn find(&self, id: i64) -> Option<&Tenant> {
        self.tenants.get(&id)
    }

    /// A tenant that has not been soft-deleted.
    pub fn live(&self, id: i64) -> ApiResult<&Tenant> {
        self.tenants
            .get(&id)
            .filter(|t| !t.is_deleted())
            .ok_or_else(tenant_not_found)
    }

    /// Live tenants matching `filter`, ordered by name.
    pub fn list(&self, filter: &TenantFilter) -> Vec<Tenant> {
        let search = filter.search.as_deref().unwrap_or("").to_lowercase();
        let mut tenants: Vec<Tenant> = self
            .tenants
            .values()
            .filter(|t| !t.is_deleted())
            .filter(|t| filter.is_active.map_or(true, |active| t.is_active == active))
            .filter(|t| {
                search.is_empty()
                    || t.name.to_lowercase().contains(&search)
                    || t.identifier.to_lowercase().contains(&search)
            })
            .cloned()
            .collect();
        tenants.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        tenants
    }

    pub fn user_count(&self, tenant_id: i64) -> usize {
        self.users
            .values()
            .filter(|u| u.tenant_id == Some(tenant_id))
            .count()
    }

    pub fn create(&mut self, draft: &TenantDraft) -> ApiResult<Tenant> {
        let mut errors = BTreeMap::new();
        match draft.name.as_deref() {
            None => required(&mut errors, "name"),
            Some(name) => self.check_name(&mut errors, name),
        }
        match draft.identifier.as_deref() {
            None => required(&mut errors, "identifier"),
            Some(identifier) => self.check_identifier(&mut errors, identifier, None),
        }
        if !errors.is_empty() {
            return Err(ApiError::ValidationError(errors));
        }

        let id = self.tenants.keys().next_back().copied().unwrap_or(0) + 1;
        let now = Utc::now();
        let tenant = Tenant {
            id,
            name: draft.name.clone().unwrap_or_default(),
            identifier: draft.identifier.clone().unwrap_or_default(),
            is_active: draft.is_active.unwrap_or(true),
            created_at: Some(now),
            updated_at: Some(now),
            deleted_at: None,
        };
        self.tenants.insert(id, tenant.clone());
        Ok(tenant)
    }

    /// Partial update; only fields present in `draft` change.
    pub fn update(&mut self, id: i64, draft: &TenantDraft) -> ApiResult<Tenant> {
        self.live(id)?;

        let mut errors = BTreeMap::new();
        if let Some(name) = draft.name.as_deref() {
            self.check_name(&mut errors, name);
        }
        if let Some(identifier) = draft.identifier.as_deref() {
            self.check_identifier(&mut errors, identifier, Some(id));
        }
        if !errors.is_empty() {
            return Err(ApiError::ValidationError(errors));
        }

        self.modify(id, |tenant| {
            if let Some(name) = &draft.name {
                tenant.name = name.clone();
            }
            if let Some(identifier) = &draft.identifier {
                tenant.identifier = identifier.clone();
            }
            if let Some(is_active) = draft.is_active {
                tenant.is_active = is_active;
            }
        })
    }

    pub fn set_active(&mut self, id: i64, is_active: bool) -> ApiResult<Tenant> {
        self.modify(id, |tenant| tenant.is_active = is_active)
    }

    /// Mark deleted and inactive; the record stays.
    pub fn soft_delete(&mut self, id: i64) -> ApiResult<Tenant> {
        let now = Utc::now();
        self.modify(id, |tenant| {
            tenant.deleted_at = Some(now);
            tenant.is_active = false;
        })
    }

    /// Remove permanently. Refused while users still belong to the tenant.
    pub fn hard_delete(&mut self, id: i64) -> ApiResult<()> {
        self.live(id)?;
        let users = self.user_count(id);
        if users > 0 {
            return Err(ApiError::bad_request(format!(
                "Cannot delete tenant: {} user(s) are still associated with it.",
                users
            )));
        }
        self.tenants.remove(&id);
        Ok(())
    }

    fn modify(&mut self, id: i64, change: impl FnOnce(&mut Tenant)) -> ApiResult<Tenant> {
        let tenant = self
            .tenants
            .get_mut(&id)
            .filter(|t| !t.is_deleted())
            .ok_or_else(tenant_not_found)?;
        change(tenant);
        tenant.updated_at = Some(Utc::now());
        Ok(tenant.clone())
    }

    fn check_name(&self, errors: &mut BTreeMap<String, Vec<String>>, name: &str) {
        if name.trim().is_empty() {
            push(errors, "name", "This field may not be blank.");
        } else if name.chars().count() > MAX_FIELD_LENGTH {
            push(errors, "name", "Ensure this field has no more than 255 characters.");
        }
    }

    fn check_identifier(
        &self,
        errors: &mut BTreeMap<String, Vec<String>>,
        identifier: &str,
        exclude: Option<i64>,
    ) {
        if identifier.is_empty() {
            push(errors, "identifier", "This field may not be blank.");
            return;
        }
        if identifier.chars().count() > MAX_FIELD_LENGTH {
            push(errors, "identifier", "Ensure this field has no more than 255 characters.");
        }
        if !is_model_identifier(identifier) {
            push(
                errors,
                "identifier",
                "Identifier must contain only lowercase letters, numbers, hyphens, and underscores.",
            );
        }
        // Unique across every tenant, soft-deleted ones included
        let taken = self
            .tenants
            .values()
            .any(|t| t.identifier == identifier && Some(t.id) != exclude);
        if taken {
            push(errors, "identifier", "Identifier must be unique.");
        }
    }
}

fn required(errors: &mut BTreeMap<String, Vec<String>>, field: &str) {
    push(errors, field, "This field is required.");
}

fn push(errors: &mut BTreeMap<String, Vec<String>>, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seed_creates_default_tenant_and_admin_once() {
        let mut store = TenantStore::new();
        let admin = store.seed_defaults("admin").unwrap();
        let again = store.seed_defaults("admin").unwrap();

        assert_eq!(admin, again);
        assert!(admin.is_superuser);
        let tenant = store.live(admin.tenant_id.unwrap()).unwrap();
        assert_eq!(tenant.identifier, "default");
        assert_eq!(store.list(&TenantFilter::default()).len(), 1);
    }

    #[test]
    fn create_validates_fields() {
        let mut store = TenantStore::new();
        let err = store
            .create(&TenantDraft {
                name: Some(String::new()),
                identifier: Some("Bad Slug!".into()),
                is_active: None,
            })
            .unwrap_err();

        assert_eq!(
            err.to_json(),
            json!({
                "name": ["This field may not be blank."],
                "identifier": ["Identifier must contain only lowercase letters, numbers, hyphens, and underscores."]
            })
        );
    }

    #[test]
    fn identifier_stays_unique_after_soft_delete() {
        let mut store = TenantStore::new();
        let acme = store.create(&TenantDraft::new("Acme", "acme")).unwrap();
        store.soft_delete(acme.id).unwrap();

        let err = store.create(&TenantDraft::new("Acme 2", "acme")).unwrap_err();
        assert_eq!(err, ApiError::field("identifier", "Identifier must be unique."));
    }

    #[test]
    fn update_may_keep_own_identifier() {
        let mut store = TenantStore::new();
        let acme = store.create(&TenantDraft::new("Acme", "acme")).unwrap();

        let updated = store
            .update(acme.id, &TenantDraft::new("Acme Corp", "acme"))
            .unwrap();
        assert_eq!(updated.name, "Acme Corp");
    }

    #[test]
    fn soft_delete_hides_and_deactivates() {
        let mut store = TenantStore::new();
        let acme = store.create(&TenantDraft::new("Acme", "acme")).unwrap();

        let deleted = store.soft_delete(acme.id).unwrap();

        assert!(deleted.deleted_at.is_some());
        assert!(!deleted.is_active);
        assert!(store.list(&TenantFilter::default()).is_empty());
        assert_eq!(store.live(acme.id).unwrap_err().status_code().as_u16(), 404);
        assert!(store.find(acme.id).is_some());
    }

    #[test]
    fn list_filters_and_orders_by_name() {
        let mut store = TenantStore::new();
        store.create(&TenantDraft::new("Zeta", "zeta")).unwrap();
        store.create(&TenantDraft::new("Alpha", "alpha")).unwrap();
        store.create(&TenantDraft::new("Mid", "acme-mid").active(false)).unwrap();

        let names: Vec<_> = store
            .list(&TenantFilter::default())
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);

        let inactive = store.list(&TenantFilter {
            search: None,
            is_active: Some(false),
        });
        assert_eq!(inactive.len(), 1);

        let searched = store.list(&TenantFilter {
            search: Some("ACME".into()),
            is_active: None,
        });
        assert_eq!(searched[0].identifier, "acme-mid");
    }

    #[test]
    fn hard_delete_refuses_tenants_with_users() {
        let mut store = TenantStore::new();
        let acme = store.create(&TenantDraft::new("Acme", "acme")).unwrap();
        let empty = store.create(&TenantDraft::new("Empty", "empty")).unwrap();
        store.insert_user("alice", false, Some(acme.id));

        assert!(store.hard_delete(acme.id).is_err());
        store.hard_delete(empty.id).unwrap();
        assert!(store.find(empty.id).is_none());
    }
}
