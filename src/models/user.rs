use serde::{Deserialize, Serialize};

/// The authenticated user as reported by `GET profile/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
}
