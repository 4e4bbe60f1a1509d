use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    SuperAdmin,
    Admin,
    Support,
    Photographer,
    Editor,
    Marketer,
}

impl UserRole {
    /// Everything except the customer role counts as studio staff.
    pub fn is_staff(self) -> bool {
        !matches!(self, UserRole::User)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    /// Doubles as the login credential; the registration flow enforces
    /// uniqueness, not the store.
    pub phone: String,
    pub role: UserRole,
}

impl User {
    pub fn new(full_name: String, email: String, phone: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name,
            email,
            phone,
            role,
        }
    }
}
