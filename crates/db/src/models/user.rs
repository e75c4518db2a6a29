//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub full_name: Option<String>,
    /// Defaults to `false` if omitted.
    #[serde(default)]
    pub is_superuser: bool,
}

/// DTO for an admin updating any user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// DTO for a user updating their own profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserMe {
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl From<UpdateUserMe> for UpdateUser {
    fn from(input: UpdateUserMe) -> Self {
        Self {
            email: input.email,
            full_name: input.full_name,
            ..Self::default()
        }
    }
}
