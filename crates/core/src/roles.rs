//! Well-known role name constants carried in access-token claims.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Role name for a user row, derived from its superuser flag.
pub fn role_for(is_superuser: bool) -> &'static str {
    if is_superuser {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}
