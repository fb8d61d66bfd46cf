//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in
//! `20250601000001_create_users_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Whether `role` grants admin access.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
