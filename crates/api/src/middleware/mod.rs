//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Verifies the Bearer token and loads the user it names.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
