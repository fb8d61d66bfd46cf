//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Response shapes where the row must not be serialized directly

pub mod general_inquiry;
pub mod inquiry;
pub mod property;
pub mod user;
