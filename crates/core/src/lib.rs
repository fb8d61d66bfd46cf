//! Domain logic for the listing platform.
//!
//! Everything in this crate is pure: no database, no filesystem, no HTTP.
//! The `db` and `api` crates call into it to validate and shape data.

pub mod error;
pub mod inquiry;
pub mod interest;
pub mod limits;
pub mod listing;
pub mod roles;
pub mod search;
pub mod types;
pub mod upload;
