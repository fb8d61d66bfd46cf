//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod general_inquiry_repo;
pub mod inquiry_repo;
pub mod property_repo;
pub mod user_repo;

pub use general_inquiry_repo::GeneralInquiryRepo;
pub use inquiry_repo::InquiryRepo;
pub use property_repo::PropertyRepo;
pub use user_repo::UserRepo;
