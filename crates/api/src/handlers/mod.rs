pub mod general_inquiry;
pub mod inquiry;
pub mod property;
pub mod user;
