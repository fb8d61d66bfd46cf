//! Contact-form inquiry model (`general_inquiries` table).

use realty_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `general_inquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInquiry {
    pub id: DbId,
    pub inquiry_type: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a general inquiry.
#[derive(Debug, Clone)]
pub struct CreateGeneralInquiry {
    pub inquiry_type: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}
