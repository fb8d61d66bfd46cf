//! Inquiry model, DTOs and the joined read shape.

use realty_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `inquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub inquiry_type: String,
    pub user_id: Option<DbId>,
    pub property_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an inquiry.
#[derive(Debug, Clone)]
pub struct CreateInquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub inquiry_type: String,
    pub user_id: Option<DbId>,
    pub property_id: Option<DbId>,
}

/// Summary of the listing an inquiry refers to.
#[derive(Debug, Clone, Serialize)]
pub struct PropertySummary {
    pub id: DbId,
    pub title: String,
    pub price: Decimal,
    pub city: String,
}

/// Summary of the user who submitted an inquiry.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// An inquiry with its linked property and user, when they still exist.
#[derive(Debug, Clone, Serialize)]
pub struct InquiryDetail {
    #[serde(flatten)]
    pub inquiry: Inquiry,
    pub property: Option<PropertySummary>,
    pub user: Option<UserSummary>,
}

/// Flat row produced by the `inquiries` LEFT JOIN query.
#[derive(Debug, Clone, FromRow)]
pub struct InquiryDetailRow {
    #[sqlx(flatten)]
    pub inquiry: Inquiry,
    pub property_title: Option<String>,
    pub property_price: Option<Decimal>,
    pub property_city: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl From<InquiryDetailRow> for InquiryDetail {
    fn from(row: InquiryDetailRow) -> Self {
        let property = match (
            row.inquiry.property_id,
            row.property_title,
            row.property_price,
            row.property_city,
        ) {
            (Some(id), Some(title), Some(price), Some(city)) => Some(PropertySummary {
                id,
                title,
                price,
                city,
            }),
            _ => None,
        };
        let user = match (row.inquiry.user_id, row.user_name, row.user_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };
        Self {
            inquiry: row.inquiry,
            property,
            user,
        }
    }
}
