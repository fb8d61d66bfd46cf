//! Repository for the `general_inquiries` table.

use sqlx::PgPool;

use crate::models::general_inquiry::{CreateGeneralInquiry, GeneralInquiry};

const COLUMNS: &str = "id, inquiry_type, name, email, phone, message, created_at, updated_at";

/// Provides create/list operations for contact-form inquiries.
pub struct GeneralInquiryRepo;

impl GeneralInquiryRepo {
    /// Insert a general inquiry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGeneralInquiry,
    ) -> Result<GeneralInquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO general_inquiries (inquiry_type, name, email, phone, message)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeneralInquiry>(&query)
            .bind(&input.inquiry_type)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.phone.as_deref())
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// List all general inquiries, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<GeneralInquiry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM general_inquiries ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, GeneralInquiry>(&query)
            .fetch_all(pool)
            .await
    }
}
