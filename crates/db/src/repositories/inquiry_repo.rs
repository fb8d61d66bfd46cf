//! Repository for the `inquiries` table.

use realty_core::types::DbId;
use sqlx::PgPool;

use crate::models::inquiry::{CreateInquiry, Inquiry, InquiryDetail, InquiryDetailRow};

/// Column list for plain `inquiries` queries.
const COLUMNS: &str = "id, name, email, phone, message, inquiry_type, user_id, property_id, \
                       created_at, updated_at";

/// Joined read of an inquiry with the summaries of its listing and author.
///
/// LEFT JOINs so an inquiry whose user was deleted still reads back.
const DETAIL_SELECT: &str = "\
    SELECT i.id, i.name, i.email, i.phone, i.message, i.inquiry_type, \
           i.user_id, i.property_id, i.created_at, i.updated_at, \
           p.title AS property_title, p.price AS property_price, p.city AS property_city, \
           u.name AS user_name, u.email AS user_email \
    FROM inquiries i \
    LEFT JOIN properties p ON p.id = i.property_id \
    LEFT JOIN users u ON u.id = i.user_id";

const NEWEST_FIRST: &str = "ORDER BY i.created_at DESC, i.id DESC";

/// Provides create and read operations for inquiries.
pub struct InquiryRepo;

impl InquiryRepo {
    /// Insert an inquiry, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateInquiry) -> Result<Inquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO inquiries (name, email, phone, message, inquiry_type, user_id, property_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.phone.as_deref())
            .bind(&input.message)
            .bind(&input.inquiry_type)
            .bind(input.user_id)
            .bind(input.property_id)
            .fetch_one(pool)
            .await
    }

    /// Find an inquiry by ID, with its linked summaries.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<InquiryDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE i.id = $1");
        let row = sqlx::query_as::<_, InquiryDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(InquiryDetail::from))
    }

    /// One page of inquiries, optionally restricted to one inquiry type,
    /// newest first. Returns the total matching count alongside the page.
    pub async fn list(
        pool: &PgPool,
        inquiry_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(i64, Vec<InquiryDetail>), sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM inquiries WHERE ($1::text IS NULL OR inquiry_type = $1)",
        )
        .bind(inquiry_type)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "{DETAIL_SELECT} WHERE ($1::text IS NULL OR i.inquiry_type = $1) \
             {NEWEST_FIRST} LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, InquiryDetailRow>(&query)
            .bind(inquiry_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok((total, rows.into_iter().map(InquiryDetail::from).collect()))
    }

    /// All inquiries submitted by one user, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<InquiryDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE i.user_id = $1 {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, InquiryDetailRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(InquiryDetail::from).collect())
    }

    /// All inquiries about one listing, newest first.
    pub async fn list_by_property(
        pool: &PgPool,
        property_id: DbId,
    ) -> Result<Vec<InquiryDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE i.property_id = $1 {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, InquiryDetailRow>(&query)
            .bind(property_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(InquiryDetail::from).collect())
    }
}
