//! Repository for the `properties` table.

use realty_core::search::{like_pattern, BedroomFilter, PropertyFilter};
use realty_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::property::{CreateProperty, Property, PropertyPage, UpdateProperty};

/// Column list for `properties` queries.
const COLUMNS: &str = "\
    id, title, price, city, description, property_type, image, \
    size, area, bedroom, bathroom, garage, year, \
    address, zip_code, city_area, state, country, \
    interested_users, created_at, updated_at";

/// Newest listings first; `id` breaks ties between rows inserted in the same instant.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// Provides CRUD and search operations for listings.
pub struct PropertyRepo;

/// Build the `WHERE` clause for `filter`, numbering placeholders from `$1`.
///
/// Returns the clause (empty when no filter is active) and the next free
/// placeholder index. [`bind_filter`] binds values in the same order.
fn filter_clause(filter: &PropertyFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.property_type.is_some() {
        conditions.push(format!("property_type = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.location_pattern.is_some() {
        conditions.push(format!(
            "(city ILIKE ${bind_idx} OR address ILIKE ${bind_idx} \
             OR city_area ILIKE ${bind_idx} OR state ILIKE ${bind_idx} \
             OR country ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
    }
    match filter.bedrooms {
        Some(BedroomFilter::Exactly(_)) => {
            conditions.push(format!("bedroom = ${bind_idx}"));
            bind_idx += 1;
        }
        Some(BedroomFilter::AtLeast(_)) => {
            conditions.push(format!("bedroom >= ${bind_idx}"));
            bind_idx += 1;
        }
        None => {}
    }
    if filter.min_price.is_some() {
        conditions.push(format!("price >= ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.max_price.is_some() {
        conditions.push(format!("price <= ${bind_idx}"));
        bind_idx += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, bind_idx)
}

/// Bind the values for [`filter_clause`] in placeholder order.
fn bind_filter<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &PropertyFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    if let Some(ref t) = filter.property_type {
        q = q.bind(t.clone());
    }
    if let Some(ref pattern) = filter.location_pattern {
        q = q.bind(pattern.clone());
    }
    if let Some(BedroomFilter::Exactly(n) | BedroomFilter::AtLeast(n)) = filter.bedrooms {
        q = q.bind(n);
    }
    if let Some(min) = filter.min_price {
        q = q.bind(min);
    }
    if let Some(max) = filter.max_price {
        q = q.bind(max);
    }
    q
}

impl PropertyRepo {
    /// Insert a listing with an empty interested-user set.
    pub async fn create(pool: &PgPool, input: &CreateProperty) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties (\
                title, price, city, description, property_type, image, \
                size, area, bedroom, bathroom, garage, year, \
                address, zip_code, city_area, state, country, interested_users\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
                       $13, $14, $15, $16, $17, '[]'::jsonb) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(&input.title)
            .bind(input.price)
            .bind(&input.city)
            .bind(input.description.as_deref())
            .bind(&input.property_type)
            .bind(&input.image)
            .bind(input.size)
            .bind(input.area.as_deref())
            .bind(input.bedroom)
            .bind(input.bathroom)
            .bind(input.garage)
            .bind(input.year)
            .bind(&input.address)
            .bind(input.zip_code.as_deref())
            .bind(input.city_area.as_deref())
            .bind(input.state.as_deref())
            .bind(&input.country)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of listings matching `filter`, newest first, plus the total
    /// number of matching rows.
    pub async fn list(
        pool: &PgPool,
        filter: &PropertyFilter,
        limit: i64,
        offset: i64,
    ) -> Result<PropertyPage, sqlx::Error> {
        let (where_clause, bind_idx) = filter_clause(filter);

        let count_query = format!("SELECT COUNT(*) FROM properties {where_clause}");
        let (total,): (i64,) = bind_filter(sqlx::query_as(&count_query), filter)
            .fetch_one(pool)
            .await?;

        let page_query = format!(
            "SELECT {COLUMNS} FROM properties {where_clause} {NEWEST_FIRST} \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );
        let rows = bind_filter(sqlx::query_as::<_, Property>(&page_query), filter)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(PropertyPage { total, rows })
    }

    /// Free-text search across the descriptive and location columns.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties \
             WHERE title ILIKE $1 OR city ILIKE $1 OR description ILIKE $1 \
                OR address ILIKE $1 OR city_area ILIKE $1 OR state ILIKE $1 \
                OR country ILIKE $1 \
             {NEWEST_FIRST}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(like_pattern(term))
            .fetch_all(pool)
            .await
    }

    /// Replace every editable column of a listing.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProperty,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "UPDATE properties SET \
                title = $2, price = $3, city = $4, description = $5, \
                property_type = $6, image = $7, size = $8, area = $9, \
                bedroom = $10, bathroom = $11, garage = $12, year = $13, \
                address = $14, zip_code = $15, city_area = $16, state = $17, \
                country = $18 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.price)
            .bind(&input.city)
            .bind(input.description.as_deref())
            .bind(&input.property_type)
            .bind(&input.image)
            .bind(input.size)
            .bind(input.area.as_deref())
            .bind(input.bedroom)
            .bind(input.bathroom)
            .bind(input.garage)
            .bind(input.year)
            .bind(&input.address)
            .bind(input.zip_code.as_deref())
            .bind(input.city_area.as_deref())
            .bind(input.state.as_deref())
            .bind(&input.country)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the interested-user set. Returns `true` if the row exists.
    pub async fn set_interested_users(
        pool: &PgPool,
        id: DbId,
        users: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE properties SET interested_users = $2 WHERE id = $1")
            .bind(id)
            .bind(users)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a listing by ID; its inquiries cascade. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
