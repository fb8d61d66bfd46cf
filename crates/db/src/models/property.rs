//! Property listing model and DTOs.

use realty_core::listing::{ListingPatch, NewListing};
use realty_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub title: String,
    pub price: Decimal,
    pub city: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub property_type: String,
    /// Stored filename under the upload directory.
    pub image: String,
    pub size: Option<i32>,
    pub area: Option<String>,
    pub bedroom: i32,
    pub bathroom: i32,
    pub garage: i32,
    pub year: Option<i32>,
    pub address: String,
    pub zip_code: Option<String>,
    pub city_area: Option<String>,
    pub state: Option<String>,
    pub country: String,
    /// JSON array of user ids, as stored. Normalise with
    /// `realty_core::interest::normalize` before use.
    #[serde(rename = "interestedUsers")]
    pub interested_users: serde_json::Value,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

/// DTO for inserting a listing.
#[derive(Debug, Clone)]
pub struct CreateProperty {
    pub title: String,
    pub price: Decimal,
    pub city: String,
    pub description: Option<String>,
    pub property_type: String,
    pub image: String,
    pub size: Option<i32>,
    pub area: Option<String>,
    pub bedroom: i32,
    pub bathroom: i32,
    pub garage: i32,
    pub year: Option<i32>,
    pub address: String,
    pub zip_code: Option<String>,
    pub city_area: Option<String>,
    pub state: Option<String>,
    pub country: String,
}

impl CreateProperty {
    /// Combine a validated listing with the filename of its stored image.
    pub fn from_listing(listing: NewListing, image: String) -> Self {
        Self {
            title: listing.title,
            price: listing.price,
            city: listing.city,
            description: listing.description,
            property_type: listing.property_type,
            image,
            size: listing.size,
            area: listing.area,
            bedroom: listing.bedroom,
            bathroom: listing.bathroom,
            garage: listing.garage,
            year: listing.year,
            address: listing.address,
            zip_code: listing.zip_code,
            city_area: listing.city_area,
            state: listing.state,
            country: listing.country,
        }
    }
}

/// Full-row replacement written by `PropertyRepo::update`.
///
/// Built by merging a [`ListingPatch`] over the current row, so nullable
/// columns can be cleared as well as set.
pub type UpdateProperty = CreateProperty;

impl Property {
    /// Merge `patch` over this row. `image` replaces the stored filename when set.
    pub fn merge_patch(&self, patch: ListingPatch, image: Option<String>) -> UpdateProperty {
        UpdateProperty {
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            price: patch.price.unwrap_or(self.price),
            city: patch.city.unwrap_or_else(|| self.city.clone()),
            description: patch
                .description
                .unwrap_or_else(|| self.description.clone()),
            property_type: patch
                .property_type
                .unwrap_or_else(|| self.property_type.clone()),
            image: image.unwrap_or_else(|| self.image.clone()),
            size: patch.size.unwrap_or(self.size),
            area: patch.area.unwrap_or_else(|| self.area.clone()),
            bedroom: patch.bedroom.unwrap_or(self.bedroom),
            bathroom: patch.bathroom.unwrap_or(self.bathroom),
            garage: patch.garage.unwrap_or(self.garage),
            year: patch.year.unwrap_or(self.year),
            address: patch.address.unwrap_or_else(|| self.address.clone()),
            zip_code: patch.zip_code.unwrap_or_else(|| self.zip_code.clone()),
            city_area: patch.city_area.unwrap_or_else(|| self.city_area.clone()),
            state: patch.state.unwrap_or_else(|| self.state.clone()),
            country: patch.country.unwrap_or_else(|| self.country.clone()),
        }
    }
}

/// One page of a filtered listing query.
#[derive(Debug, Clone)]
pub struct PropertyPage {
    /// Rows matching the filter across all pages.
    pub total: i64,
    pub rows: Vec<Property>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored() -> Property {
        let now = chrono::Utc::now();
        Property {
            id: 7,
            title: "Garden flat".into(),
            price: Decimal::from(18_000),
            city: "Pune".into(),
            description: Some("Quiet street".into()),
            property_type: "For Rent".into(),
            image: "image_1.png".into(),
            size: Some(800),
            area: None,
            bedroom: 2,
            bathroom: 1,
            garage: 0,
            year: Some(2010),
            address: "4 Hill Road".into(),
            zip_code: None,
            city_area: Some("Baner".into()),
            state: Some("Maharashtra".into()),
            country: "India".into(),
            interested_users: json!([]),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_patch_keeps_every_column() {
        let row = stored();
        let merged = row.merge_patch(ListingPatch::default(), None);
        assert_eq!(merged.title, row.title);
        assert_eq!(merged.price, row.price);
        assert_eq!(merged.description, row.description);
        assert_eq!(merged.size, row.size);
        assert_eq!(merged.image, row.image);
        assert_eq!(merged.city_area, row.city_area);
    }

    #[test]
    fn patch_sets_and_clears_columns() {
        let patch = ListingPatch {
            price: Some(Decimal::from(20_000)),
            description: Some(None),
            year: Some(None),
            garage: Some(1),
            ..Default::default()
        };
        let merged = stored().merge_patch(patch, Some("image_2.jpg".into()));
        assert_eq!(merged.price, Decimal::from(20_000));
        assert_eq!(merged.description, None);
        assert_eq!(merged.year, None);
        assert_eq!(merged.garage, 1);
        assert_eq!(merged.image, "image_2.jpg");
        assert_eq!(merged.title, "Garden flat");
    }

    #[test]
    fn serializes_with_client_field_names() {
        let value = serde_json::to_value(stored()).unwrap();
        assert_eq!(value["type"], "For Rent");
        assert_eq!(value["interestedUsers"], json!([]));
        assert!(value.get("property_type").is_none());
        assert!(value["createdAt"].is_string());
    }
}
