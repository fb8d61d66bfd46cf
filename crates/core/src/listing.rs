//! Property listing field coercion for the create and update paths.
//!
//! Multipart forms deliver every field as text. Each column has exactly one
//! parse function, shared by [`validate_new_listing`] and
//! [`validate_listing_patch`], so the two paths cannot drift apart.
//!
//! Only the price is a hard failure. The other numeric fields fall back to a
//! per-field default and record a warning for the caller to log:
//!
//! | Field                           | Blank / absent | Invalid or negative |
//! |---------------------------------|----------------|---------------------|
//! | `bedroom`, `bathroom`, `garage` | `0`            | `0` + warning       |
//! | `size`                          | `null`         | `null` + warning    |
//! | `year`                          | `null`         | `null` + warning    |

use std::collections::HashMap;
use std::str::FromStr;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::limits::{
    check_lengths, PROPERTY_ADDRESS_MAX, PROPERTY_AREA_MAX, PROPERTY_CITY_AREA_MAX,
    PROPERTY_CITY_MAX, PROPERTY_COUNTRY_MAX, PROPERTY_STATE_MAX, PROPERTY_TITLE_MAX,
    PROPERTY_ZIP_CODE_MAX,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TYPE_FOR_RENT: &str = "For Rent";
pub const TYPE_FOR_SALE: &str = "For Sale";

/// Valid values for the `type` field.
pub const VALID_TYPES: &[&str] = &[TYPE_FOR_RENT, TYPE_FOR_SALE];

/// Stored when a listing does not name its country.
pub const DEFAULT_COUNTRY: &str = "India";

/// Earliest accepted construction year.
pub const MIN_YEAR: i32 = 1000;

/// How far past the current year a construction year may lie.
pub const MAX_YEARS_AHEAD: i32 = 5;

/// `NUMERIC(15, 2)` holds at most 13 integer digits.
const PRICE_CEILING: i64 = 10_000_000_000_000;

const MISSING_REQUIRED_MESSAGE: &str =
    "Missing required property details: title, price, city, type, or address.";
const INVALID_PRICE_MESSAGE: &str = "Price must be a valid positive number.";

// ---------------------------------------------------------------------------
// Coercion primitives
// ---------------------------------------------------------------------------

/// A coerced field value plus the warning raised if a fallback was used.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub warning: Option<String>,
}

impl<T> Coerced<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    fn fallback(value: T, warning: String) -> Self {
        Self {
            value,
            warning: Some(warning),
        }
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// The current UTC calendar year, used as the upper anchor for `year`.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Parse a price. Must be a decimal number strictly greater than zero.
///
/// The value is rounded to two decimal places before the positivity check,
/// so `0.001` is rejected.
pub fn parse_price(raw: &str) -> Result<Decimal, CoreError> {
    Decimal::from_str(raw.trim())
        .ok()
        .map(|p| p.round_dp(2))
        .filter(|p| *p > Decimal::ZERO && *p < Decimal::from(PRICE_CEILING))
        .ok_or_else(|| CoreError::Validation(INVALID_PRICE_MESSAGE.into()))
}

/// Parse a room/garage count. Absent or blank means `0`.
pub fn parse_count(field: &str, raw: Option<&str>) -> Coerced<i32> {
    let Some(text) = non_blank(raw) else {
        return Coerced::ok(0);
    };
    match text.parse::<i32>() {
        Ok(n) if n >= 0 => Coerced::ok(n),
        _ => Coerced::fallback(
            0,
            format!("Invalid {field} value received: '{text}'. Setting to 0."),
        ),
    }
}

/// Parse the built-up size. Absent or blank means `null`.
pub fn parse_size(raw: Option<&str>) -> Coerced<Option<i32>> {
    let Some(text) = non_blank(raw) else {
        return Coerced::ok(None);
    };
    match text.parse::<i32>() {
        Ok(n) if n >= 0 => Coerced::ok(Some(n)),
        _ => Coerced::fallback(
            None,
            format!("Invalid size value received: '{text}'. Setting to null."),
        ),
    }
}

/// Parse the construction year, bounded to
/// `MIN_YEAR..=current_year + MAX_YEARS_AHEAD`.
pub fn parse_year(raw: Option<&str>, current_year: i32) -> Coerced<Option<i32>> {
    let Some(text) = non_blank(raw) else {
        return Coerced::ok(None);
    };
    let max_year = current_year + MAX_YEARS_AHEAD;
    match text.parse::<i32>() {
        Ok(y) if (MIN_YEAR..=max_year).contains(&y) => Coerced::ok(Some(y)),
        _ => Coerced::fallback(
            None,
            format!("Invalid year value received: '{text}'. Setting to null."),
        ),
    }
}

/// Validate the listing type and return its canonical spelling.
///
/// Matching is case-insensitive so `for rent` is stored as `For Rent`.
pub fn validate_property_type(raw: &str) -> Result<&'static str, CoreError> {
    let trimmed = raw.trim();
    VALID_TYPES
        .iter()
        .find(|t| t.eq_ignore_ascii_case(trimmed))
        .copied()
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid property type '{trimmed}'. Must be one of: {}",
                VALID_TYPES.join(", ")
            ))
        })
}

fn collect<T>(coerced: Coerced<T>, warnings: &mut Vec<String>) -> T {
    if let Some(w) = coerced.warning {
        warnings.push(w);
    }
    coerced.value
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Raw text fields of a listing form, keyed by multipart field name.
#[derive(Debug, Default, Clone)]
pub struct ListingForm {
    fields: HashMap<String, String>,
}

impl ListingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field. A repeated name overwrites the earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// The raw, untrimmed value of a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn text(&self, name: &str) -> Option<String> {
        non_blank(self.get(name)).map(str::to_string)
    }

    /// For update: `None` when absent, `Some(None)` when sent blank.
    fn nullable_text(&self, name: &str) -> Option<Option<String>> {
        self.get(name).map(|raw| non_blank(Some(raw)).map(str::to_string))
    }

    /// For update: absent is `None`; present but blank is an error.
    fn required_text(&self, name: &str) -> Result<Option<String>, CoreError> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => non_blank(Some(raw))
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| CoreError::Validation(format!("Field '{name}' cannot be empty."))),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ListingForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = ListingForm::new();
        for (k, v) in iter {
            form.insert(k, v);
        }
        form
    }
}

// ---------------------------------------------------------------------------
// Validated outputs
// ---------------------------------------------------------------------------

/// A validated value plus the coercion warnings raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

/// A fully validated listing, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub price: Decimal,
    pub city: String,
    pub description: Option<String>,
    pub property_type: String,
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

/// A partial update. `None` leaves the stored value untouched; for nullable
/// columns `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub city: Option<String>,
    pub description: Option<Option<String>>,
    pub property_type: Option<String>,
    pub size: Option<Option<i32>>,
    pub area: Option<Option<String>>,
    pub bedroom: Option<i32>,
    pub bathroom: Option<i32>,
    pub garage: Option<i32>,
    pub year: Option<Option<i32>>,
    pub address: Option<String>,
    pub zip_code: Option<Option<String>>,
    pub city_area: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub country: Option<String>,
}

/// Validate a create form.
///
/// Order: required text fields present, then price, then type, then the
/// soft-coerced numeric fields.
pub fn validate_new_listing(
    form: &ListingForm,
    current_year: i32,
) -> Result<Validated<NewListing>, CoreError> {
    let (Some(title), Some(price_raw), Some(city), Some(type_raw), Some(address)) = (
        form.text("title"),
        form.text("price"),
        form.text("city"),
        form.text("type"),
        form.text("address"),
    ) else {
        return Err(CoreError::Validation(MISSING_REQUIRED_MESSAGE.into()));
    };

    let price = parse_price(&price_raw)?;
    let property_type = validate_property_type(&type_raw)?.to_string();

    let mut warnings = Vec::new();
    let size = collect(parse_size(form.get("size")), &mut warnings);
    let bedroom = collect(parse_count("bedroom", form.get("bedroom")), &mut warnings);
    let bathroom = collect(parse_count("bathroom", form.get("bathroom")), &mut warnings);
    let garage = collect(parse_count("garage", form.get("garage")), &mut warnings);
    let year = collect(parse_year(form.get("year"), current_year), &mut warnings);

    let listing = NewListing {
        title,
        price,
        city,
        description: form.text("description"),
        property_type,
        size,
        area: form.text("area"),
        bedroom,
        bathroom,
        garage,
        year,
        address,
        zip_code: form.text("zip_code"),
        city_area: form.text("city_area"),
        state: form.text("state"),
        country: form
            .text("country")
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
    };

    check_lengths(&[
        ("title", Some(listing.title.as_str()), PROPERTY_TITLE_MAX),
        ("city", Some(listing.city.as_str()), PROPERTY_CITY_MAX),
        ("area", listing.area.as_deref(), PROPERTY_AREA_MAX),
        ("address", Some(listing.address.as_str()), PROPERTY_ADDRESS_MAX),
        ("zip_code", listing.zip_code.as_deref(), PROPERTY_ZIP_CODE_MAX),
        ("city_area", listing.city_area.as_deref(), PROPERTY_CITY_AREA_MAX),
        ("state", listing.state.as_deref(), PROPERTY_STATE_MAX),
        ("country", Some(listing.country.as_str()), PROPERTY_COUNTRY_MAX),
    ])?;

    Ok(Validated {
        value: listing,
        warnings,
    })
}

/// Validate an update form. Only fields present in the form are touched.
pub fn validate_listing_patch(
    form: &ListingForm,
    current_year: i32,
) -> Result<Validated<ListingPatch>, CoreError> {
    let mut warnings = Vec::new();

    let price = form.get("price").map(parse_price).transpose()?;
    let property_type = form
        .get("type")
        .map(|raw| validate_property_type(raw).map(str::to_string))
        .transpose()?;

    let mut count = |field: &str| {
        form.get(field)
            .map(|raw| collect(parse_count(field, Some(raw)), &mut warnings))
    };
    let bedroom = count("bedroom");
    let bathroom = count("bathroom");
    let garage = count("garage");

    let size = form
        .get("size")
        .map(|raw| collect(parse_size(Some(raw)), &mut warnings));
    let year = form
        .get("year")
        .map(|raw| collect(parse_year(Some(raw), current_year), &mut warnings));

    let patch = ListingPatch {
        title: form.required_text("title")?,
        price,
        city: form.required_text("city")?,
        description: form.nullable_text("description"),
        property_type,
        size,
        area: form.nullable_text("area"),
        bedroom,
        bathroom,
        garage,
        year,
        address: form.required_text("address")?,
        zip_code: form.nullable_text("zip_code"),
        city_area: form.nullable_text("city_area"),
        state: form.nullable_text("state"),
        country: form.get("country").map(|raw| {
            non_blank(Some(raw))
                .unwrap_or(DEFAULT_COUNTRY)
                .to_string()
        }),
    };

    check_lengths(&[
        ("title", patch.title.as_deref(), PROPERTY_TITLE_MAX),
        ("city", patch.city.as_deref(), PROPERTY_CITY_MAX),
        ("area", patch.area.as_ref().and_then(Option::as_deref), PROPERTY_AREA_MAX),
        ("address", patch.address.as_deref(), PROPERTY_ADDRESS_MAX),
        ("zip_code", patch.zip_code.as_ref().and_then(Option::as_deref), PROPERTY_ZIP_CODE_MAX),
        ("city_area", patch.city_area.as_ref().and_then(Option::as_deref), PROPERTY_CITY_AREA_MAX),
        ("state", patch.state.as_ref().and_then(Option::as_deref), PROPERTY_STATE_MAX),
        ("country", patch.country.as_deref(), PROPERTY_COUNTRY_MAX),
    ])?;

    Ok(Validated {
        value: patch,
        warnings,
    })
}
