//! Listing filters and pagination math.
//!
//! Turns raw query-string values into typed filters the repository layer can
//! bind, and computes the page counters echoed back to clients.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::listing::validate_property_type;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default page size for property listing.
pub const DEFAULT_PAGE_SIZE: i64 = 9;

/// Maximum page size for any listing endpoint.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Type filter value that disables type filtering.
pub const TYPE_FILTER_ALL: &str = "all";

/// Bedroom filter values at or above this count mean "at least".
pub const BEDROOM_AT_LEAST_THRESHOLD: i32 = 4;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to `1..=max`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// 1-based page number containing `offset`. `limit` must be positive.
pub fn current_page(offset: i64, limit: i64) -> i64 {
    offset / limit + 1
}

/// Number of pages needed for `total` rows (ceiling division).
pub fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Bedroom count filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedroomFilter {
    Exactly(i32),
    AtLeast(i32),
}

/// Typed filters for `GET /properties`. `None` disables a filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub property_type: Option<String>,
    /// Already escaped and wrapped for `ILIKE`.
    pub location_pattern: Option<String>,
    pub bedrooms: Option<BedroomFilter>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Raw query-string values, exactly as received.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPropertyFilter<'a> {
    pub property_type: Option<&'a str>,
    pub location: Option<&'a str>,
    pub bedrooms: Option<&'a str>,
    pub min_price: Option<&'a str>,
    pub max_price: Option<&'a str>,
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse the type filter. Blank or `all` disables it.
pub fn parse_type_filter(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(t) if t.eq_ignore_ascii_case(TYPE_FILTER_ALL) => Ok(None),
        Some(t) => validate_property_type(t).map(|t| Some(t.to_string())),
    }
}

/// Parse the bedroom filter.
///
/// `3` matches exactly three; `2+` matches two or more; any value at or above
/// [`BEDROOM_AT_LEAST_THRESHOLD`] is treated as "at least".
pub fn parse_bedroom_filter(raw: Option<&str>) -> Result<Option<BedroomFilter>, CoreError> {
    let Some(text) = non_blank(raw) else {
        return Ok(None);
    };
    let (digits, plus) = match text.strip_suffix('+') {
        Some(d) => (d.trim(), true),
        None => (text, false),
    };
    let n: i32 = digits
        .parse()
        .ok()
        .filter(|n| *n >= 0)
        .ok_or_else(|| CoreError::Validation(format!("Invalid bedrooms filter '{text}'")))?;
    if plus || n >= BEDROOM_AT_LEAST_THRESHOLD {
        Ok(Some(BedroomFilter::AtLeast(n)))
    } else {
        Ok(Some(BedroomFilter::Exactly(n)))
    }
}

fn parse_price_bound(name: &str, raw: Option<&str>) -> Result<Option<Decimal>, CoreError> {
    non_blank(raw)
        .map(|text| {
            Decimal::from_str(text)
                .ok()
                .filter(|p| !p.is_sign_negative())
                .ok_or_else(|| CoreError::Validation(format!("Invalid {name} '{text}'")))
        })
        .transpose()
}

/// Build an `ILIKE` pattern matching `term` as a literal substring.
///
/// `%`, `_` and `\` in the term are escaped so user input cannot widen the
/// match.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Parse every listing filter at once.
pub fn parse_property_filter(raw: RawPropertyFilter<'_>) -> Result<PropertyFilter, CoreError> {
    let min_price = parse_price_bound("minPrice", raw.min_price)?;
    let max_price = parse_price_bound("maxPrice", raw.max_price)?;
    if let (Some(min), Some(max)) = (min_price, max_price) {
        if min > max {
            return Err(CoreError::Validation(
                "minPrice must not exceed maxPrice".into(),
            ));
        }
    }

    Ok(PropertyFilter {
        property_type: parse_type_filter(raw.property_type)?,
        location_pattern: non_blank(raw.location).map(like_pattern),
        bedrooms: parse_bedroom_filter(raw.bedrooms)?,
        min_price,
        max_price,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
