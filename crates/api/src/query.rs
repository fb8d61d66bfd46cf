//! Shared query parameter types for API handlers.
//!
//! Numeric parameters are taken as text and parsed here so a malformed
//! value produces the same JSON 400 body as every other validation error.

use realty_core::error::CoreError;
use realty_core::search::{clamp_limit, clamp_offset, RawPropertyFilter, MAX_PAGE_SIZE};
use serde::Deserialize;

/// Pagination resolved from `?limit=&offset=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Parse and clamp raw pagination values.
    pub fn resolve(
        limit: Option<&str>,
        offset: Option<&str>,
        default_limit: i64,
    ) -> Result<Self, CoreError> {
        let limit = parse_integer("limit", limit)?;
        let offset = parse_integer("offset", offset)?;
        Ok(Self {
            limit: clamp_limit(limit, default_limit, MAX_PAGE_SIZE),
            offset: clamp_offset(offset),
        })
    }
}

fn parse_integer(name: &str, raw: Option<&str>) -> Result<Option<i64>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("{name} must be an integer"))),
    }
}

/// Query parameters for `GET /properties`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListParams {
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub location: Option<String>,
    pub bedrooms: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PropertyListParams {
    /// Borrow the filter fields for `realty_core::search::parse_property_filter`.
    pub fn raw_filter(&self) -> RawPropertyFilter<'_> {
        RawPropertyFilter {
            property_type: self.property_type.as_deref(),
            location: self.location.as_deref(),
            bedrooms: self.bedrooms.as_deref(),
            min_price: self.min_price.as_deref(),
            max_price: self.max_price.as_deref(),
        }
    }
}

/// Query parameters for `GET /properties/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// Query parameters for `GET /inquiries`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryListParams {
    pub inquiry_type: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}
