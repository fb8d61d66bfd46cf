//! Maximum text lengths, mirroring the `VARCHAR(n)` widths in `db/migrations`.
//!
//! Values are checked here so an over-long field is a validation error with
//! a field name rather than a database failure.

use crate::error::CoreError;

pub const USER_NAME_MAX: usize = 30;
pub const USER_EMAIL_MAX: usize = 100;

pub const PROPERTY_TITLE_MAX: usize = 255;
pub const PROPERTY_CITY_MAX: usize = 100;
pub const PROPERTY_AREA_MAX: usize = 100;
pub const PROPERTY_ADDRESS_MAX: usize = 255;
pub const PROPERTY_ZIP_CODE_MAX: usize = 20;
pub const PROPERTY_CITY_AREA_MAX: usize = 100;
pub const PROPERTY_STATE_MAX: usize = 100;
pub const PROPERTY_COUNTRY_MAX: usize = 100;

pub const INQUIRY_NAME_MAX: usize = 100;
pub const INQUIRY_EMAIL_MAX: usize = 255;
pub const INQUIRY_PHONE_MAX: usize = 20;

/// Fail if `value` has more than `max` characters. Counts characters, not
/// bytes, as `VARCHAR(n)` does.
pub fn check_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        Err(CoreError::Validation(format!(
            "{field} cannot exceed {max} characters."
        )))
    } else {
        Ok(())
    }
}

/// [`check_length`] over several fields; absent fields are skipped.
pub fn check_lengths(fields: &[(&str, Option<&str>, usize)]) -> Result<(), CoreError> {
    fields
        .iter()
        .filter_map(|(field, value, max)| value.map(|v| (field, v, max)))
        .try_for_each(|(field, value, max)| check_length(field, value, *max))
}
