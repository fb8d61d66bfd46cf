//! Inquiry validation: property-specific, general-purpose and contact forms.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::DbId;

/// Inquiry about one listing.
pub const INQUIRY_PROPERTY_SPECIFIC: &str = "Property-Specific";
/// Inquiry not tied to a listing.
pub const INQUIRY_GENERAL: &str = "General";

/// Valid values for `inquiries.inquiry_type`.
pub const INQUIRY_TYPES: &[&str] = &[INQUIRY_PROPERTY_SPECIFIC, INQUIRY_GENERAL];

/// Categories offered by the public contact form (`general_inquiries`).
pub const GENERAL_CATEGORIES: &[&str] = &[
    "Renting Property",
    "Buying Property",
    "Selling Property",
    "Other",
];

/// The inquiry type implied by the presence of a property reference.
pub fn inquiry_type_for(property_id: Option<DbId>) -> &'static str {
    match property_id {
        Some(_) => INQUIRY_PROPERTY_SPECIFIC,
        None => INQUIRY_GENERAL,
    }
}

/// Fail with one message naming every missing (absent or blank) field.
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), CoreError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, v)| !v.is_some_and(|s| !s.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Please fill all required fields: {}.",
            missing.join(", ")
        )))
    }
}

/// Validate email syntax.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Please enter a valid email address.".into(),
        ))
    }
}

/// Validate a contact-form category and return its canonical spelling.
pub fn validate_general_category(raw: &str) -> Result<&'static str, CoreError> {
    let trimmed = raw.trim();
    GENERAL_CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(trimmed))
        .copied()
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid inquiry type '{trimmed}'. Must be one of: {}",
                GENERAL_CATEGORIES.join(", ")
            ))
        })
}

/// Validate an inquiry type filter value (`Property-Specific` or `General`).
pub fn validate_inquiry_type(raw: &str) -> Result<&'static str, CoreError> {
    let trimmed = raw.trim();
    INQUIRY_TYPES
        .iter()
        .find(|t| t.eq_ignore_ascii_case(trimmed))
        .copied()
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid inquiry type '{trimmed}'. Must be one of: {}",
                INQUIRY_TYPES.join(", ")
            ))
        })
}
