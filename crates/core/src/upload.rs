//! Image upload policy: accepted types, size limit and stored filenames.

use crate::error::CoreError;

/// Multipart field carrying the listing image.
pub const IMAGE_FIELD: &str = "image";

/// Accepted image MIME types.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];

/// Default per-file size limit (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Check an incoming image against the type and size policy.
pub fn validate_image(
    content_type: Option<&str>,
    len: usize,
    max_bytes: usize,
) -> Result<(), CoreError> {
    let mime = content_type.unwrap_or("").trim().to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(CoreError::Validation(
            "Invalid file type. Only PNG, JPEG, and JPG image files are allowed.".into(),
        ));
    }
    if len == 0 {
        return Err(CoreError::Validation("Uploaded image is empty.".into()));
    }
    if len > max_bytes {
        return Err(CoreError::Validation(format!(
            "Image exceeds the maximum size of {max_bytes} bytes."
        )));
    }
    Ok(())
}

/// File extension to store an image under.
///
/// Taken from the original filename when it is a short alphanumeric suffix,
/// otherwise derived from the MIME type.
pub fn image_extension(original_name: Option<&str>, content_type: &str) -> String {
    let from_name = original_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    from_name.unwrap_or_else(|| match content_type {
        "image/png" => "png".to_string(),
        _ => "jpg".to_string(),
    })
}

/// Stored filename for an image uploaded at `unix_millis`.
pub fn stored_filename(unix_millis: i64, extension: &str) -> String {
    format!("{IMAGE_FIELD}_{unix_millis}.{extension}")
}

/// Whether `name` is a bare filename safe to join onto the upload directory.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(&['/', '\\'][..])
        && !name.contains('\0')
}
