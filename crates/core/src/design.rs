//! Validation schema and artifact rules for the design entity.
//!
//! Input arrives as untyped form text; [`validate_fields`] turns it into a
//! typed value or a field-level error list. Image constraints mirror the
//! upload rules enforced at the HTTP boundary: jpeg/png only, at most
//! [`MAX_IMAGE_BYTES`].

use crate::error::{CoreError, FieldError};
use crate::types::Timestamp;

/// Maximum accepted image upload size (2048 KB).
pub const MAX_IMAGE_BYTES: usize = 2048 * 1024;

/// Accepted image content types. `image/jpg` is non-standard but some
/// clients still send it for jpeg.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// Prefix under which all design images are stored in the object store.
pub const IMAGE_KEY_PREFIX: &str = "images";

/// Raw design fields as received from the request, before validation.
#[derive(Debug, Clone, Default)]
pub struct DesignFields {
    pub name: String,
    pub number: String,
    pub price: String,
}

/// Design fields after validation, with `price` parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDesignFields {
    pub name: String,
    pub number: String,
    pub price: f64,
}

/// An uploaded image file: original filename, declared content type, bytes.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Validate the text fields of a design.
///
/// Collects every failure instead of stopping at the first, so the caller
/// gets the full field-error list in one round trip.
pub fn validate_fields(fields: &DesignFields) -> Result<ValidDesignFields, CoreError> {
    let mut errors = Vec::new();

    if fields.name.trim().is_empty() {
        errors.push(FieldError::new("name", "is required"));
    }
    if fields.number.trim().is_empty() {
        errors.push(FieldError::new("number", "is required"));
    }

    let price = if fields.price.trim().is_empty() {
        errors.push(FieldError::new("price", "is required"));
        None
    } else {
        match fields.price.trim().parse::<f64>() {
            Ok(p) if p.is_finite() => Some(p),
            _ => {
                errors.push(FieldError::new("price", "must be a number"));
                None
            }
        }
    };

    match price {
        Some(price) if errors.is_empty() => Ok(ValidDesignFields {
            name: fields.name.trim().to_string(),
            number: fields.number.trim().to_string(),
            price,
        }),
        _ => Err(CoreError::Validation(errors)),
    }
}

/// Validate an uploaded image against the content-type and size rules.
///
/// Runs entirely in memory; no network call happens until this passes.
pub fn validate_image(image: &ImageUpload) -> Result<(), CoreError> {
    if !ACCEPTED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
        return Err(CoreError::invalid_field(
            "image",
            format!(
                "unsupported content type '{}'. Must be one of: jpeg, png, jpg",
                image.content_type
            ),
        ));
    }
    if image.bytes.is_empty() {
        return Err(CoreError::invalid_field("image", "file is empty"));
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(CoreError::invalid_field(
            "image",
            format!(
                "file is {} bytes, exceeding the {} byte limit",
                image.bytes.len(),
                MAX_IMAGE_BYTES
            ),
        ));
    }
    Ok(())
}

/// Build the storage key for an uploaded image:
/// `images/<unix-timestamp>-<sanitized-filename>`.
///
/// The timestamp prefix keeps keys from colliding across uploads of the
/// same filename.
pub fn image_key(now: Timestamp, original_filename: &str) -> String {
    let safe_name = sanitize_filename(original_filename);
    format!("{IMAGE_KEY_PREFIX}/{}-{safe_name}", now.timestamp())
}

/// Reduce a client-supplied filename to a safe flat name: strip any path
/// components, then replace everything outside `[A-Za-z0-9._-]` with `_`.
fn sanitize_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
