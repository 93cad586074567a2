//! Storage key layout shared by the three handlers.
//!
//! Originals live at `uploads/<uuid>.jpg`, thumbnails at
//! `thumbnails/thumb-<basename of the original>`.

use uuid::Uuid;

use crate::error::PipelineError;

pub const UPLOAD_PREFIX: &str = "uploads/";
pub const THUMBNAIL_PREFIX: &str = "thumbnails/thumb-";

/// Fresh key for an incoming upload. Uniqueness rests on the v4 UUID alone.
pub fn new_upload_key() -> String {
    format!("{UPLOAD_PREFIX}{}.jpg", Uuid::new_v4())
}

pub fn is_upload_key(key: &str) -> bool {
    key.starts_with(UPLOAD_PREFIX)
}

/// Text after the last `/`.
pub fn basename(key: &str) -> Result<&str, PipelineError> {
    match key.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(PipelineError::InvalidKey(key.to_string())),
    }
}

pub fn thumbnail_key(upload_key: &str) -> Result<String, PipelineError> {
    Ok(format!("{THUMBNAIL_PREFIX}{}", basename(upload_key)?))
}

/// Keys in S3 notifications arrive form-encoded.
pub fn decode_event_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
