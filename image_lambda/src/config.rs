use std::time::Duration;

use crate::error::PipelineError;

pub const BUCKET_VAR: &str = "BUCKET";

/// Longest side of a generated thumbnail, in pixels.
pub const THUMBNAIL_MAX_DIMENSION: u32 = 128;

/// How long a presigned retrieval URL stays valid.
pub const PRESIGNED_URL_TTL: Duration = Duration::from_secs(300);

/// Every upload is stored with this content type, whatever the bytes are.
pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// Per execution context settings, loaded once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bucket: String,
}

impl Config {
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PipelineError> {
        let bucket = lookup(BUCKET_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(PipelineError::MissingConfig(BUCKET_VAR))?;
        Ok(Self { bucket })
    }
}
