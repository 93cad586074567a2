//! Lambda handlers for a small image pipeline on S3.
//!
//! * [`upload`] stores a request body under `uploads/<uuid>.jpg`.
//! * [`thumbnail`] reacts to S3 notifications and writes
//!   `thumbnails/thumb-<name>` for every new upload.
//! * [`get_url`] hands out a presigned GET URL for a key.
//!
//! Each binary in `src/bin` builds one [`Config`](config::Config) and one S3
//! client at cold start and lends them to its handler.

use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;

pub mod config;
pub mod error;
pub mod get_url;
pub mod imaging;
pub mod keys;
pub mod response;
pub mod storage;
pub mod thumbnail;
pub mod upload;

pub use config::Config;
pub use error::PipelineError;

/// S3 client built from the execution environment's AWS settings.
pub async fn s3_client() -> S3Client {
    let shared_config = aws_config::load_defaults(BehaviorVersion::v2025_01_17()).await;
    S3Client::new(&shared_config)
}
