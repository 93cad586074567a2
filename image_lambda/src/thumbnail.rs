use aws_lambda_events::event::s3::{S3Event, S3EventRecord};
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::Serialize;

use crate::config::{Config, THUMBNAIL_MAX_DIMENSION};
use crate::error::PipelineError;
use crate::imaging;
use crate::keys;
use crate::storage::Bucket;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Acknowledgment {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Outcome of one notification batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<String>,
    pub skipped: usize,
    pub failed: Vec<(String, PipelineError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped + self.failed.len()
    }

    pub fn into_result(self) -> Result<(), PipelineError> {
        if self.failed.is_empty() {
            return Ok(());
        }
        let keys = self
            .failed
            .iter()
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Err(PipelineError::BatchFailed {
            failed: self.failed.len(),
            total: self.total(),
            keys,
        })
    }
}

/// Upload key a record refers to, or `None` when the record is not ours.
/// Folder markers such as `uploads/` have no file name and are not ours either.
fn upload_key(record: &S3EventRecord) -> Option<String> {
    if let Some(name) = record.event_name.as_deref() {
        if !name.starts_with("ObjectCreated") {
            return None;
        }
    }
    let key = keys::decode_event_key(record.s3.object.key.as_deref()?);
    (keys::is_upload_key(&key) && keys::basename(&key).is_ok()).then_some(key)
}

async fn make_thumbnail(bucket: &Bucket<'_>, key: &str) -> Result<String, PipelineError> {
    let thumb_key = keys::thumbnail_key(key)?;

    let original = bucket.get(key).await?;
    let format = imaging::sniff_format(key, &original)?;

    // Removed when `scratch` drops, whichever way this returns.
    let scratch = tempfile::Builder::new().prefix("thumbnail-").tempdir()?;
    let source = scratch.path().join("source");
    let target = scratch.path().join("thumbnail");
    tokio::fs::write(&source, &original).await?;
    drop(original);

    let (width, height) = {
        let (source, target) = (source.clone(), target.clone());
        tokio::task::spawn_blocking(move || {
            imaging::render_thumbnail(&source, &target, format, THUMBNAIL_MAX_DIMENSION)
        })
        .await??
    };

    let thumbnail = tokio::fs::read(&target).await?;
    tracing::info!(
        "Writing {}x{} thumbnail ({} bytes) to {}",
        width,
        height,
        thumbnail.len(),
        thumb_key
    );
    bucket.put(&thumb_key, thumbnail, format.to_mime_type()).await?;
    Ok(thumb_key)
}

async fn process_s3_records(bucket: &Bucket<'_>, event: &S3Event) -> BatchReport {
    let mut report = BatchReport::default();
    for record in &event.records {
        let Some(key) = upload_key(record) else {
            tracing::info!(
                "Skipping {:?} on {:?}",
                record.event_name,
                record.s3.object.key
            );
            report.skipped += 1;
            continue;
        };
        match make_thumbnail(bucket, &key).await {
            Ok(thumb_key) => report.processed.push(thumb_key),
            Err(err) => {
                tracing::error!("Thumbnail for {}/{} failed: {}", bucket.name(), key, err);
                report.failed.push((key, err));
            }
        }
    }
    report
}

pub async fn function_handler(
    event: LambdaEvent<S3Event>,
    s3_client: &S3Client,
    config: &Config,
) -> Result<Acknowledgment, Error> {
    let payload = event.payload;
    if payload.records.is_empty() {
        tracing::warn!("No records found in S3 event");
        return Ok(Acknowledgment { status_code: 200 });
    }

    let bucket = Bucket::new(s3_client, &config.bucket);
    let report = process_s3_records(&bucket, &payload).await;
    tracing::info!(
        "Batch done: {} processed, {} skipped, {} failed",
        report.processed.len(),
        report.skipped,
        report.failed.len()
    );
    report.into_result()?;
    Ok(Acknowledgment { status_code: 200 })
}
