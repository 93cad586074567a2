use std::time::Duration;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use crate::error::PipelineError;

fn storage_error(err: impl std::error::Error) -> PipelineError {
    PipelineError::Storage(DisplayErrorContext(err).to_string())
}

/// One bucket reached through a shared client.
#[derive(Clone, Copy)]
pub struct Bucket<'a> {
    client: &'a S3Client,
    name: &'a str,
}

impl<'a> Bucket<'a> {
    pub fn new(client: &'a S3Client, name: &'a str) -> Self {
        Self { client, name }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PipelineError> {
        self.client
            .put_object()
            .bucket(self.name)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Vec<u8>, PipelineError> {
        let output = self
            .client
            .get_object()
            .bucket(self.name)
            .key(key)
            .send()
            .await
            .map_err(storage_error)?;
        let body = output.body.collect().await.map_err(storage_error)?;
        Ok(body.into_bytes().to_vec())
    }

    /// Signed GET URL for `key`. The object is not checked for existence.
    pub async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, PipelineError> {
        let presigning = PresigningConfig::expires_in(ttl).map_err(storage_error)?;
        let request = self
            .client
            .get_object()
            .bucket(self.name)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(storage_error)?;
        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
    use aws_sdk_s3::Client as S3Client;

    /// Client with static credentials, enough to sign requests offline.
    pub fn signing_client() -> S3Client {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new(
                "AKIDEXAMPLE",
                "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
                None,
                None,
                "tests",
            ))
            .build();
        S3Client::from_conf(config)
    }
}
