use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_sdk_s3::Client as S3Client;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::Serialize;

use crate::config::{Config, UPLOAD_CONTENT_TYPE};
use crate::error::PipelineError;
use crate::keys;
use crate::response;
use crate::storage::Bucket;

#[derive(Debug, Serialize)]
struct UploadReceipt<'a> {
    message: &'a str,
    image_key: &'a str,
}

/// Raw image bytes carried by the request. Base64 bodies are decoded, with
/// line breaks and other ASCII whitespace ignored; anything else is taken as
/// the UTF-8 bytes of the text.
fn decode_body(request: &ApiGatewayProxyRequest) -> Result<Vec<u8>, PipelineError> {
    let body = request.body.as_deref().ok_or(PipelineError::MissingBody)?;
    if request.is_base64_encoded {
        let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        Ok(STANDARD.decode(compact)?)
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

pub async fn function_handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
    s3_client: &S3Client,
    config: &Config,
) -> Result<ApiGatewayProxyResponse, Error> {
    let image = match decode_body(&event.payload) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!("Rejecting upload: {}", err);
            return response::client_error(&err);
        }
    };

    let key = keys::new_upload_key();
    let size = image.len();
    Bucket::new(s3_client, &config.bucket)
        .put(&key, image, UPLOAD_CONTENT_TYPE)
        .await?;
    tracing::info!("Stored {} bytes at {}/{}", size, config.bucket, key);

    response::json(
        200,
        &UploadReceipt {
            message: "Uploaded!",
            image_key: &key,
        },
    )
}
