use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::Serialize;

use crate::config::{Config, PRESIGNED_URL_TTL};
use crate::error::PipelineError;
use crate::response;
use crate::storage::Bucket;

const KEY_PARAM: &str = "key";

#[derive(Debug, Serialize)]
struct SignedUrl<'a> {
    url: &'a str,
}

fn requested_key(request: &ApiGatewayProxyRequest) -> Result<&str, PipelineError> {
    request
        .query_string_parameters
        .first(KEY_PARAM)
        .filter(|key| !key.is_empty())
        .ok_or(PipelineError::MissingParameter(KEY_PARAM))
}

pub async fn function_handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
    s3_client: &S3Client,
    config: &Config,
) -> Result<ApiGatewayProxyResponse, Error> {
    let key = match requested_key(&event.payload) {
        Ok(key) => key,
        Err(err) => {
            tracing::warn!("Rejecting URL request: {}", err);
            return response::client_error(&err);
        }
    };

    let url = Bucket::new(s3_client, &config.bucket)
        .presign_get(key, PRESIGNED_URL_TTL)
        .await?;
    tracing::info!(
        "Signed {}/{} for {}s",
        config.bucket,
        key,
        PRESIGNED_URL_TTL.as_secs()
    );

    response::json(200, &SignedUrl { url: &url })
}
