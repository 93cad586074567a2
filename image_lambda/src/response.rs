use aws_lambda_events::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::encodings::Body;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use lambda_runtime::Error;
use serde::Serialize;
use serde_json::json;

use crate::error::PipelineError;

/// API Gateway proxy response with a JSON body.
pub fn json<T: Serialize>(status: u16, body: &T) -> Result<ApiGatewayProxyResponse, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(ApiGatewayProxyResponse {
        status_code: i64::from(status),
        headers,
        body: Some(Body::Text(serde_json::to_string(body)?)),
        ..Default::default()
    })
}

pub fn client_error(err: &PipelineError) -> Result<ApiGatewayProxyResponse, Error> {
    json(400, &json!({ "error": err.to_string() }))
}

#[cfg(test)]
pub(crate) fn body_json(response: &ApiGatewayProxyResponse) -> serde_json::Value {
    match &response.body {
        Some(Body::Text(text)) => serde_json::from_str(text).unwrap(),
        other => panic!("expected a text body, got {other:?}"),
    }
}
