use image_lambda::upload::function_handler;
use image_lambda::Config;
use lambda_runtime::{run, service_fn, tracing, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::subscriber::fmt().json().init();
    let config = Config::from_env()?;
    let s3_client = image_lambda::s3_client().await;
    run(service_fn(|event| function_handler(event, &s3_client, &config))).await
}
