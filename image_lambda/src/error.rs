use thiserror::Error;

/// Everything that can go wrong inside one handler invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("environment variable `{0}` is not set")]
    MissingConfig(&'static str),

    #[error("missing required query parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("request has no body")]
    MissingBody,

    #[error("request body is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("object key `{0}` has no file name")]
    InvalidKey(String),

    #[error("`{key}` is not a recognised image: {source}")]
    UnsupportedImage {
        key: String,
        #[source]
        source: image::ImageError,
    },

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("storage request failed: {0}")]
    Storage(String),

    #[error("scratch file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("thumbnail worker did not finish: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("{failed} of {total} records failed: {keys}")]
    BatchFailed {
        failed: usize,
        total: usize,
        keys: String,
    },
}
