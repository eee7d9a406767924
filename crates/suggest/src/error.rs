use thiserror::Error;

/// Errors of a category suggestion request.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("model service responded {status}: {message}")]
    Server { status: u16, message: String },
    #[error("model returned no candidate")]
    EmptyResponse,
    #[error("model output does not match the schema: {0}")]
    Schema(#[from] serde_json::Error),
}
