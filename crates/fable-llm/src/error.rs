//! Error types for the text service boundary

use thiserror::Error;

/// Result alias used throughout `fable-llm`
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors produced while talking to an external text service
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure (connection, timeout, malformed body)
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("api error (status {status}): {message}")]
    Api {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body, as far as it could be read
        message: String,
    },

    /// The service answered successfully but produced no usable text
    #[error("response contained no candidates")]
    EmptyResponse,

    /// Required credentials were not present in the environment
    #[error("missing {0} environment variable")]
    MissingCredentials(&'static str),
}
