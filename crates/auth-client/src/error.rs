//! Client error type.

use thiserror::Error;

/// Failures surfaced by [`crate::AuthClient`] and [`crate::HttpTransport`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("transport failed: {message}")]
    Transport {
        /// Underlying transport message.
        message: String,
    },
    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the error envelope, or the raw body.
        message: String,
    },
    /// A response body did not match the expected JSON shape.
    #[error("invalid response body: {message}")]
    Decode {
        /// Decoder message.
        message: String,
    },
    /// The base URL and path could not be joined.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Build a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::transport(error.to_string())
    }
}
