//! HTTP client error types.

use shop_commerce::SourceError;
use thiserror::Error;

/// A GraphQL error entry from a response envelope.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

/// Errors that can occur when talking to the remote services.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The service returned errors and no data.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphqlError>),

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

fn format_graphql_errors(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::ParseError(e.to_string())
    }
}

impl From<FetchError> for SourceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::RequestError(msg) => SourceError::Network(msg),
            FetchError::Timeout => SourceError::Network("request timed out".into()),
            FetchError::HttpError { status, message } => SourceError::Http { status, message },
            FetchError::GraphQL(errors) => SourceError::Service(format_graphql_errors(&errors)),
            FetchError::ParseError(msg) => SourceError::Decode(msg),
        }
    }
}
