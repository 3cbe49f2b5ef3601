//! GraphQL over HTTP.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{FetchError, GraphqlError};

/// Response envelope: `{ data, errors? }`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

/// Client for a single GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: Client,
    endpoint: String,
}

impl GraphqlClient {
    /// Create a client with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run `document` and decode `data` into `T`.
    ///
    /// Errors reported alongside usable data are logged and tolerated.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        document: &str,
        variables: Value,
        authorization: Option<&str>,
    ) -> Result<T, FetchError> {
        debug!(operation, endpoint = %self.endpoint, "GraphQL request");

        let body = json!({
            "operationName": operation,
            "query": document,
            "variables": variables,
        });

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        decode_response(operation, status, &bytes)
    }
}

/// Decode a GraphQL HTTP response body.
pub fn decode_response<T: DeserializeOwned>(
    operation: &str,
    status: u16,
    body: &[u8],
) -> Result<T, FetchError> {
    let success = (200..300).contains(&status);

    let envelope: Envelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(_) if !success => {
            return Err(FetchError::HttpError {
                status,
                message: snippet(body),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let errors = envelope.errors.unwrap_or_default();
    match envelope.data {
        Some(data) if !data.is_null() => {
            if !errors.is_empty() {
                let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
                warn!(operation, status, errors = ?messages, "GraphQL returned partial errors");
            }
            Ok(serde_json::from_value(data)?)
        }
        _ if !errors.is_empty() => {
            if success {
                Err(FetchError::GraphQL(errors))
            } else {
                Err(FetchError::HttpError {
                    status,
                    message: errors[0].message.clone(),
                })
            }
        }
        _ if !success => Err(FetchError::HttpError {
            status,
            message: snippet(body),
        }),
        _ => Err(FetchError::ParseError("response has no data".into())),
    }
}

fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    match text.char_indices().nth(200) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Data {
        value: Option<i32>,
    }

    #[test]
    fn test_data_only() {
        let data: Data = decode_response("Op", 200, br#"{"data":{"value":3}}"#).unwrap();
        assert_eq!(data, Data { value: Some(3) });
    }

    #[test]
    fn test_partial_errors_are_tolerated() {
        let body = br#"{"data":{"value":null},"errors":[{"message":"Internal server error","path":["value"]}]}"#;
        let data: Data = decode_response("Op", 200, body).unwrap();
        assert_eq!(data.value, None);
    }

    #[test]
    fn test_errors_without_data() {
        let body = br#"{"data":null,"errors":[{"message":"Syntax Error"}]}"#;
        let err = decode_response::<Data>("Op", 200, body).unwrap_err();
        assert!(matches!(err, FetchError::GraphQL(ref e) if e[0].message == "Syntax Error"));
    }

    #[test]
    fn test_http_error_with_html_body() {
        let err = decode_response::<Data>("Op", 502, b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::HttpError { status: 502, .. }));
    }

    #[test]
    fn test_garbage_success_body() {
        let err = decode_response::<Data>("Op", 200, b"not json").unwrap_err();
        assert!(matches!(err, FetchError::ParseError(_)));

        let err = decode_response::<Data>("Op", 200, b"{}").unwrap_err();
        assert!(matches!(err, FetchError::ParseError(_)));
    }
}
