//! Commerce error types.
//!
//! Cart, wishlist and preference mutations never fail, so they have no error
//! type. Everything here is either a configuration problem or an "operation
//! failed, data unchanged" signal from a component that talks to a remote
//! collaborator.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while building engine values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Currency code not in the catalog.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Exchange rate must be strictly positive.
    #[error("Invalid exchange rate for {code}: {rate}")]
    InvalidExchangeRate { code: String, rate: Decimal },

    /// Rate table is missing a currency from the catalog.
    #[error("Missing exchange rate for {0}")]
    MissingExchangeRate(String),

    /// Language code not supported.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
}

/// Failure reported by a remote collaborator (catalog, content, orders).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The service answered with errors and no usable data.
    #[error("Service error: {0}")]
    Service(String),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Catalog pipeline failures. Previously fetched data is always retained.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Fetching a page failed.
    #[error("Couldn't refresh the catalog: {0}")]
    Fetch(#[from] SourceError),
}

/// Checkout failures. The cart is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// Orders require a signed-in customer.
    #[error("Please log in to place an order")]
    LoginRequired,

    /// A required billing field was left blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The order service rejected or never received the order.
    #[error("Order could not be placed: {0}")]
    Gateway(#[from] SourceError),
}

/// Authentication failures, phrased for display to the customer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Credentials were rejected.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The authentication service could not be reached.
    #[error("Network error. Please check your connection and try again.")]
    Network(String),

    /// The service answered in an unexpected way.
    #[error("Login failed: {0}")]
    Unexpected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_wraps_source() {
        let err: CatalogError = SourceError::Http {
            status: 502,
            message: "Bad Gateway".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Couldn't refresh the catalog: HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_auth_error_messages_are_user_facing() {
        let err = AuthError::InvalidCredentials("Username not found. Please check your username.".into());
        assert_eq!(err.to_string(), "Username not found. Please check your username.");

        let err = AuthError::Network("connection refused".into());
        assert!(err.to_string().starts_with("Network error."));
    }
}
