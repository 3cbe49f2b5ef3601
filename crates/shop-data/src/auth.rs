//! Sign-in against the WordPress REST API.
//!
//! A JWT token is requested first. Sites without the JWT plugin get a second
//! attempt with HTTP Basic credentials against `users/me`, and the encoded
//! credentials then serve as the session token.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use shop_commerce::auth::{AuthProvider, AuthSession, TokenScheme, User};
use shop_commerce::AuthError;
use tracing::{debug, info, warn};

use crate::error::FetchError;

const FALLBACK_USER_ID: &str = "1";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    user_display_name: Option<String>,
    #[serde(default)]
    user_email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WpUser {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WpErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// [`AuthProvider`] for a WordPress site.
#[derive(Debug, Clone)]
pub struct WordPressAuth {
    http: Client,
    base_url: String,
}

impl WordPressAuth {
    /// `base_url` is the REST root, e.g. `https://example.com/wp-json`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn token_url(&self) -> String {
        format!("{}/jwt-auth/v1/token", self.base_url)
    }

    fn me_url(&self) -> String {
        format!("{}/wp/v2/users/me", self.base_url)
    }

    /// `Ok(None)` means the JWT endpoint declined and Basic should be tried.
    async fn try_jwt(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AuthSession>, AuthError> {
        let response = self
            .http
            .post(self.token_url())
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "JWT sign-in declined");
            return Ok(None);
        }

        let body = response.bytes().await.map_err(network)?;
        match serde_json::from_slice::<TokenResponse>(&body) {
            Ok(token) => Ok(session_from_token(token, username)),
            Err(e) => {
                warn!(error = %e, "Unreadable JWT response");
                Ok(None)
            }
        }
    }

    async fn try_basic(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let credentials = basic_credentials(username, password);
        let response = self
            .http
            .get(self.me_url())
            .header(AUTHORIZATION, format!("Basic {credentials}"))
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let body = response.bytes().await.map_err(network)?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "Basic sign-in rejected");
            return Err(AuthError::InvalidCredentials(failure_message(&body)));
        }

        let user: WpUser =
            serde_json::from_slice(&body).map_err(|e| AuthError::Unexpected(e.to_string()))?;
        Ok(AuthSession::new(
            credentials,
            TokenScheme::Basic,
            user_from_profile(user, username),
        ))
    }
}

#[async_trait]
impl AuthProvider for WordPressAuth {
    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let session = match self.try_jwt(username, password).await? {
            Some(session) => session,
            None => self.try_basic(username, password).await?,
        };
        info!(user = %session.user.id, scheme = session.scheme.as_str(), "Signed in");
        Ok(session)
    }
}

fn network(e: reqwest::Error) -> AuthError {
    AuthError::Network(e.to_string())
}

/// `user:password` in standard base64.
pub fn basic_credentials(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{username}:{password}"))
}

/// User-facing message for a rejected sign-in response body.
pub fn failure_message(body: &[u8]) -> String {
    let error: WpErrorBody = serde_json::from_slice(body).unwrap_or_default();
    match error.code.as_deref() {
        Some("incorrect_password") => {
            "Invalid password. Please check your password and try again.".to_string()
        }
        Some("invalid_username") => "Username not found. Please check your username.".to_string(),
        _ => error
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Invalid username or password.".to_string()),
    }
}

fn session_from_token(token: TokenResponse, username: &str) -> Option<AuthSession> {
    let jwt = token.token.filter(|t| !t.is_empty())?;
    let user = User::new(
        id_text(token.user_id),
        token
            .user_display_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| username.to_string()),
        token.user_email.unwrap_or_default(),
    );
    Some(AuthSession::new(jwt, TokenScheme::Bearer, user))
}

fn user_from_profile(profile: WpUser, username: &str) -> User {
    User::new(
        id_text(profile.id),
        profile
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| username.to_string()),
        profile.email.unwrap_or_default(),
    )
}

fn id_text(id: Option<Value>) -> String {
    match id {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => FALLBACK_USER_ID.to_string(),
    }
}
