//! Customer session.
//!
//! The session token is persisted raw under `auth-token`, the user record as
//! JSON under `user-data`. Both must be present and well-formed for a session
//! to survive a restart; otherwise both are removed.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shop_cache::Cache;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::cart::CartStore;
use crate::error::AuthError;
use crate::ids::UserId;

pub const AUTH_TOKEN_KEY: &str = "auth-token";
pub const USER_DATA_KEY: &str = "user-data";
pub const AUTH_SCHEME_KEY: &str = "auth-scheme";

const EVENT_CAPACITY: usize = 16;

/// Signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// First and last name split on the first space, for prefilling forms.
    pub fn name_parts(&self) -> (&str, &str) {
        let name = self.name.trim();
        name.split_once(' ').unwrap_or((name, ""))
    }
}

/// How the token is presented to the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenScheme {
    /// JWT issued by the token endpoint.
    #[default]
    Bearer,
    /// Base64 `user:password` pair.
    Basic,
}

impl TokenScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScheme::Bearer => "bearer",
            TokenScheme::Basic => "basic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bearer" => Some(TokenScheme::Bearer),
            "basic" => Some(TokenScheme::Basic),
            _ => None,
        }
    }
}

/// An authenticated session.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub scheme: TokenScheme,
    pub user: User,
}

impl AuthSession {
    pub fn new(token: impl Into<String>, scheme: TokenScheme, user: User) -> Self {
        Self {
            token: token.into(),
            scheme,
            user,
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        match self.scheme {
            TokenScheme::Bearer => format!("Bearer {}", self.token),
            TokenScheme::Basic => format!("Basic {}", self.token),
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"[redacted]")
            .field("scheme", &self.scheme)
            .field("user", &self.user)
            .finish()
    }
}

/// Credential exchange with the authentication service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthSession, AuthError>;
}

/// Session change notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoggedIn(User),
    LoggedOut,
}

/// Holds the current session and keeps it in storage.
pub struct SessionStore {
    session: Mutex<Option<AuthSession>>,
    cache: Cache,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn open(cache: Cache) -> Self {
        let session = Self::rehydrate(&cache);
        if let Some(session) = &session {
            debug!(user = %session.user.id, "Session restored");
        }
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: Mutex::new(session),
            cache,
            events,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Cache::memory())
    }

    fn rehydrate(cache: &Cache) -> Option<AuthSession> {
        let token = match cache.get_raw(AUTH_TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                return None;
            }
        };

        let user = match cache.get::<User>(USER_DATA_KEY) {
            Ok(Some(user)) => user,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Discarding malformed session");
                cache.forget(AUTH_TOKEN_KEY);
                cache.forget(USER_DATA_KEY);
                cache.forget(AUTH_SCHEME_KEY);
                return None;
            }
        };

        let scheme = cache
            .get_raw(AUTH_SCHEME_KEY)
            .ok()
            .flatten()
            .and_then(|s| TokenScheme::from_str(&s))
            .unwrap_or_default();

        Some(AuthSession::new(token, scheme, user))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn session(&self) -> Option<AuthSession> {
        self.lock().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Exchange credentials for a session.
    ///
    /// On failure the previous session, if any, is left as it was.
    pub async fn login(
        &self,
        provider: &dyn AuthProvider,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let session = match provider.authenticate(username, password).await {
            Ok(session) => session,
            Err(e) => {
                warn!(username, error = %e, "Login failed");
                return Err(e);
            }
        };

        if let Err(e) = self.cache.set_raw(AUTH_TOKEN_KEY, &session.token) {
            warn!(error = %e, "Failed to persist session token");
        }
        self.cache.persist(USER_DATA_KEY, &session.user);
        if let Err(e) = self.cache.set_raw(AUTH_SCHEME_KEY, session.scheme.as_str()) {
            warn!(error = %e, "Failed to persist session scheme");
        }

        let user = session.user.clone();
        *self.lock() = Some(session);
        info!(user = %user.id, "Logged in");
        let _ = self.events.send(SessionEvent::LoggedIn(user.clone()));
        Ok(user)
    }

    /// End the session and empty the cart.
    pub fn logout(&self, cart: &CartStore) {
        let had_session = self.lock().take().is_some();
        self.cache.forget(AUTH_TOKEN_KEY);
        self.cache.forget(USER_DATA_KEY);
        self.cache.forget(AUTH_SCHEME_KEY);
        cart.clear();
        if had_session {
            info!("Logged out");
            let _ = self.events.send(SessionEvent::LoggedOut);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<AuthSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartProduct;
    use rust_decimal::dec;

    struct StaticProvider;

    #[async_trait]
    impl AuthProvider for StaticProvider {
        async fn authenticate(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
            if password == "secret" {
                Ok(AuthSession::new(
                    "jwt-token",
                    TokenScheme::Bearer,
                    User::new("7", "Aysel Mammadova", format!("{username}@example.com")),
                ))
            } else {
                Err(AuthError::InvalidCredentials(
                    "Invalid password. Please check your password and try again.".into(),
                ))
            }
        }
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let cache = Cache::memory();
        let store = SessionStore::open(cache.clone());
        let user = store.login(&StaticProvider, "aysel", "secret").await.unwrap();
        assert_eq!(user.name_parts(), ("Aysel", "Mammadova"));

        let restored = SessionStore::open(cache);
        let session = restored.session().unwrap();
        assert_eq!(session.authorization(), "Bearer jwt-token");
        assert_eq!(session.user.email, "aysel@example.com");
    }

    #[tokio::test]
    async fn test_failed_login_keeps_state() {
        let store = SessionStore::in_memory();
        let err = store.login(&StaticProvider, "aysel", "wrong").await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid password"));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_cart() {
        let cache = Cache::memory();
        let store = SessionStore::open(cache.clone());
        let cart = CartStore::open(cache.clone());
        store.login(&StaticProvider, "aysel", "secret").await.unwrap();
        cart.add_item(CartProduct::new("p1", "Tea", dec!(3), "tea"), 1);

        store.logout(&cart);
        assert!(!store.is_authenticated());
        assert!(cart.is_empty());
        assert!(!cache.exists(AUTH_TOKEN_KEY).unwrap());
        assert!(!cache.exists(USER_DATA_KEY).unwrap());
    }

    #[test]
    fn test_malformed_user_data_discards_both() {
        let cache = Cache::memory();
        cache.set_raw(AUTH_TOKEN_KEY, "jwt-token").unwrap();
        cache.set_raw(USER_DATA_KEY, "{broken").unwrap();

        let store = SessionStore::open(cache.clone());
        assert!(!store.is_authenticated());
        assert!(!cache.exists(AUTH_TOKEN_KEY).unwrap());
        assert!(!cache.exists(USER_DATA_KEY).unwrap());
    }

    #[test]
    fn test_token_without_user_is_no_session() {
        let cache = Cache::memory();
        cache.set_raw(AUTH_TOKEN_KEY, "jwt-token").unwrap();
        assert!(SessionStore::open(cache).session().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = AuthSession::new("very-secret", TokenScheme::Basic, User::new("1", "A", ""));
        assert!(!format!("{session:?}").contains("very-secret"));
    }
}
