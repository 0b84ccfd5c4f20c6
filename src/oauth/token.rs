use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// The response body from the access token endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the token, in seconds.
    pub expires_in: u64,
}

/// A bearer token obtained via the client-credentials flow.
///
/// We record when the token should expire, but we never act on it.
/// Callers who hold on to a client must re-authenticate themselves.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    token_type: String,
    expires_in: Duration,
    obtained_at: Instant,
}

impl AccessToken {
    pub fn new(
        secret: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: Duration,
    ) -> Self {
        Self {
            secret: secret.into(),
            token_type: token_type.into(),
            expires_in,
            obtained_at: Instant::now(),
        }
    }

    /// The raw bearer token.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Token type as reported by the server (typically `Bearer`).
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// When the reported lifetime runs out.
    /// `None` if it lies further out than an `Instant` can represent.
    pub fn expires_at(&self) -> Option<Instant> {
        self.obtained_at.checked_add(self.expires_in)
    }

    /// Whether the reported lifetime has passed. Informational only.
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires_at) => Instant::now() >= expires_at,
            None => false,
        }
    }

    /// The value for an `Authorization` header.
    ///
    /// The API only accepts `Bearer`, regardless of how the server spells `token_type`.
    pub fn bearer_authorization(&self) -> String {
        format!("Bearer {}", self.secret)
    }
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        Self::new(
            response.access_token,
            response.token_type,
            Duration::from_secs(response.expires_in),
        )
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Shared storage for the current access token.
///
/// Authentication replaces the whole value at once, so concurrent callers
/// either see the previous token or the new one, never a mix.
#[derive(Debug, Default)]
pub struct TokenCell {
    inner: RwLock<Option<AccessToken>>,
}

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<AccessToken> {
        self.inner.read().await.clone()
    }

    pub async fn set(&self, token: AccessToken) {
        *self.inner.write().await = Some(token);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}
