use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

/// The OAuth2 client ID and secret issued by the shipping provider.
///
/// These are fixed for the lifetime of a client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Whether either half of the pair is missing.
    pub fn is_empty(&self) -> bool {
        self.client_id.is_empty() || self.client_secret.is_empty()
    }

    /// The value for an `Authorization` header: `Basic base64(id:secret)`.
    pub fn basic_authorization(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(pair))
    }
}

// The secret must never end up in logs.
impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
