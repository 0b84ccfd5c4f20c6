use reqwest::StatusCode;
use thiserror::Error;

/// Possible error types while talking to the shipping API.
///
/// Every failure is handed straight back to the caller.
/// Nothing here is retried or recovered from internally.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// We couldn't assemble a request (or the transport itself) from what we were given.
    #[error("could not construct request: {0}")]
    RequestConstruction(String),

    /// No access token has been obtained yet.
    #[error("no access token available; authenticate first")]
    NotAuthenticated,

    /// The transport failed: DNS, refused connections, its own timeout and so on.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The context deadline elapsed before the call finished.
    #[error("request deadline exceeded")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("authentication failed with status {status}: {body}")]
    Authentication { status: StatusCode, body: String },

    #[error("order creation failed with status {status}: {body}")]
    OrderCreation { status: StatusCode, body: String },

    #[error("label retrieval failed with status {status}: {body}")]
    LabelRetrieval { status: StatusCode, body: String },

    /// The response body was not the JSON we expected.
    #[error("could not decode response: {0}")]
    Decoding(#[source] serde_json::Error),

    /// The order document could not be encoded as JSON.
    #[error("could not serialize order: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Result type for shipping API operations.
pub type ShippingResult<T> = Result<T, ShippingError>;

impl ShippingError {
    /// The HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Authentication { status, .. }
            | Self::OrderCreation { status, .. }
            | Self::LabelRetrieval { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether we gave up waiting, either on the context deadline or the transport timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Network(error) => error.is_timeout(),
            _ => false,
        }
    }

    /// Classifies a transport-level failure.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::RequestConstruction(error.to_string())
        } else {
            Self::Network(error)
        }
    }
}

impl From<url::ParseError> for ShippingError {
    fn from(error: url::ParseError) -> Self {
        Self::RequestConstruction(error.to_string())
    }
}
