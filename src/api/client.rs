use bytes::Bytes;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

use super::{Endpoints, ShippingError, ShippingResult};
use crate::{
    context::RequestContext,
    oauth::{AccessToken, ClientCredentials, TokenCell, TokenResponse},
    order::{OrderCreated, OrderId},
};

/// The DHL parcel shipping sandbox.
pub const SANDBOX_BASE_URL: &str = "https://api-sandbox.dhl.com/dpi";

/// How long any single request may take, end to end.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how the client talks to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(SANDBOX_BASE_URL).expect("sandbox base URL should be valid"),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

/// A client for the shipping API.
///
/// Calls must happen in order: [`authenticate`](Self::authenticate) first,
/// then [`create_order`](Self::create_order), then
/// [`get_item_label`](Self::get_item_label). Each call issues exactly one
/// request and nothing is ever retried.
///
/// The access token lives behind a lock, so a single client can be shared
/// between tasks. Re-authenticating simply replaces the stored token.
#[derive(Debug)]
pub struct ShippingApiClient {
    /// Immutable for the lifetime of this client.
    credentials: ClientCredentials,
    /// The most recently obtained access token, if any.
    token: TokenCell,
    endpoints: Endpoints,
    http: reqwest::Client,
}

impl ShippingApiClient {
    /// Creates a client against the sandbox with the default timeout.
    pub fn new(credentials: ClientCredentials) -> ShippingResult<Self> {
        Self::with_config(credentials, &ClientConfig::default())
    }

    /// Creates a client against an arbitrary base URL.
    pub fn with_config(
        credentials: ClientCredentials,
        config: &ClientConfig,
    ) -> ShippingResult<Self> {
        let endpoints = Endpoints::new(config.base_url.clone())?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|error| ShippingError::RequestConstruction(error.to_string()))?;

        Ok(Self {
            credentials,
            token: TokenCell::new(),
            endpoints,
            http,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// The token from the last successful authentication, if any.
    pub async fn access_token(&self) -> Option<AccessToken> {
        self.token.get().await
    }

    /// Forgets the stored token. The next call will need to authenticate again.
    pub async fn clear_token(&self) {
        self.token.clear().await;
    }

    /// Obtains an access token via the OAuth2 client-credentials flow and stores it.
    ///
    /// On failure, any previously stored token is left as it was.
    pub async fn authenticate(&self, ctx: &RequestContext) -> ShippingResult<AccessToken> {
        // The token endpoint wants our credentials via HTTP Basic,
        // alongside a form content type with nothing in the body.
        let request = self
            .http
            .post(self.endpoints.access_token().clone())
            .header(AUTHORIZATION, self.credentials.basic_authorization())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("");

        let (status, body) = self.execute(ctx, request).await?;
        if status != StatusCode::OK {
            tracing::warn!(%status, "Authentication rejected");
            return Err(ShippingError::Authentication {
                status,
                body: body_text(&body),
            });
        }

        let response: TokenResponse = decode(&body)?;
        let token = AccessToken::from(response);
        self.token.set(token.clone()).await;

        tracing::info!(
            client_id = self.credentials.client_id(),
            expires_in_secs = token.expires_in().as_secs(),
            "Obtained access token"
        );
        Ok(token)
    }

    /// Submits a shipment order and returns the identifier the API assigned to it.
    ///
    /// The order is forwarded as-is; we don't validate it against any schema.
    pub async fn create_order<T>(
        &self,
        ctx: &RequestContext,
        order: &T,
    ) -> ShippingResult<OrderId>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(order).map_err(ShippingError::Serialization)?;
        let authorization = self.bearer_authorization().await?;

        let request = self
            .http
            .post(self.endpoints.orders().clone())
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);

        let (status, body) = self.execute(ctx, request).await?;
        if status != StatusCode::CREATED {
            tracing::warn!(%status, "Order creation rejected");
            return Err(ShippingError::OrderCreation {
                status,
                body: body_text(&body),
            });
        }

        let created: OrderCreated = decode(&body)?;
        tracing::info!(order_id = %created.order_id, "Created order");
        Ok(created.order_id)
    }

    /// Downloads the label for an order.
    ///
    /// The bytes (usually a PDF) are returned exactly as the API sent them.
    pub async fn get_item_label(
        &self,
        ctx: &RequestContext,
        order_id: &OrderId,
    ) -> ShippingResult<Bytes> {
        let url = self.endpoints.item_label(order_id.as_str())?;
        let authorization = self.bearer_authorization().await?;

        let request = self.http.get(url).header(AUTHORIZATION, authorization);

        let (status, body) = self.execute(ctx, request).await?;
        if status != StatusCode::OK {
            tracing::warn!(%status, %order_id, "Label retrieval rejected");
            return Err(ShippingError::LabelRetrieval {
                status,
                body: body_text(&body),
            });
        }

        tracing::info!(%order_id, size = body.len(), "Retrieved label");
        Ok(body)
    }

    async fn bearer_authorization(&self) -> ShippingResult<String> {
        self.token
            .get()
            .await
            .map(|token| token.bearer_authorization())
            .ok_or(ShippingError::NotAuthenticated)
    }

    /// Sends a request and reads its body to completion, unless `ctx` gives up first.
    ///
    /// A context that is already done fails before anything goes out on the wire.
    async fn execute(
        &self,
        ctx: &RequestContext,
        request: RequestBuilder,
    ) -> ShippingResult<(StatusCode, Bytes)> {
        ctx.check()?;

        let request = request
            .build()
            .map_err(|error| ShippingError::RequestConstruction(error.to_string()))?;
        tracing::debug!(method = %request.method(), url = %request.url(), "Sending request");

        ctx.run(async {
            let response = self
                .http
                .execute(request)
                .await
                .map_err(ShippingError::from_transport)?;

            // We always drain the body, even for errors, so the connection can be reused.
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(ShippingError::from_transport)?;
            Ok((status, body))
        })
        .await
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ShippingResult<T> {
    serde_json::from_slice(body).map_err(ShippingError::Decoding)
}

fn body_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_sandbox() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "https://api-sandbox.dhl.com/dpi");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("parcelctl/"));
    }

    #[tokio::test]
    async fn new_client_has_no_token() {
        let client = ShippingApiClient::new(ClientCredentials::new("id", "secret")).unwrap();
        assert!(client.access_token().await.is_none());
        assert_eq!(
            client.endpoints().access_token().as_str(),
            "https://api-sandbox.dhl.com/dpi/oauth/accesstoken"
        );
    }

    #[tokio::test]
    async fn unauthenticated_calls_fail_early() {
        let client = ShippingApiClient::new(ClientCredentials::new("id", "secret")).unwrap();
        let ctx = RequestContext::background();

        let result = client.create_order(&ctx, &serde_json::json!({})).await;
        assert!(matches!(result, Err(ShippingError::NotAuthenticated)));

        let result = client.get_item_label(&ctx, &OrderId::from("ORD-1")).await;
        assert!(matches!(result, Err(ShippingError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn empty_order_id_is_rejected_before_sending() {
        let client = ShippingApiClient::new(ClientCredentials::new("id", "secret")).unwrap();
        let result = client
            .get_item_label(&RequestContext::background(), &OrderId::from(""))
            .await;
        assert!(matches!(result, Err(ShippingError::RequestConstruction(_))));
    }

    #[test]
    fn non_utf8_bodies_are_still_reported() {
        assert_eq!(body_text(b"bad \xFF address"), "bad \u{FFFD} address");
    }
}
