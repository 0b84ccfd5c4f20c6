//! A small client for the DHL parcel shipping ("DPI") REST API.
//!
//! The flow is strictly linear: obtain an OAuth2 client-credentials token,
//! submit a shipment order, then download the label generated for it.
//!
//! ```no_run
//! use parcelctl::{ClientCredentials, RequestContext, ShippingApiClient};
//! use serde_json::json;
//!
//! # async fn run() -> parcelctl::ShippingResult<()> {
//! let client = ShippingApiClient::new(ClientCredentials::new("id", "secret"))?;
//! let ctx = RequestContext::background();
//!
//! client.authenticate(&ctx).await?;
//! let order_id = client.create_order(&ctx, &json!({ "productCode": "GPP" })).await?;
//! let label = client.get_item_label(&ctx, &order_id).await?;
//! # let _ = label;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod context;
pub mod label;
pub mod oauth;
pub mod order;

pub use api::{ClientConfig, Endpoints, ShippingApiClient, ShippingError, ShippingResult};
pub use context::RequestContext;
pub use label::{FileSink, LabelSink};
pub use oauth::{AccessToken, ClientCredentials};
pub use order::{OrderId, OrderRequest};
