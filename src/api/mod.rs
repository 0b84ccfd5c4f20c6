mod client;
mod endpoints;
mod error;

pub use client::{ClientConfig, ShippingApiClient, DEFAULT_TIMEOUT, SANDBOX_BASE_URL};
pub use endpoints::Endpoints;
pub use error::{ShippingError, ShippingResult};
