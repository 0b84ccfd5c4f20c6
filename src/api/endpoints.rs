use url::Url;

use super::{ShippingError, ShippingResult};

/// The resolved URLs for every call this client makes.
///
/// All paths are appended to a base URL, which may itself carry a path
/// (the sandbox lives under `/dpi`, for example).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: Url,
    access_token: Url,
    orders: Url,
}

impl Endpoints {
    /// Resolves the fixed endpoints against the given base URL.
    pub fn new(base_url: Url) -> ShippingResult<Self> {
        let access_token = append_segments(&base_url, &["oauth", "accesstoken"])?;
        let orders = append_segments(&base_url, &["shipping", "v1", "orders"])?;

        Ok(Self {
            base_url,
            access_token,
            orders,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST {base}/oauth/accesstoken`
    pub fn access_token(&self) -> &Url {
        &self.access_token
    }

    /// `POST {base}/shipping/v1/orders`
    pub fn orders(&self) -> &Url {
        &self.orders
    }

    /// `GET {base}/shipping/v1/items/{order_id}/label`
    ///
    /// The order ID is opaque to us, so it's percent-encoded as a single segment.
    pub fn item_label(&self, order_id: &str) -> ShippingResult<Url> {
        if order_id.is_empty() {
            return Err(ShippingError::RequestConstruction(
                "order ID must not be empty".to_string(),
            ));
        }

        append_segments(
            &self.base_url,
            &["shipping", "v1", "items", order_id, "label"],
        )
    }
}

/// Pushes path segments onto a copy of `base`, ignoring any trailing slash it has.
fn append_segments(base: &Url, segments: &[&str]) -> ShippingResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            ShippingError::RequestConstruction(format!("{base} cannot be used as a base URL"))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
