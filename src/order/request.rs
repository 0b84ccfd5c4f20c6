//! A typed convenience layer over the order document.
//!
//! The client itself accepts any serializable document and forwards it
//! untouched, so nothing here is required. These types only cover the
//! fields a minimal domestic order needs; anything else can be attached
//! with [`OrderRequest::with_field`].

use serde::Serialize;
use serde_json::{Map, Value};

/// A shipment order, serialized into the shape the orders endpoint expects.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub product_code: String,
    pub receiver_details: ReceiverDetails,
    pub shipment_details: ShipmentDetails,
    /// Additional top-level fields, passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReceiverDetails {
    pub name: ReceiverName,
    pub address: Address,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverName {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub house_no: String,
    pub postal_code: String,
    pub city: String,
    /// ISO 3166-1 alpha-2, e.g. `DE`.
    pub country: String,
}

/// Parcel weight and dimensions. Dimensions are in centimetres.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDetails {
    pub weight_in_grams: u32,
    pub length: u32,
    pub width: u32,
    pub height: u32,
}

impl OrderRequest {
    pub fn new(
        product_code: impl Into<String>,
        receiver_details: ReceiverDetails,
        shipment_details: ShipmentDetails,
    ) -> Self {
        Self {
            product_code: product_code.into(),
            receiver_details,
            shipment_details,
            extra: Map::new(),
        }
    }

    /// Attaches an arbitrary top-level field.
    /// The key must not collide with one of the typed fields.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Renders this order as a plain JSON document.
    pub fn to_document(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl ReceiverDetails {
    pub fn new(name: ReceiverName, address: Address) -> Self {
        Self { name, address }
    }
}

impl ReceiverName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        house_no: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            house_no: house_no.into(),
            postal_code: postal_code.into(),
            city: city.into(),
            country: country.into(),
        }
    }
}

impl ShipmentDetails {
    pub fn new(weight_in_grams: u32, length: u32, width: u32, height: u32) -> Self {
        Self {
            weight_in_grams,
            length,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> OrderRequest {
        OrderRequest::new(
            "GPP",
            ReceiverDetails::new(
                ReceiverName::new("John", "Doe"),
                Address::new("Sample Street", "123", "12345", "Sample City", "DE"),
            ),
            ShipmentDetails::new(1000, 20, 15, 10),
        )
    }

    #[test]
    fn serializes_to_provider_shape() {
        let document = sample().to_document().unwrap();
        assert_eq!(
            document,
            json!({
                "productCode": "GPP",
                "receiverDetails": {
                    "name": { "firstName": "John", "lastName": "Doe" },
                    "address": {
                        "street": "Sample Street",
                        "houseNo": "123",
                        "postalCode": "12345",
                        "city": "Sample City",
                        "country": "DE"
                    }
                },
                "shipmentDetails": {
                    "weightInGrams": 1000,
                    "length": 20,
                    "width": 15,
                    "height": 10
                }
            })
        );
    }

    #[test]
    fn extra_fields_are_flattened() {
        let document = sample()
            .with_field("customerReference", "REF-42")
            .with_field("services", json!({ "premium": true }))
            .to_document()
            .unwrap();

        assert_eq!(document["customerReference"], "REF-42");
        assert_eq!(document["services"]["premium"], true);
        assert_eq!(document["productCode"], "GPP");
    }
}
