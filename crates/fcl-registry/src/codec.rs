//! Record payload encoding.
//!
//! Records are stored as JSON objects keyed by field name. Decoding a
//! payload that is not valid JSON, or that lacks a required field, is a
//! [`RegistryError::Decode`].

use fcl_types::Entity;

use crate::error::{RegistryError, RegistryResult};

/// Encode a record into its stored payload.
pub fn encode<T: Entity>(record: &T) -> RegistryResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(|source| RegistryError::Encode {
        key: record.key().to_string(),
        source,
    })
}

/// Decode the payload stored at `key`.
pub fn decode<T: Entity>(key: &str, payload: &[u8]) -> RegistryResult<T> {
    serde_json::from_slice(payload).map_err(|source| RegistryError::Decode {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcl_types::{Farmer, FarmerAttributes, Product, ProductAttributes};

    #[test]
    fn payload_is_field_named_json() {
        let farmer = Farmer::assemble(
            "farmer-1".into(),
            FarmerAttributes::new("Alice", "alice@example.com"),
        );
        let payload = encode(&farmer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["id"], "farmer-1");
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["email"], "alice@example.com");
    }

    #[test]
    fn decode_restores_record() {
        let product = Product::assemble(
            "product-10".into(),
            ProductAttributes::new("1", "Tomatoes", "3.50"),
        );
        let payload = encode(&product).unwrap();
        let decoded: Product = decode("product-10", &payload).unwrap();
        assert_eq!(decoded, product);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode::<Farmer>("farmer-1", b"\xff\x00not json").unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("farmer-1"));
    }

    #[test]
    fn empty_payload_is_a_decode_error() {
        let err = decode::<Farmer>("farmer-1", b"").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let err = decode::<Product>("product-1", br#"{"id":"product-1","name":7}"#).unwrap_err();
        assert!(err.is_decode());
    }
}
