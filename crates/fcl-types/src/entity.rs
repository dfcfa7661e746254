use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::key::make_key;

/// The kinds of record held in the ledger.
///
/// Each kind owns one key prefix. No prefix is a prefix of another, so a
/// range scan over one kind never returns records of a different kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Farmer,
    Consumer,
    Product,
    Transaction,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Farmer,
        EntityKind::Consumer,
        EntityKind::Product,
        EntityKind::Transaction,
    ];

    /// Key prefix for this kind.
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Farmer => "farmer-",
            Self::Consumer => "consumer-",
            Self::Product => "product-",
            Self::Transaction => "transaction-",
        }
    }

    /// Plural name, as used in collection paths.
    pub const fn plural(&self) -> &'static str {
        match self {
            Self::Farmer => "farmers",
            Self::Consumer => "consumers",
            Self::Product => "products",
            Self::Transaction => "transactions",
        }
    }

    /// The full storage key for `id` under this kind.
    pub fn key_for(&self, id: &str) -> String {
        make_key(self.prefix(), id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Farmer => write!(f, "farmer"),
            Self::Consumer => write!(f, "consumer"),
            Self::Product => write!(f, "product"),
            Self::Transaction => write!(f, "transaction"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = TypeError;

    /// Accepts singular or plural names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| lower == kind.to_string() || lower == kind.plural())
            .ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}

/// A record type stored under one [`EntityKind`].
///
/// A record is the pair of its full prefixed key and its attributes. The
/// key is stored inside the payload, so a decoded record is self-describing.
pub trait Entity: Serialize + DeserializeOwned + Send + 'static {
    /// The kind this record is stored as.
    const KIND: EntityKind;

    /// The caller-supplied attributes (everything except the key).
    type Attributes: Clone
        + fmt::Debug
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Send
        + 'static;

    /// Build a record from its full storage key and attributes.
    fn assemble(key: String, attributes: Self::Attributes) -> Self;

    /// The full prefixed storage key carried in the `id` field.
    fn key(&self) -> &str;

    /// A copy of the record's attributes.
    fn attributes(&self) -> Self::Attributes;

    /// The caller-supplied identifier, i.e. the key without its prefix.
    ///
    /// Returns `None` if the stored `id` does not carry this kind's prefix,
    /// which only happens for payloads written outside the registry.
    fn bare_id(&self) -> Option<&str> {
        self.key().strip_prefix(Self::KIND.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::prefixes_are_disjoint;

    #[test]
    fn prefixes_match_key_scheme() {
        assert_eq!(EntityKind::Farmer.prefix(), "farmer-");
        assert_eq!(EntityKind::Consumer.prefix(), "consumer-");
        assert_eq!(EntityKind::Product.prefix(), "product-");
        assert_eq!(EntityKind::Transaction.prefix(), "transaction-");
    }

    #[test]
    fn prefixes_are_pairwise_disjoint() {
        let prefixes: Vec<&str> = EntityKind::ALL.iter().map(|k| k.prefix()).collect();
        assert!(prefixes_are_disjoint(&prefixes));
    }

    #[test]
    fn key_for_prepends_prefix() {
        assert_eq!(EntityKind::Farmer.key_for("1"), "farmer-1");
        assert_eq!(EntityKind::Product.key_for("1"), "product-1");
    }

    #[test]
    fn parse_singular_and_plural() {
        assert_eq!("farmer".parse::<EntityKind>().unwrap(), EntityKind::Farmer);
        assert_eq!("Products".parse::<EntityKind>().unwrap(), EntityKind::Product);
        assert_eq!(
            "transactions".parse::<EntityKind>().unwrap(),
            EntityKind::Transaction
        );
        assert!("orders".parse::<EntityKind>().is_err());
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.to_string().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&EntityKind::Transaction).unwrap();
        assert_eq!(json, "\"transaction\"");
    }
}
