//! Stored record types.
//!
//! Each record is a flat, field-named structure whose `id` is the full
//! prefixed storage key. Every attribute is text, including prices and
//! amounts, so the payload never depends on a numeric encoding.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

// ---------------------------------------------------------------------------
// Farmer
// ---------------------------------------------------------------------------

/// A registered farmer.
///
/// Two payload shapes exist for farmers: one carrying an email and one
/// carrying a location. Both decode into this type; `email` falls back to
/// an empty string and `location` to `None` when absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farmer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Caller-supplied farmer attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmerAttributes {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl FarmerAttributes {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl Entity for Farmer {
    const KIND: EntityKind = EntityKind::Farmer;
    type Attributes = FarmerAttributes;

    fn assemble(key: String, attributes: FarmerAttributes) -> Self {
        Self {
            id: key,
            name: attributes.name,
            email: attributes.email,
            location: attributes.location,
        }
    }

    fn key(&self) -> &str {
        &self.id
    }

    fn attributes(&self) -> FarmerAttributes {
        FarmerAttributes {
            name: self.name.clone(),
            email: self.email.clone(),
            location: self.location.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Consumer
// ---------------------------------------------------------------------------

/// A registered consumer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    pub id: String,
    pub name: String,
    pub location: String,
}

/// Caller-supplied consumer attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerAttributes {
    pub name: String,
    pub location: String,
}

impl ConsumerAttributes {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

impl Entity for Consumer {
    const KIND: EntityKind = EntityKind::Consumer;
    type Attributes = ConsumerAttributes;

    fn assemble(key: String, attributes: ConsumerAttributes) -> Self {
        Self {
            id: key,
            name: attributes.name,
            location: attributes.location,
        }
    }

    fn key(&self) -> &str {
        &self.id
    }

    fn attributes(&self) -> ConsumerAttributes {
        ConsumerAttributes {
            name: self.name.clone(),
            location: self.location.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A product offered by a farmer.
///
/// `farmer_id` is an opaque reference; it is not checked against the
/// farmer registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub farmer_id: String,
    pub name: String,
    pub price: String,
}

/// Caller-supplied product attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributes {
    pub farmer_id: String,
    pub name: String,
    pub price: String,
}

impl ProductAttributes {
    pub fn new(
        farmer_id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            farmer_id: farmer_id.into(),
            name: name.into(),
            price: price.into(),
        }
    }
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;
    type Attributes = ProductAttributes;

    fn assemble(key: String, attributes: ProductAttributes) -> Self {
        Self {
            id: key,
            farmer_id: attributes.farmer_id,
            name: attributes.name,
            price: attributes.price,
        }
    }

    fn key(&self) -> &str {
        &self.id
    }

    fn attributes(&self) -> ProductAttributes {
        ProductAttributes {
            farmer_id: self.farmer_id.clone(),
            name: self.name.clone(),
            price: self.price.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A sale between a farmer and a consumer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub farmer_id: String,
    pub consumer_id: String,
    pub amount: String,
    pub timestamp: String,
}

/// Caller-supplied transaction attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAttributes {
    pub farmer_id: String,
    pub consumer_id: String,
    pub amount: String,
    pub timestamp: String,
}

impl TransactionAttributes {
    pub fn new(
        farmer_id: impl Into<String>,
        consumer_id: impl Into<String>,
        amount: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            farmer_id: farmer_id.into(),
            consumer_id: consumer_id.into(),
            amount: amount.into(),
            timestamp: timestamp.into(),
        }
    }
}

impl Entity for Transaction {
    const KIND: EntityKind = EntityKind::Transaction;
    type Attributes = TransactionAttributes;

    fn assemble(key: String, attributes: TransactionAttributes) -> Self {
        Self {
            id: key,
            farmer_id: attributes.farmer_id,
            consumer_id: attributes.consumer_id,
            amount: attributes.amount,
            timestamp: attributes.timestamp,
        }
    }

    fn key(&self) -> &str {
        &self.id
    }

    fn attributes(&self) -> TransactionAttributes {
        TransactionAttributes {
            farmer_id: self.farmer_id.clone(),
            consumer_id: self.consumer_id.clone(),
            amount: self.amount.clone(),
            timestamp: self.timestamp.clone(),
        }
    }
}
