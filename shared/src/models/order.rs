//! Order record model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Order lifecycle status, as enumerated by the store schema.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Prepping,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order reached a state a customer may reorder from.
    pub fn is_reorderable(self) -> bool {
        matches!(self, OrderStatus::Ready | OrderStatus::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Prepping => "prepping",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// What a cart line item refers to.
///
/// The wire vocabulary (`"ingredient"`, `"saved-salad"`, `"premade"`) is
/// shared by persisted carts and every generation of order record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItemKind {
    #[serde(rename = "ingredient")]
    Ingredient,
    #[serde(rename = "saved-salad")]
    SavedSalad,
    #[serde(rename = "premade")]
    Premade,
}

impl ItemKind {
    /// Parse the wire string. Unknown tags fall back to `Ingredient`,
    /// matching how historical records were consumed.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "saved-salad" => ItemKind::SavedSalad,
            "premade" => ItemKind::Premade,
            _ => ItemKind::Ingredient,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            ItemKind::Ingredient => "ingredient",
            ItemKind::SavedSalad => "saved-salad",
            ItemKind::Premade => "premade",
        }
    }
}

/// Raw order record as returned by the store.
///
/// `items` and `items_detail` stay as raw JSON here; their shape has
/// drifted across schema generations and they are decoded exactly once,
/// by [`crate::history::OrderItems::decode`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub items: Option<Value>,
    #[serde(default)]
    pub items_detail: Option<Value>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub delivery: bool,
    /// Present only on records written after payload versioning landed.
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// Payload version stamped onto newly created orders.
pub const ORDER_SCHEMA_VERSION: u32 = 2;

/// Create payload for an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Flat id -> quantity map kept for backward compatibility.
    pub items: HashMap<String, u32>,
    /// Structured line items; the authoritative representation.
    pub items_detail: Value,
    pub total: f64,
    pub status: OrderStatus,
    pub delivery: bool,
    pub schema_version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_kind_wire_round_trip() {
        for kind in [ItemKind::Ingredient, ItemKind::SavedSalad, ItemKind::Premade] {
            assert_eq!(ItemKind::from_wire(kind.as_wire()), kind);
        }
        // Unknown tags degrade to the plain-ingredient interpretation.
        assert_eq!(ItemKind::from_wire("combo-meal"), ItemKind::Ingredient);
    }

    #[test]
    fn order_record_tolerates_sparse_json() {
        let record: OrderRecord =
            serde_json::from_value(serde_json::json!({ "id": "ord1", "total": 12.5 })).unwrap();
        assert_eq!(record.id, "ord1");
        assert_eq!(record.status, OrderStatus::Pending);
        assert!(record.items.is_none());
        assert!(record.schema_version.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let s = serde_json::to_string(&OrderStatus::Prepping).unwrap();
        assert_eq!(s, "\"prepping\"");
        assert!(OrderStatus::Delivered.is_reorderable());
        assert!(!OrderStatus::Cancelled.is_reorderable());
    }
}
