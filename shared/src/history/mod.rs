//! Historical order ingestion
//!
//! Order records have gone through several schema generations: a flat
//! `items` map with type information smuggled into the key strings, then
//! a structured `items_detail` list whose nested ingredient and
//! customization payloads themselves exist in at least three shapes.
//!
//! Everything store-shaped is decoded here, exactly once, into a closed
//! set of variants. Consumers (the cart's reorder engine, the order
//! normalizer) never look at raw JSON and never re-parse key strings.

mod detail;
mod key;

pub use detail::{CustomizationPayload, EmbeddedIngredient, OrderItemDetail};
pub use key::HistoryItemKey;

use crate::models::OrderRecord;
use serde_json::Value;

/// The decoded contents of one historical order.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderItems {
    /// Structured `items_detail` entries (current generation).
    Detailed(Vec<OrderItemDetail>),
    /// Legacy flat map, keys already classified.
    Legacy(Vec<(HistoryItemKey, u32)>),
    /// Nothing usable in either representation.
    Empty,
}

impl OrderItems {
    /// Decode an order record, preferring the structured representation.
    ///
    /// Malformed `items_detail` entries are dropped individually; if none
    /// survive, decoding falls back to the legacy map. The legacy `items`
    /// field is tolerated both as a JSON object and as a JSON-encoded
    /// string (older records were written that way).
    pub fn decode(order: &OrderRecord) -> OrderItems {
        if let Some(Value::Array(entries)) = &order.items_detail {
            let details: Vec<OrderItemDetail> = entries
                .iter()
                .filter_map(|entry| {
                    let detail = OrderItemDetail::from_value(entry);
                    if detail.is_none() {
                        tracing::warn!(order_id = %order.id, "dropping malformed items_detail entry");
                    }
                    detail
                })
                .collect();
            if !details.is_empty() {
                return OrderItems::Detailed(details);
            }
        }

        let legacy = decode_legacy_map(order.items.as_ref());
        if legacy.is_empty() {
            OrderItems::Empty
        } else {
            OrderItems::Legacy(legacy)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, OrderItems::Empty)
    }
}

fn decode_legacy_map(items: Option<&Value>) -> Vec<(HistoryItemKey, u32)> {
    let map = match items {
        Some(Value::Object(map)) => map.clone(),
        // Some early records stored the map JSON-encoded inside a string.
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::warn!("legacy items field holds an unparseable string");
                return Vec::new();
            }
        },
        _ => return Vec::new(),
    };

    map.iter()
        .filter_map(|(key, value)| {
            let quantity = detail::as_quantity(value)?;
            if quantity == 0 {
                tracing::warn!(key = %key, "skipping zero-quantity legacy entry");
                return None;
            }
            Some((HistoryItemKey::parse(key), quantity))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_with(items: Value, items_detail: Option<Value>) -> OrderRecord {
        OrderRecord {
            id: "ord1".into(),
            items: Some(items),
            items_detail,
            ..Default::default()
        }
    }

    #[test]
    fn prefers_structured_detail() {
        let order = order_with(
            json!({"ing1": 2}),
            Some(json!([
                {"type": "ingredient", "id": "ing9", "quantity": 3, "price": 1.5}
            ])),
        );
        match OrderItems::decode(&order) {
            OrderItems::Detailed(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].id, "ing9");
                assert_eq!(details[0].quantity, 3);
            }
            other => panic!("expected detailed decode, got {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_legacy_when_detail_is_garbage() {
        let order = order_with(json!({"ing1": 2}), Some(json!([{"quantity": 1}])));
        match OrderItems::decode(&order) {
            OrderItems::Legacy(entries) => assert_eq!(entries.len(), 1),
            other => panic!("expected legacy decode, got {other:?}"),
        }
    }

    #[test]
    fn legacy_keys_classify_three_ways() {
        let order = order_with(
            json!({"salad_abc123": 2, "ing1_from_abc123": 1, "ing2": 3}),
            None,
        );
        let OrderItems::Legacy(mut entries) = OrderItems::decode(&order) else {
            panic!("expected legacy decode");
        };
        entries.sort_by_key(|(_, q)| *q);

        assert_eq!(
            entries[0].0,
            HistoryItemKey::SaladIngredient {
                ingredient_id: "ing1".into(),
                salad_id: "abc123".into()
            }
        );
        assert_eq!(
            entries[1].0,
            HistoryItemKey::SavedSalad {
                salad_id: "abc123".into()
            }
        );
        assert_eq!(entries[2].0, HistoryItemKey::Ingredient { id: "ing2".into() });
    }

    #[test]
    fn tolerates_string_encoded_items() {
        let order = order_with(json!("{\"ing1\": 2}"), None);
        match OrderItems::decode(&order) {
            OrderItems::Legacy(entries) => {
                assert_eq!(entries, vec![(HistoryItemKey::Ingredient { id: "ing1".into() }, 2)]);
            }
            other => panic!("expected legacy decode, got {other:?}"),
        }
    }

    #[test]
    fn empty_everything_is_empty() {
        let order = order_with(json!({}), Some(json!([])));
        assert!(OrderItems::decode(&order).is_empty());

        let order = OrderRecord::default();
        assert!(OrderItems::decode(&order).is_empty());
    }

    #[test]
    fn zero_quantity_entries_are_dropped() {
        let order = order_with(json!({"ing1": 0, "ing2": 1}), None);
        let OrderItems::Legacy(entries) = OrderItems::decode(&order) else {
            panic!("expected legacy decode");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, HistoryItemKey::Ingredient { id: "ing2".into() });
    }
}
