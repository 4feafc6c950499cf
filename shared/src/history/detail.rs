//! Structured `items_detail` decoding
//!
//! Entries arrive with a declared `type`, but the nested payloads are the
//! messy part: `customizations` may be an array of `{id, quantity}`
//! pairs, an object map, or the known-invalid sentinel
//! `[{id: "ingredients", quantity: null}]` written by a historical bug;
//! embedded `ingredients` may be an array of objects, a map of numbers,
//! or a map of detail objects. Every shape is sniffed here and nowhere
//! else.

use crate::models::ItemKind;
use serde_json::Value;

/// Coerce a loosely-typed JSON quantity into a count.
///
/// Accepts integers, floats (rounded) and numeric strings; rejects
/// null/negative/non-numeric values.
pub(crate) fn as_quantity(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(q) = n.as_u64() {
                u32::try_from(q).ok()
            } else {
                let f = n.as_f64()?;
                (f >= 0.0).then(|| f.round() as u32)
            }
        }
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(|f| {
            (f >= 0.0).then(|| f.round() as u32)
        }),
        _ => None,
    }
}

/// Decoded customization payload of a premade entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CustomizationPayload {
    /// No customization data present.
    #[default]
    None,
    /// The known-invalid sentinel shape. The real data is lost; render a
    /// placeholder, and on reorder fall back to the base salad.
    Placeholder,
    /// Usable id -> quantity entries, whichever shape they arrived in.
    Entries(Vec<(String, u32)>),
}

impl CustomizationPayload {
    pub fn decode(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => CustomizationPayload::None,
            Some(Value::Array(entries)) => {
                let is_sentinel = entries.iter().any(|e| {
                    e.get("id").and_then(Value::as_str) == Some("ingredients")
                        && e.get("quantity").map(Value::is_null).unwrap_or(false)
                });
                if is_sentinel {
                    return CustomizationPayload::Placeholder;
                }
                let pairs = entries
                    .iter()
                    .filter_map(|e| {
                        let id = e.get("id").and_then(Value::as_str)?;
                        if id == "ingredients" {
                            return None;
                        }
                        let quantity = as_quantity(e.get("quantity")?)?;
                        Some((id.to_string(), quantity))
                    })
                    .collect();
                CustomizationPayload::Entries(pairs)
            }
            Some(Value::Object(map)) => {
                let pairs = map
                    .iter()
                    .filter_map(|(id, qty)| {
                        if id == "ingredients" || qty.is_null() {
                            return None;
                        }
                        Some((id.clone(), as_quantity(qty).unwrap_or(1)))
                    })
                    .collect();
                CustomizationPayload::Entries(pairs)
            }
            Some(other) => {
                tracing::warn!(?other, "unrecognized customizations shape");
                CustomizationPayload::None
            }
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CustomizationPayload::Placeholder)
    }

    /// Usable entries, if any survived decoding.
    pub fn entries(&self) -> Option<&[(String, u32)]> {
        match self {
            CustomizationPayload::Entries(pairs) if !pairs.is_empty() => Some(pairs),
            _ => None,
        }
    }
}

/// One ingredient of an embedded breakdown, normalized from any of the
/// three historical shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddedIngredient {
    pub id: Option<String>,
    pub name: Option<String>,
    pub quantity: u32,
    pub price: Option<f64>,
    pub emoji: Option<String>,
}

pub(crate) fn decode_embedded_ingredients(value: Option<&Value>) -> Vec<EmbeddedIngredient> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|e| {
                let obj = e.as_object()?;
                Some(EmbeddedIngredient {
                    id: obj.get("id").and_then(Value::as_str).map(String::from),
                    name: obj.get("name").and_then(Value::as_str).map(String::from),
                    quantity: obj.get("quantity").and_then(as_quantity).unwrap_or(1),
                    price: obj.get("price").and_then(Value::as_f64),
                    emoji: obj.get("emoji").and_then(Value::as_str).map(String::from),
                })
            })
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(id, info)| match info {
                // Legacy map of bare quantities.
                Value::Number(_) | Value::String(_) => Some(EmbeddedIngredient {
                    id: Some(id.clone()),
                    quantity: as_quantity(info)?,
                    ..Default::default()
                }),
                // Map of nested detail objects.
                Value::Object(detail) => Some(EmbeddedIngredient {
                    id: Some(id.clone()),
                    name: detail.get("name").and_then(Value::as_str).map(String::from),
                    quantity: detail.get("quantity").and_then(as_quantity).unwrap_or(1),
                    price: detail.get("price").and_then(Value::as_f64),
                    emoji: detail.get("emoji").and_then(Value::as_str).map(String::from),
                }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// One decoded `items_detail` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDetail {
    pub kind: ItemKind,
    pub id: String,
    pub name: Option<String>,
    pub quantity: u32,
    pub price: f64,
    pub customized: bool,
    pub customizations: CustomizationPayload,
    pub ingredients: Vec<EmbeddedIngredient>,
    pub original_salad_id: Option<String>,
}

impl OrderItemDetail {
    /// Decode one raw entry. Returns `None` only when the entry has no
    /// usable id; every other irregularity degrades field-by-field.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("id").and_then(Value::as_str)?.to_string();
        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .map(ItemKind::from_wire)
            .unwrap_or(ItemKind::Ingredient);

        Some(OrderItemDetail {
            kind,
            id,
            name: obj.get("name").and_then(Value::as_str).map(String::from),
            quantity: obj.get("quantity").and_then(as_quantity).unwrap_or(1),
            price: obj.get("price").and_then(Value::as_f64).unwrap_or(0.0),
            customized: obj.get("customized").and_then(Value::as_bool).unwrap_or(false),
            customizations: CustomizationPayload::decode(obj.get("customizations")),
            ingredients: decode_embedded_ingredients(obj.get("ingredients")),
            original_salad_id: obj
                .get("originalSaladId")
                .and_then(Value::as_str)
                .map(String::from),
        })
    }

    /// Whether this premade entry should be treated as customized.
    ///
    /// Old records sometimes carry the flag only implicitly, in the item
    /// name.
    pub fn is_flagged_custom(&self) -> bool {
        self.customized
            || self
                .name
                .as_deref()
                .map(|n| n.contains("Custom"))
                .unwrap_or(false)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Item")
    }
}
