//! Resolved display model
//!
//! Derived, never persisted. Whatever shape an order record arrived in,
//! presentation sees exactly these types.

use serde::Serialize;
use shared::models::{ItemKind, OrderStatus, INGREDIENT_EMOJI, SALAD_EMOJI};

/// One ingredient of a display item's breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayIngredient {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub quantity: u32,
    pub unit_price: f64,
    /// The id did not resolve against the live catalog; the entry is
    /// kept for deferred resolution instead of being dropped.
    pub needs_lookup: bool,
}

impl DisplayIngredient {
    /// The single generic entry substituted when customization data was
    /// lost to the known-invalid sentinel shape.
    pub fn custom_placeholder(item_id: &str) -> Self {
        Self {
            id: format!("{item_id}_custom_ingredient"),
            name: "Custom Ingredient".to_string(),
            emoji: INGREDIENT_EMOJI.to_string(),
            quantity: 1,
            unit_price: 0.0,
            needs_lookup: false,
        }
    }

    /// The entry shown when a salad's recipe can no longer be resolved
    /// at all; the breakdown list never renders empty.
    pub fn base_placeholder(salad_id: &str) -> Self {
        Self {
            id: format!("{salad_id}_base"),
            name: "Base ingredients".to_string(),
            emoji: INGREDIENT_EMOJI.to_string(),
            quantity: 1,
            unit_price: 0.0,
            needs_lookup: false,
        }
    }

    pub fn unresolved(id: &str, quantity: u32) -> Self {
        Self {
            id: id.to_string(),
            name: "Unknown".to_string(),
            emoji: INGREDIENT_EMOJI.to_string(),
            quantity,
            unit_price: 0.0,
            needs_lookup: true,
        }
    }
}

/// Uniform display item reconstructed from a historical order.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayItem {
    pub id: String,
    pub kind: ItemKind,
    pub name: String,
    pub emoji: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub ingredients: Vec<DisplayIngredient>,
    pub ingredient_count: usize,
    pub customized: bool,
    pub original_salad_id: Option<String>,
    pub category_name: Option<String>,
}

impl DisplayItem {
    pub(crate) fn salad(
        id: impl Into<String>,
        kind: ItemKind,
        name: impl Into<String>,
        quantity: u32,
        unit_price: f64,
        ingredients: Vec<DisplayIngredient>,
    ) -> Self {
        let ingredient_count = ingredients.len();
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            emoji: SALAD_EMOJI.to_string(),
            quantity,
            unit_price,
            ingredients,
            ingredient_count,
            customized: false,
            original_salad_id: None,
            category_name: None,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// One historical order, normalized for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedOrder {
    pub id: String,
    pub status: OrderStatus,
    pub total: f64,
    pub delivery: bool,
    pub created: Option<String>,
    pub items: Vec<DisplayItem>,
}
