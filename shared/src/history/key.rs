//! Legacy item-key classification
//!
//! The first order schema encoded item type in the map key itself:
//! `salad_<id>` for a saved salad, `<ingredientId>_from_<saladId>` for an
//! ingredient that was part of a salad breakdown, anything else a plain
//! ingredient id. Keys are parsed here once; nothing downstream touches
//! the raw strings again.

/// Classified legacy order-item key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistoryItemKey {
    /// `salad_<id>`: a reference to a user-saved salad.
    SavedSalad { salad_id: String },
    /// `<ingredientId>_from_<saladId>`: an ingredient recorded as part of
    /// a salad breakdown. The salad id is informational only.
    SaladIngredient {
        ingredient_id: String,
        salad_id: String,
    },
    /// A plain ingredient id.
    Ingredient { id: String },
}

impl HistoryItemKey {
    pub fn parse(key: &str) -> Self {
        if let Some(salad_id) = key.strip_prefix("salad_") {
            return HistoryItemKey::SavedSalad {
                salad_id: salad_id.to_string(),
            };
        }
        if let Some((ingredient_id, salad_id)) = key.split_once("_from_") {
            return HistoryItemKey::SaladIngredient {
                ingredient_id: ingredient_id.to_string(),
                salad_id: salad_id.to_string(),
            };
        }
        HistoryItemKey::Ingredient {
            id: key.to_string(),
        }
    }

    /// The entity id this key resolves through the gateway.
    pub fn target_id(&self) -> &str {
        match self {
            HistoryItemKey::SavedSalad { salad_id } => salad_id,
            HistoryItemKey::SaladIngredient { ingredient_id, .. } => ingredient_id,
            HistoryItemKey::Ingredient { id } => id,
        }
    }
}
