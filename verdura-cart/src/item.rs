//! Cart line items

use serde::{Deserialize, Serialize};
use shared::models::{Ingredient, ItemKind, Salad, UserSalad};
use std::collections::HashMap;

/// Lazily resolved full record backing a line item. Never persisted;
/// absent until resolution succeeds.
#[derive(Debug, Clone)]
pub enum ResolvedDetails {
    Ingredient(Ingredient),
    SavedSalad(UserSalad),
    CatalogSalad(Salad),
    /// Synthetic descriptor for a customized premade salad; there is no
    /// single store record to point at.
    Custom {
        original_id: String,
        ingredients: HashMap<String, u32>,
    },
}

/// One cart entry: a reference to an ingredient, saved salad or premade
/// salad, plus quantity and the price snapshot captured at add time.
#[derive(Debug, Clone)]
pub struct CartLineItem {
    /// Referenced entity id. Customized items get a synthesized
    /// `{original_id}_custom_{timestamp}` id so they never collide.
    pub id: String,
    pub kind: ItemKind,
    pub quantity: u32,
    pub name: String,
    pub unit_price: f64,
    pub customized: bool,
    /// Ingredient id -> quantity, present only when `customized`.
    pub customization: Option<HashMap<String, u32>>,
    pub resolved: Option<ResolvedDetails>,
}

impl CartLineItem {
    /// Slot identity: `(id, kind)`, mergeable only while not customized.
    pub fn occupies_slot(&self, id: &str, kind: ItemKind) -> bool {
        self.id == id && self.kind == kind
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    /// The catalog id a customized item was derived from.
    pub fn original_id(&self) -> &str {
        match self.id.split_once("_custom_") {
            Some((original, _)) if self.customized => original,
            _ => &self.id,
        }
    }
}

/// Candidate handed to `CartStore::add_item`. The store decides whether
/// it is a customization and what slot it lands in.
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub id: String,
    pub kind: ItemKind,
    pub quantity: u32,
    pub name: String,
    pub unit_price: f64,
    /// Candidate ingredient composition, compared against the referenced
    /// catalog recipe by the tie-break rule.
    pub customization: Option<HashMap<String, u32>>,
}

impl NewCartItem {
    pub fn new(
        id: impl Into<String>,
        kind: ItemKind,
        name: impl Into<String>,
        unit_price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            quantity,
            name: name.into(),
            unit_price,
            customization: None,
        }
    }

    pub fn ingredient(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        quantity: u32,
    ) -> Self {
        Self::new(id, ItemKind::Ingredient, name, unit_price, quantity)
    }

    pub fn saved_salad(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        quantity: u32,
    ) -> Self {
        Self::new(id, ItemKind::SavedSalad, name, unit_price, quantity)
    }

    pub fn premade(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        quantity: u32,
    ) -> Self {
        Self::new(id, ItemKind::Premade, name, unit_price, quantity)
    }

    pub fn with_customization(mut self, composition: HashMap<String, u32>) -> Self {
        self.customization = Some(composition);
        self
    }
}

/// Durable projection of a line item. `resolved` is derived data and is
/// deliberately absent; it is re-fetched after restore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedLineItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub quantity: u32,
    pub name: String,
    pub unit_price: f64,
    #[serde(default)]
    pub customized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<HashMap<String, u32>>,
}

impl From<&CartLineItem> for PersistedLineItem {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.clone(),
            kind: item.kind,
            quantity: item.quantity,
            name: item.name.clone(),
            unit_price: item.unit_price,
            customized: item.customized,
            customization: item.customization.clone(),
        }
    }
}

impl From<PersistedLineItem> for CartLineItem {
    fn from(item: PersistedLineItem) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            quantity: item.quantity,
            name: item.name,
            unit_price: item.unit_price,
            customized: item.customized,
            customization: item.customization,
            resolved: None,
        }
    }
}

/// The customization tie-break: two compositions are the same iff they
/// have equal cardinality and every id maps to an identical quantity on
/// both sides. Pure set equality, no tolerance.
pub fn same_composition(
    original: &HashMap<String, u32>,
    candidate: &HashMap<String, u32>,
) -> bool {
    original.len() == candidate.len()
        && original
            .iter()
            .all(|(id, quantity)| candidate.get(id) == Some(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composition(entries: &[(&str, u32)]) -> HashMap<String, u32> {
        entries.iter().map(|(id, q)| (id.to_string(), *q)).collect()
    }

    #[test]
    fn identical_compositions_are_same() {
        let original = composition(&[("A", 2), ("B", 1)]);
        let candidate = composition(&[("A", 2), ("B", 1)]);
        assert!(same_composition(&original, &candidate));
    }

    #[test]
    fn any_delta_differs() {
        let original = composition(&[("A", 2), ("B", 1)]);
        for candidate in [
            composition(&[("A", 3), ("B", 1)]), // quantity delta
            composition(&[("A", 2)]),           // removed ingredient
            composition(&[("A", 2), ("B", 1), ("C", 1)]), // added ingredient
        ] {
            assert!(!same_composition(&original, &candidate));
        }
    }

    #[test]
    fn original_id_recovers_base() {
        let item = CartLineItem {
            id: "salad9_custom_1712345678901".into(),
            kind: ItemKind::Premade,
            quantity: 1,
            name: "Caesar (Custom)".into(),
            unit_price: 9.0,
            customized: true,
            customization: None,
            resolved: None,
        };
        assert_eq!(item.original_id(), "salad9");
    }

    #[test]
    fn persisted_projection_drops_resolution() {
        let item = CartLineItem {
            id: "ing1".into(),
            kind: ItemKind::Ingredient,
            quantity: 2,
            name: "Rocket".into(),
            unit_price: 1.2,
            customized: false,
            customization: None,
            resolved: Some(ResolvedDetails::Ingredient(Default::default())),
        };
        let persisted = PersistedLineItem::from(&item);
        let json = serde_json::to_value(&persisted).unwrap();
        assert!(json.get("resolved").is_none());
        assert_eq!(json["type"], "ingredient");

        let restored = CartLineItem::from(persisted);
        assert!(restored.resolved.is_none());
        assert_eq!(restored.quantity, 2);
    }
}
