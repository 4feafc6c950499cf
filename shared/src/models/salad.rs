//! Catalog salad model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One ingredient slot in a catalog salad's recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaladIngredient {
    pub id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Premade catalog salad entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Salad {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    /// Recipe as stored: a list of `{id, quantity}` pairs.
    #[serde(default)]
    pub ingredients: Vec<SaladIngredient>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub seasonal: bool,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub display_order: i32,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub serving_size: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

fn default_available() -> bool {
    true
}

impl Salad {
    /// The recipe as an id -> quantity map, the form the customization
    /// tie-break compares against.
    pub fn ingredient_map(&self) -> HashMap<String, u32> {
        self.ingredients
            .iter()
            .map(|i| (i.id.clone(), i.quantity))
            .collect()
    }
}
