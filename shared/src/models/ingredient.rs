//! Ingredient model

use serde::{Deserialize, Serialize};

/// Catalog ingredient entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Category reference (String ID)
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

fn default_available() -> bool {
    true
}

impl Ingredient {
    /// Display emoji, falling back to the generic leafy-green glyph.
    pub fn emoji_or_default(&self) -> &str {
        self.emoji.as_deref().unwrap_or(super::INGREDIENT_EMOJI)
    }
}
