//! Ingredient category model

use serde::{Deserialize, Serialize};

/// Ingredient category entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientCategory {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon_name: Option<String>,
    /// Display position within the menu sidebar
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

impl IngredientCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: &str, order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon_name: Some(icon.to_string()),
            order,
            ..Default::default()
        }
    }
}
