//! Saved user salad model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-owned saved salad entity
///
/// Unlike catalog salads, the recipe is stored as an id -> quantity map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSalad {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ingredients: HashMap<String, u32>,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fats: f64,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// Create payload for a saved salad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSaladCreate {
    pub user_id: String,
    pub name: String,
    pub ingredients: HashMap<String, u32>,
    pub total_price: f64,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fats: f64,
    #[serde(default)]
    pub is_favorite: bool,
}
