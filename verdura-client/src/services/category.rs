//! Ingredient category service

use super::decode_list;
use crate::store::{collections, RecordStore};
use shared::models::IngredientCategory;
use std::sync::Arc;

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn RecordStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All categories in menu order. The menu can render without the
    /// store, so a fetch failure degrades to the built-in set instead of
    /// propagating.
    pub async fn list(&self) -> Vec<IngredientCategory> {
        let fetched = self
            .store
            .list_records(collections::INGREDIENT_CATEGORY, None, Some("order"))
            .await
            .and_then(decode_list);
        match fetched {
            Ok(categories) if !categories.is_empty() => categories,
            Ok(_) => fallback_categories(),
            Err(err) => {
                tracing::warn!(error = %err, "category fetch failed, using fallback set");
                fallback_categories()
            }
        }
    }
}

/// The stock category set shipped with the storefront.
fn fallback_categories() -> Vec<IngredientCategory> {
    vec![
        IngredientCategory::new("base", "Base", "Salad", 1),
        IngredientCategory::new("protein", "Protein", "Beef", 2),
        IngredientCategory::new("toppings", "Toppings", "Cherry", 3),
        IngredientCategory::new("dressing", "Dressing", "Droplets", 4),
        IngredientCategory::new("extras", "Extras", "Plus", 5),
    ]
}
