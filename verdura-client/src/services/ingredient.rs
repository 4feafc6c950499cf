//! Ingredient catalog service

use super::{decode, decode_list};
use crate::error::ClientResult;
use crate::store::{collections, RecordStore};
use shared::models::Ingredient;
use std::sync::Arc;

#[derive(Clone)]
pub struct IngredientService {
    store: Arc<dyn RecordStore>,
}

impl IngredientService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: &str) -> ClientResult<Ingredient> {
        decode(self.store.get_record(collections::INGREDIENTS, id).await?)
    }

    /// Every ingredient, including retired ones. Order history keeps
    /// referencing ingredients long after they leave the menu.
    pub async fn list_all(&self) -> ClientResult<Vec<Ingredient>> {
        decode_list(
            self.store
                .list_records(collections::INGREDIENTS, None, Some("name"))
                .await?,
        )
    }

    /// All currently orderable ingredients, alphabetical.
    pub async fn list_available(&self) -> ClientResult<Vec<Ingredient>> {
        decode_list(
            self.store
                .list_records(collections::INGREDIENTS, Some("available = true"), Some("name"))
                .await?,
        )
    }

    pub async fn list_by_category(&self, category_id: &str) -> ClientResult<Vec<Ingredient>> {
        let filter = format!("category = \"{category_id}\" && available = true");
        decode_list(
            self.store
                .list_records(collections::INGREDIENTS, Some(&filter), Some("name"))
                .await?,
        )
    }
}
