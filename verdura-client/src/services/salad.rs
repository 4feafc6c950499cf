//! Premade salad catalog service

use super::{decode, decode_list};
use crate::error::ClientResult;
use crate::store::{collections, RecordStore};
use shared::models::Salad;
use std::sync::Arc;

#[derive(Clone)]
pub struct SaladService {
    store: Arc<dyn RecordStore>,
}

impl SaladService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: &str) -> ClientResult<Salad> {
        decode(self.store.get_record(collections::SALADS, id).await?)
    }

    pub async fn list_available(&self) -> ClientResult<Vec<Salad>> {
        decode_list(
            self.store
                .list_records(
                    collections::SALADS,
                    Some("available = true"),
                    Some("display_order"),
                )
                .await?,
        )
    }
}
