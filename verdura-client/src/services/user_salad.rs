//! Saved user-salad service
//!
//! The collection is user-owned; listing and mutation require a
//! signed-in identity and surface `Unauthorized` as a hard error.
//! Fetching a single salad by id does not — historical orders reference
//! saved salads by bare id and are resolved without ownership context.

use super::{decode, decode_list};
use crate::error::ClientResult;
use crate::store::{collections, RecordStore};
use serde_json::json;
use shared::models::{UserSalad, UserSaladCreate};
use std::sync::Arc;

#[derive(Clone)]
pub struct UserSaladService {
    store: Arc<dyn RecordStore>,
}

impl UserSaladService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: &str) -> ClientResult<UserSalad> {
        decode(self.store.get_record(collections::USER_SALADS, id).await?)
    }

    /// The signed-in user's saved salads, newest first.
    pub async fn list_mine(&self) -> ClientResult<Vec<UserSalad>> {
        let user_id = self.store.require_auth()?;
        let filter = format!("user_id = \"{user_id}\"");
        decode_list(
            self.store
                .list_records(collections::USER_SALADS, Some(&filter), Some("-created"))
                .await?,
        )
    }

    pub async fn create(&self, mut payload: UserSaladCreate) -> ClientResult<UserSalad> {
        // Ownership comes from the session, not the caller.
        payload.user_id = self.store.require_auth()?;
        let value = serde_json::to_value(&payload)?;
        decode(self.store.create_record(collections::USER_SALADS, value).await?)
    }

    pub async fn update(&self, id: &str, patch: serde_json::Value) -> ClientResult<UserSalad> {
        self.store.require_auth()?;
        decode(
            self.store
                .update_record(collections::USER_SALADS, id, patch)
                .await?,
        )
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.store.require_auth()?;
        self.store.delete_record(collections::USER_SALADS, id).await
    }

    pub async fn set_favorite(&self, id: &str, is_favorite: bool) -> ClientResult<UserSalad> {
        self.store.require_auth()?;
        decode(
            self.store
                .update_record(
                    collections::USER_SALADS,
                    id,
                    json!({ "is_favorite": is_favorite }),
                )
                .await?,
        )
    }
}
