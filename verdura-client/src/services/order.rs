//! Order service

use super::{decode, decode_list};
use crate::error::ClientResult;
use crate::store::{collections, RecordStore};
use serde_json::Value;
use shared::models::{OrderCreate, OrderRecord, OrderStatus};
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn RecordStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: &str) -> ClientResult<OrderRecord> {
        decode(self.store.get_record(collections::ORDERS, id).await?)
    }

    /// The signed-in user's order history, newest first.
    pub async fn list_mine(&self) -> ClientResult<Vec<OrderRecord>> {
        let user_id = self.store.require_auth()?;
        let filter = format!("user_id = \"{user_id}\"");
        decode_list(
            self.store
                .list_records(collections::ORDERS, Some(&filter), Some("-created"))
                .await?,
        )
    }

    pub async fn create(&self, payload: OrderCreate) -> ClientResult<OrderRecord> {
        let mut value = serde_json::to_value(&payload)?;
        // Guest checkout: never send an owner the store would reject.
        if self.store.auth_user_id().is_none() {
            if let Value::Object(obj) = &mut value {
                obj.remove("user_id");
            }
        }
        decode(self.store.create_record(collections::ORDERS, value).await?)
    }

    pub async fn update_status(&self, id: &str, status: OrderStatus) -> ClientResult<OrderRecord> {
        decode(
            self.store
                .update_record(
                    collections::ORDERS,
                    id,
                    serde_json::json!({ "status": status }),
                )
                .await?,
        )
    }
}
