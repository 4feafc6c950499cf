//! The record-store trait
//!
//! Everything above this trait works against `dyn RecordStore`; the
//! concrete store (network or in-memory) is injected at construction.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::Value;

/// Logical collection names, fixed by the store schema.
pub mod collections {
    pub const INGREDIENTS: &str = "ingredients";
    pub const INGREDIENT_CATEGORY: &str = "ingredient_category";
    pub const SALADS: &str = "salads";
    pub const USER_SALADS: &str = "user_salads";
    pub const ORDERS: &str = "orders";
}

/// Abstract record store: collection CRUD plus an identity probe.
///
/// Records travel as raw JSON at this layer; the typed services in
/// [`crate::services`] own deserialization.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a single record by id. `NotFound` is a typed error, not an
    /// empty success.
    async fn get_record(&self, collection: &str, id: &str) -> ClientResult<Value>;

    /// List every record matching `filter`, in `sort` order. A `-`
    /// prefix on the sort field means descending.
    async fn list_records(
        &self,
        collection: &str,
        filter: Option<&str>,
        sort: Option<&str>,
    ) -> ClientResult<Vec<Value>>;

    async fn create_record(&self, collection: &str, payload: Value) -> ClientResult<Value>;

    async fn update_record(&self, collection: &str, id: &str, patch: Value) -> ClientResult<Value>;

    async fn delete_record(&self, collection: &str, id: &str) -> ClientResult<()>;

    /// Id of the signed-in user, if any.
    fn auth_user_id(&self) -> Option<String>;

    /// The signed-in user id, or `Unauthorized` as a hard error.
    fn require_auth(&self) -> ClientResult<String> {
        self.auth_user_id().ok_or(ClientError::Unauthorized)
    }
}
