//! Typed per-collection services
//!
//! Thin, typed wrappers over [`crate::RecordStore`]. Each service owns
//! the filter/sort strings for its collection and the decoding of raw
//! records into `shared` models. Operations on user-owned collections
//! are auth-gated here, not in the store.

mod category;
mod ingredient;
mod order;
mod salad;
mod user_salad;

pub use category::CategoryService;
pub use ingredient::IngredientService;
pub use order::OrderService;
pub use salad::SaladService;
pub use user_salad::UserSaladService;

use crate::error::ClientResult;
use serde::de::DeserializeOwned;
use serde_json::Value;

fn decode<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    Ok(serde_json::from_value(value)?)
}

fn decode_list<T: DeserializeOwned>(values: Vec<Value>) -> ClientResult<Vec<T>> {
    values.into_iter().map(decode).collect()
}
