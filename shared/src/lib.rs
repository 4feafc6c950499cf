//! Shared types for the Verdura storefront
//!
//! Record models mirroring the remote store schema, the ingestion types
//! for historical order records, and small utilities used by both the
//! gateway and the cart crates.

pub mod history;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// History re-exports (decode-once ingestion boundary)
pub use history::{CustomizationPayload, HistoryItemKey, OrderItemDetail, OrderItems};

// Model re-exports
pub use models::{
    Ingredient, IngredientCategory, ItemKind, OrderCreate, OrderRecord, OrderStatus, Salad,
    UserSalad,
};
