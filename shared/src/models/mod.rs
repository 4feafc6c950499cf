//! Record models
//!
//! Field-compatible with the remote store's collection schema. The store
//! returns loosely-typed JSON, so almost every field is `#[serde(default)]`
//! and decoding never fails on a missing attribute.

pub mod category;
pub mod ingredient;
pub mod order;
pub mod salad;
pub mod user_salad;

/// Fallback glyph for ingredients without one of their own.
pub const INGREDIENT_EMOJI: &str = "🥬";
/// Glyph used for every salad-shaped display item.
pub const SALAD_EMOJI: &str = "🥗";

// Re-exports
pub use category::*;
pub use ingredient::*;
pub use order::*;
pub use salad::*;
pub use user_salad::*;
