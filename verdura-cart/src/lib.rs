//! Cart and order-history engine for the Verdura storefront
//!
//! The two data-shaping cores of the client: the [`CartStore`] state
//! container (slot merging, the customization tie-break, best-effort
//! reorder from history, checkout) and the [`OrderNormalizer`], which
//! reconstructs a uniform display model from every historical
//! order-record shape the store has accumulated.
//!
//! Both take the record gateway as an injected dependency and never
//! block on it: remote lookups are suspension points, and per-item
//! resolution failures degrade to placeholders or skips instead of
//! aborting bulk operations.

pub mod error;
pub mod item;
pub mod normalizer;
pub mod notify;
pub mod persist;
pub mod reorder;
pub mod store;

// Re-export main types
pub use error::{CartError, CartResult};
pub use item::{CartLineItem, NewCartItem, PersistedLineItem, ResolvedDetails};
pub use normalizer::{DisplayIngredient, DisplayItem, NormalizedOrder, OrderNormalizer};
pub use notify::ToastSink;
pub use persist::{CartStorage, JsonCartFile, StorageError};
pub use reorder::ReorderSummary;
pub use store::CartStore;
