//! Cart error types

use crate::persist::StorageError;
use thiserror::Error;
use verdura_client::ClientError;

/// Cart operation error
#[derive(Debug, Error)]
pub enum CartError {
    /// Gateway failure that could not be recovered locally
    /// (authentication, checkout submission).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Checkout was attempted with nothing in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// The historical order holds no usable items in any representation
    #[error("Order has no items to reorder")]
    EmptyOrder,

    /// Every sub-operation of a reorder failed; reported once, after all
    /// of them were attempted.
    #[error("None of the {attempted} order items could be added back")]
    NothingReordered { attempted: usize },

    /// Cart persistence failed on an operation where it matters
    /// (explicit restore; routine saves only log).
    #[error("Cart storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for cart operations
pub type CartResult<T> = Result<T, CartError>;
