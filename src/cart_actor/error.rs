//! Error types for carts and the cart synchronizer.

use crate::order_actor::OrderError;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// No cart is stored for this user.
    #[error("Cart not found: {0}")]
    NotFound(String),

    /// A stored cart must hold at least one line; empty carts are deleted instead.
    #[error("Cart is empty")]
    EmptyCart,

    /// A line failed validation (e.g., zero quantity, duplicate line id).
    #[error("Invalid cart line: {0}")]
    InvalidLine(String),

    /// Checkout needs a resolved drop-off position.
    #[error("Drop-off location is not resolved")]
    DropoffUnresolved,

    /// Checkout needs a determinable delivery fee.
    #[error("Delivery fee cannot be determined yet")]
    FeeUndetermined,

    /// A remote write did not answer within the configured bound.
    #[error("Cart write timed out after {0} ms")]
    Timeout(u128),

    /// Placing the order at checkout failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// An error occurred while communicating with the document store.
    #[error("Store communication error: {0}")]
    StoreCommunicationError(String),
}

impl From<String> for CartError {
    fn from(msg: String) -> Self {
        CartError::StoreCommunicationError(msg)
    }
}
