//! Error types for the Order collection and lifecycle.

use crate::model::OrderStatus;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The requested status change is not an edge of the lifecycle.
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// `total` does not equal `subtotal + deliveryFee`.
    #[error("Order totals are inconsistent: {0}")]
    InvalidTotals(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the document store.
    #[error("Store communication error: {0}")]
    StoreCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::StoreCommunicationError(msg)
    }
}
