//! # Store Errors
//!
//! Common error type returned by every store operation. Document-specific
//! failures travel boxed inside [`StoreError::Rejected`] so callers can
//! downcast them back to their own error enum.

/// Errors that can occur while talking to a document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store closed")]
    ActorClosed,
    #[error("Store dropped response channel")]
    ActorDropped,
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Write rejected: {0}")]
    Rejected(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Returns the document error if this is a rejected write of type `E`.
    pub fn rejection<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            StoreError::Rejected(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
