//! # Document Trait
//!
//! The `Document` trait defines the contract every stored resource (Cart, Order,
//! DeliveryAgent, …) must implement to live in a [`DocumentActor`](crate::DocumentActor)
//! collection. It names the key type, the partial-update (patch) type and the error
//! type, and provides hooks the actor calls around every write.
//!
//! # Architecture Note
//! The store knows nothing about carts or orders. By expressing "what a full write
//! must satisfy" (`validate`), "how a partial update merges in" (`apply_patch`) and
//! "what an update against a missing key creates" (`seed`) on the document itself,
//! the actor loop is written once and every collection gets the same
//! get / set / update / delete / subscribe surface.
//!
//! # Provided Methods (Hooks)
//! - [`Document::validate`] - defaults to accepting the document.
//! - [`Document::seed`] - defaults to `None`, so updates against a missing key
//!   fail with `NotFound`.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any document must implement to be stored by a `DocumentActor`.
pub trait Document: Clone + Send + Sync + 'static {
    /// The key this document is stored under (e.g., a user id for carts).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// A partial update that can be merged into an existing document.
    type Patch: Send + Sync + Debug;

    /// The error type for this document.
    ///
    /// Returned from the hooks when a write would break a document invariant.
    /// The actor boxes it into [`StoreError::Rejected`](crate::StoreError::Rejected).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Checks the invariants of a full document before it replaces the stored one.
    fn validate(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Merges a partial update into the stored document.
    ///
    /// Called with exclusive access; a returned error leaves the stored
    /// document untouched.
    fn apply_patch(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;

    /// Document an update creates when no document exists under `id`.
    ///
    /// Returning `Some` gives the update "set with merge" semantics.
    fn seed(_id: &Self::Id) -> Option<Self> {
        None
    }
}
