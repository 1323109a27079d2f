//! # Cart Synchronization
//!
//! Keeps a local, optimistic view of each user's cart consistent with the
//! `carts` collection.
//!
//! ## Write discipline
//!
//! Every mutation is applied to the local mirror first and then persisted. If the
//! write fails or does not answer within the configured timeout, the local change
//! is discarded, the authoritative cart is re-fetched and the error is returned.
//!
//! Every mutation (adds, quantity changes, removals and checkout) takes a per-cart
//! guard. A second request for the same cart while one is in flight is skipped,
//! not queued. Adds still go through an append-only merge so that lines added
//! from another device survive.
//!
//! Remote changes arrive through [`CartSynchronizer::subscribe`]. Snapshots whose
//! revision is older than the mirror are dropped.

mod checkout;
pub mod synchronizer;

pub use synchronizer::CartSynchronizer;

use tokio::task::JoinHandle;

/// Why a mutation was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another guarded operation on the same cart is in flight.
    Busy,
    /// Quantities below one are ignored; removal is a separate operation.
    InvalidQuantity,
    /// The line is not in the cart.
    UnknownLine,
}

/// Result of a guarded cart operation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    Applied(T),
    Skipped(SkipReason),
}

impl<T> MutationOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Skipped(_) => None,
        }
    }
}

/// Handle to a remote-change listener. Dropping it stops the listener.
#[derive(Debug)]
pub struct CartSubscription {
    task: JoinHandle<()>,
}

impl CartSubscription {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for CartSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
