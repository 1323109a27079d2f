//! # Store Messages
//!
//! This module defines the request type sent from a [`StoreClient`](crate::StoreClient)
//! to a [`DocumentActor`](crate::DocumentActor).
//!
//! The variants mirror the operations of a keyed, subscribable document store:
//!
//! - **Get**: fetch-once read of a key.
//! - **List**: every document currently in the collection.
//! - **Set**: full-document upsert.
//! - **Update**: partial update via [`Document::Patch`](crate::Document::Patch).
//! - **Delete**: remove a key.
//! - **Subscribe**: open a change feed for a key.
//!
//! The request is generic over `T: Document`, so a cart patch can never be sent to
//! the order collection.

use crate::document::Document;
use crate::error::StoreError;
use crate::snapshot::Snapshot;
use tokio::sync::{oneshot, watch};

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest<T: Document> {
    Get {
        id: T::Id,
        respond_to: Response<Snapshot<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Set {
        id: T::Id,
        document: T,
        respond_to: Response<Snapshot<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<Snapshot<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<Snapshot<T>>,
    },
    Subscribe {
        id: T::Id,
        respond_to: Response<watch::Receiver<Snapshot<T>>>,
    },
}
