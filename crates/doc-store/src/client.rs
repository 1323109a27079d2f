//! # Store Client
//!
//! This module defines the generic client for talking to a `DocumentActor`.

use crate::document::Document;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::snapshot::Snapshot;
use tokio::sync::{mpsc, oneshot, watch};

/// ## StoreClient
///
/// The `StoreClient<T>` is the async, keyed-document API of one collection. Each call
/// sends a [`StoreRequest`] over a Tokio mpsc channel and awaits the answer on a
/// oneshot channel.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Async API** – every method resolves to `Result<…, StoreError>`.
/// * **Generic** – works with any type that implements [`Document`].
pub struct StoreClient<T: Document> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Document> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Document> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        request: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> StoreRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    /// Fetch-once read. A missing key yields a snapshot with no document.
    pub async fn get(&self, id: T::Id) -> Result<Snapshot<T>, StoreError> {
        self.call(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.call(|respond_to| StoreRequest::List { respond_to })
            .await
    }

    /// Full-document upsert.
    pub async fn set(&self, id: T::Id, document: T) -> Result<Snapshot<T>, StoreError> {
        self.call(|respond_to| StoreRequest::Set {
            id,
            document,
            respond_to,
        })
        .await
    }

    /// Partial update merged by [`Document::apply_patch`].
    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<Snapshot<T>, StoreError> {
        self.call(|respond_to| StoreRequest::Update {
            id,
            patch,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<Snapshot<T>, StoreError> {
        self.call(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }

    /// Opens a change feed for `id`, primed with the current snapshot.
    ///
    /// Dropping the receiver releases the feed.
    pub async fn subscribe(&self, id: T::Id) -> Result<watch::Receiver<Snapshot<T>>, StoreError> {
        self.call(|respond_to| StoreRequest::Subscribe { id, respond_to })
            .await
    }
}
