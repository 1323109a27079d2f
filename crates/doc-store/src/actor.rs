//! # Document Actor
//!
//! This module defines the `DocumentActor`, the server side of one collection. It owns
//! the documents, their revisions and the change feeds, and processes requests
//! sequentially so no locking is needed around any of them.

use crate::client::StoreClient;
use crate::document::Document;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::snapshot::Snapshot;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// The actor that manages one collection of documents.
///
/// # Architecture Note
/// This struct is the "Server" half of the store. It owns the state and the receiver
/// end of the request channel. Each collection runs in its own Tokio task and handles
/// one request at a time, which gives every write a total order and lets the actor
/// hand out strictly increasing revisions.
///
/// # Usage Pattern
///
/// 1. **Create**: `DocumentActor::new("carts", 32)` returns the actor and a client.
/// 2. **Run**: spawn `actor.run()` on the runtime.
/// 3. **Use**: clone the client wherever the collection is needed.
///
/// The loop ends when every client has been dropped.
///
/// # Operations
///
/// * **Set**: validates the document, replaces the stored one, bumps the revision.
/// * **Update**: applies the patch to a copy of the stored document (or to
///   [`Document::seed`] when absent), validates the result, then commits. A failed
///   patch leaves the stored document untouched.
/// * **Delete**: removes the document and still bumps the revision so watchers can
///   order the deletion against earlier writes.
/// * **Subscribe**: returns a `watch::Receiver` primed with the current snapshot.
///   Feeds whose receivers are all gone are pruned after the next write.
pub struct DocumentActor<T: Document> {
    collection: &'static str,
    receiver: mpsc::Receiver<StoreRequest<T>>,
    store: HashMap<T::Id, Snapshot<T>>,
    watchers: HashMap<T::Id, watch::Sender<Snapshot<T>>>,
}

impl<T: Document> DocumentActor<T> {
    /// Creates a new `DocumentActor` and its associated `StoreClient`.
    ///
    /// # Arguments
    ///
    /// * `collection` - Name used in every log line emitted by this actor.
    /// * `buffer_size` - Capacity of the request channel. When it is full, client
    ///   calls wait for space.
    pub fn new(collection: &'static str, buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            collection,
            receiver,
            store: HashMap::new(),
            watchers: HashMap::new(),
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the actor's event loop, processing requests until the channel closes.
    pub async fn run(mut self) {
        let collection = self.collection;
        info!(collection, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Get { id, respond_to } => {
                    let snapshot = self.current(&id);
                    debug!(collection, %id, found = snapshot.exists(), "Get");
                    let _ = respond_to.send(Ok(snapshot));
                }
                StoreRequest::List { respond_to } => {
                    let documents: Vec<T> = self
                        .store
                        .values()
                        .filter_map(|snapshot| snapshot.document.clone())
                        .collect();
                    debug!(collection, count = documents.len(), "List");
                    let _ = respond_to.send(Ok(documents));
                }
                StoreRequest::Set {
                    id,
                    document,
                    respond_to,
                } => {
                    debug!(collection, %id, "Set");
                    if let Err(e) = document.validate() {
                        warn!(collection, %id, error = %e, "Set rejected");
                        let _ = respond_to.send(Err(StoreError::Rejected(Box::new(e))));
                        continue;
                    }
                    let snapshot = self.commit(id.clone(), Some(document));
                    info!(collection, %id, revision = snapshot.revision, "Set");
                    let _ = respond_to.send(Ok(snapshot));
                }
                StoreRequest::Update {
                    id,
                    patch,
                    respond_to,
                } => {
                    debug!(collection, %id, ?patch, "Update");
                    let existing = self
                        .store
                        .get(&id)
                        .and_then(|snapshot| snapshot.document.clone());
                    let Some(mut document) = existing.or_else(|| T::seed(&id)) else {
                        warn!(collection, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    };
                    let outcome = document
                        .apply_patch(patch)
                        .and_then(|()| document.validate());
                    if let Err(e) = outcome {
                        warn!(collection, %id, error = %e, "Update rejected");
                        let _ = respond_to.send(Err(StoreError::Rejected(Box::new(e))));
                        continue;
                    }
                    let snapshot = self.commit(id.clone(), Some(document));
                    info!(collection, %id, revision = snapshot.revision, "Updated");
                    let _ = respond_to.send(Ok(snapshot));
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(collection, %id, "Delete");
                    if !self.current(&id).exists() {
                        warn!(collection, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    }
                    let snapshot = self.commit(id.clone(), None);
                    info!(collection, %id, revision = snapshot.revision, "Deleted");
                    let _ = respond_to.send(Ok(snapshot));
                }
                StoreRequest::Subscribe { id, respond_to } => {
                    let current = self.current(&id);
                    let receiver = match self.watchers.get(&id) {
                        Some(sender) => sender.subscribe(),
                        None => {
                            let (sender, receiver) = watch::channel(current);
                            self.watchers.insert(id.clone(), sender);
                            receiver
                        }
                    };
                    debug!(collection, %id, watchers = self.watchers.len(), "Subscribe");
                    let _ = respond_to.send(Ok(receiver));
                }
            }
        }

        info!(collection, size = self.store.len(), "Shutdown");
    }

    fn current(&self, id: &T::Id) -> Snapshot<T> {
        self.store.get(id).cloned().unwrap_or_else(Snapshot::missing)
    }

    /// Stores the new state of `id` under the next revision and notifies watchers.
    fn commit(&mut self, id: T::Id, document: Option<T>) -> Snapshot<T> {
        let revision = self.store.get(&id).map_or(0, |s| s.revision) + 1;
        let snapshot = Snapshot {
            revision,
            updated_at: Some(Utc::now()),
            document,
        };
        self.store.insert(id.clone(), snapshot.clone());

        if let Some(sender) = self.watchers.get(&id) {
            if sender.receiver_count() == 0 {
                debug!(collection = self.collection, %id, "Pruning idle watcher");
                self.watchers.remove(&id);
            } else {
                sender.send_replace(snapshot.clone());
            }
        }
        snapshot
    }
}
