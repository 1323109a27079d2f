//! # Document Store
//!
//! An in-process, actor-backed stand-in for a remote real-time document store: keyed
//! documents grouped in collections, full-document upserts, partial updates, deletes,
//! and per-document change feeds.
//!
//! ## Architecture Overview
//!
//! 1. **Document Layer** ([`Document`]) - what a collection stores and how a partial
//!    update merges into it.
//! 2. **Runtime Layer** ([`DocumentActor`]) - one Tokio task per collection that owns
//!    the documents and processes requests one at a time.
//! 3. **Interface Layer** ([`StoreClient`]) - cloneable async handle used by callers.
//!
//! ## Consistency Model
//!
//! Writes to one collection are totally ordered by the actor. Every write bumps the
//! document's revision; readers and subscribers compare revisions to discard stale
//! snapshots. Nothing stronger is offered: two writers holding stale copies of the same
//! document overwrite each other, last write wins.
//!
//! ```rust
//! use doc_store::{Document, DocumentActor};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter { value: i64 }
//! #[derive(Debug)] struct Add(i64);
//! #[derive(Debug, thiserror::Error)] #[error("counter")] struct CounterError;
//!
//! impl Document for Counter {
//!     type Id = String;
//!     type Patch = Add;
//!     type Error = CounterError;
//!     fn apply_patch(&mut self, patch: Add) -> Result<(), CounterError> {
//!         self.value += patch.0;
//!         Ok(())
//!     }
//!     fn seed(_: &String) -> Option<Self> { Some(Counter { value: 0 }) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = DocumentActor::<Counter>::new("counters", 16);
//!     tokio::spawn(actor.run());
//!
//!     let snapshot = client.update("clicks".to_string(), Add(2)).await.unwrap();
//!     assert_eq!(snapshot.revision, 1);
//!     assert_eq!(snapshot.document, Some(Counter { value: 2 }));
//! }
//! ```
//!
//! ## Testing
//!
//! See the [`mock`] module for a scripted store that can fail or hang on demand.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod document;
pub mod error;
pub mod message;
pub mod mock;
pub mod snapshot;

pub use actor::DocumentActor;
pub use client::StoreClient;
pub use client_trait::DocumentClient;
pub use document::Document;
pub use error::StoreError;
pub use message::{Response, StoreRequest};
pub use snapshot::Snapshot;
