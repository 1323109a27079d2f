//! # DocumentClient Trait
//!
//! Provides a common interface for collection-specific clients, adding default `fetch`,
//! `fetch_all` and `remove` methods built on top of a generic `StoreClient`.
use crate::{Document, StoreClient, StoreError};
use async_trait::async_trait;

/// Trait for collection-specific clients to inherit standard reads and deletes.
///
/// # Example
///
/// ```rust
/// use doc_store::{Document, DocumentClient, StoreClient, StoreError};
///
/// #[derive(Clone, Debug)]
/// struct Note { text: String }
/// #[derive(Debug)] struct NotePatch(String);
/// #[derive(Debug, thiserror::Error)] #[error("note error: {0}")] struct NoteError(String);
///
/// impl From<String> for NoteError {
///     fn from(s: String) -> Self { NoteError(s) }
/// }
///
/// impl Document for Note {
///     type Id = u32;
///     type Patch = NotePatch;
///     type Error = NoteError;
///     fn apply_patch(&mut self, patch: NotePatch) -> Result<(), NoteError> {
///         self.text = patch.0;
///         Ok(())
///     }
/// }
///
/// struct NoteClient { inner: StoreClient<Note> }
///
/// impl DocumentClient<Note> for NoteClient {
///     type Error = NoteError;
///     fn inner(&self) -> &StoreClient<Note> { &self.inner }
///     fn map_error(e: StoreError) -> NoteError { NoteError(e.to_string()) }
/// }
///
/// async fn usage(client: NoteClient) {
///     // fetch() and remove() are provided automatically
///     let _ = client.fetch(1).await;
///     let _ = client.remove(1).await;
/// }
/// ```
#[async_trait]
pub trait DocumentClient<T: Document>: Send + Sync {
    /// The collection-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic StoreClient.
    fn inner(&self) -> &StoreClient<T>;

    /// Map store errors to the collection error type.
    fn map_error(e: StoreError) -> Self::Error;

    /// Fetch a document by key; `None` when it does not exist.
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner()
            .get(id)
            .await
            .map(|snapshot| snapshot.into_document())
            .map_err(Self::map_error)
    }

    /// Fetch every document in the collection.
    #[tracing::instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Delete a document by key.
    #[tracing::instrument(skip(self))]
    async fn remove(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner()
            .delete(id)
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }
}
