//! # Mock Store & Testing Guide
//!
//! `MockClient<T>` hands out a real [`StoreClient<T>`] whose requests are answered from
//! a queue of expectations instead of a running `DocumentActor`. It makes the failure
//! modes of a remote store easy to reproduce: a rejected write, a closed store, or a
//! write that never answers at all.
//!
//! ## When to use Mocks vs a Real Store
//!
//! | Feature | MockClient | DocumentActor |
//! |---------|------------|---------------|
//! | **State** | None (scripted answers) | Real documents and revisions |
//! | **Error Injection** | Easy (`return_err`, `never_respond`) | Hard |
//! | **Use Case** | Logic *around* the store (rollback, timeouts) | Full flows |
//!
//! ## Example
//!
//! ```rust
//! use doc_store::mock::MockClient;
//! use doc_store::{Document, Snapshot, StoreError};
//!
//! #[derive(Clone, Debug, PartialEq)] struct Note { text: String }
//! #[derive(Debug)] struct NotePatch;
//! #[derive(Debug, thiserror::Error)] #[error("note")] struct NoteError;
//! impl Document for Note {
//!     type Id = u32; type Patch = NotePatch; type Error = NoteError;
//!     fn apply_patch(&mut self, _: NotePatch) -> Result<(), NoteError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Note>::new();
//!     mock.expect_get(1).return_ok(Snapshot::missing());
//!     mock.expect_set(1).return_err(StoreError::ActorClosed);
//!
//!     let client = mock.client();
//!     assert!(client.get(1).await.unwrap().document.is_none());
//!     let result = client.set(1, Note { text: "hi".into() }).await;
//!     assert!(matches!(result, Err(StoreError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_client`] to get a client and the raw receiver, or the fluent
//! [`MockClient`] API.

use crate::client::StoreClient;
use crate::document::Document;
use crate::error::StoreError;
use crate::message::{Response, StoreRequest};
use crate::snapshot::Snapshot;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// What the mock does with a matched request.
enum Reply<R> {
    Respond(Result<R, StoreError>),
    /// Keep the responder alive without answering, simulating a hung write.
    Hang,
}

/// An expected request and the scripted reply.
enum Expectation<T: Document> {
    Get { id: T::Id, reply: Reply<Snapshot<T>> },
    List { reply: Reply<Vec<T>> },
    Set { id: T::Id, reply: Reply<Snapshot<T>> },
    Update { id: T::Id, reply: Reply<Snapshot<T>> },
    Delete { id: T::Id, reply: Reply<Snapshot<T>> },
}

impl<T: Document> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Get { id, .. } => format!("get({id})"),
            Expectation::List { .. } => "list()".to_string(),
            Expectation::Set { id, .. } => format!("set({id})"),
            Expectation::Update { id, .. } => format!("update({id})"),
            Expectation::Delete { id, .. } => format!("delete({id})"),
        }
    }
}

fn answer<R: Send + 'static>(respond_to: Response<R>, reply: Reply<R>, hung: &mut Vec<Box<dyn Send>>) {
    match reply {
        Reply::Respond(result) => {
            let _ = respond_to.send(result);
        }
        Reply::Hang => hung.push(Box::new(respond_to)),
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock store with expectation tracking for fluent testing.
///
/// Requests are matched in order against the queued expectations. A request whose
/// kind or key does not match the next expectation panics the mock task, which
/// surfaces in the test as [`StoreError::ActorDropped`].
pub struct MockClient<T: Document> {
    client: StoreClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Document> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> MockClient<T> {
    /// Creates a new mock store with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            let mut hung: Vec<Box<dyn Send>> = Vec::new();
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (StoreRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, reply }))
                        if id == want =>
                    {
                        answer(respond_to, reply, &mut hung)
                    }
                    (StoreRequest::List { respond_to }, Some(Expectation::List { reply })) => {
                        answer(respond_to, reply, &mut hung)
                    }
                    (
                        StoreRequest::Set { id, respond_to, .. },
                        Some(Expectation::Set { id: want, reply }),
                    ) if id == want => answer(respond_to, reply, &mut hung),
                    (
                        StoreRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: want, reply }),
                    ) if id == want => answer(respond_to, reply, &mut hung),
                    (
                        StoreRequest::Delete { id, respond_to },
                        Some(Expectation::Delete { id: want, reply }),
                    ) if id == want => answer(respond_to, reply, &mut hung),
                    (_, expected) => {
                        let expected = expected.map_or("nothing".to_string(), |e| e.describe());
                        panic!("Unexpected request; expected {expected}");
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> StoreClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Snapshot<T>> {
        self.builder(move |reply| Expectation::Get { id, reply })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|reply| Expectation::List { reply })
    }

    pub fn expect_set(&mut self, id: T::Id) -> ExpectationBuilder<T, Snapshot<T>> {
        self.builder(move |reply| Expectation::Set { id, reply })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, Snapshot<T>> {
        self.builder(move |reply| Expectation::Update { id, reply })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, Snapshot<T>> {
        self.builder(move |reply| Expectation::Delete { id, reply })
    }

    fn builder<R>(
        &mut self,
        make: impl FnOnce(Reply<R>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            make: Box::new(make),
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap();
        if !remaining.is_empty() {
            panic!("Not all expectations were met. {} remaining", remaining.len());
        }
    }
}

/// Builder that finishes an expectation with its reply.
pub struct ExpectationBuilder<T: Document, R> {
    make: Box<dyn FnOnce(Reply<R>) -> Expectation<T> + Send>,
    expectations: Queue<T>,
}

impl<T: Document, R> ExpectationBuilder<T, R> {
    fn push(self, reply: Reply<R>) {
        let expectation = (self.make)(reply);
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Answers the request successfully.
    pub fn return_ok(self, value: R) {
        self.push(Reply::Respond(Ok(value)));
    }

    /// Answers the request with an error.
    pub fn return_err(self, error: StoreError) {
        self.push(Reply::Respond(Err(error)));
    }

    /// Never answers the request. The caller waits until it gives up on its own.
    pub fn never_respond(self) {
        self.push(Reply::Hang);
    }
}

// =============================================================================
// RAW HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// Useful when a test wants to inspect the request payload (e.g., the exact item
/// list a cart write carried) before answering.
pub fn create_mock_client<T: Document>(
    buffer_size: usize,
) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Set request.
pub async fn expect_set<T: Document>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T::Id, T, Response<Snapshot<T>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Set {
            id,
            document,
            respond_to,
        }) => Some((id, document, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request.
pub async fn expect_update<T: Document>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T::Id, T::Patch, Response<Snapshot<T>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Update {
            id,
            patch,
            respond_to,
        }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request.
pub async fn expect_get<T: Document>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T::Id, Response<Snapshot<T>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}
