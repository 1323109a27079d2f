//! # Cart Collection
//!
//! The `carts` collection of the document store: one [`Cart`] per user, keyed by
//! [`UserId`](crate::model::UserId).
//!
//! ## Structure
//!
//! - [`entity`] - [`Document`](doc_store::Document) implementation for [`Cart`]
//! - [`error`] - [`CartError`] type shared with the cart synchronizer
//! - [`new()`] - Factory function that creates the store actor and client

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CartClient;
use crate::model::Cart;
use doc_store::DocumentActor;

/// Creates the cart collection actor and its client.
pub fn new(buffer_size: usize) -> (DocumentActor<Cart>, CartClient) {
    let (actor, generic_client) = DocumentActor::new("carts", buffer_size);
    (actor, CartClient::new(generic_client))
}
