//! Order collection, its document rules and the status lifecycle.

pub mod entity;
pub mod error;
pub mod lifecycle;

pub use entity::ensure_transition;
pub use error::*;
pub use lifecycle::OrderLifecycle;

use crate::clients::OrderClient;
use crate::model::Order;
use doc_store::DocumentActor;

/// Creates the order collection actor and its client.
pub fn new(buffer_size: usize) -> (DocumentActor<Order>, OrderClient) {
    let (actor, generic_client) = DocumentActor::new("orders", buffer_size);
    (actor, OrderClient::new(generic_client))
}
