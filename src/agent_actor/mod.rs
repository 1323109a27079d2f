//! Agent pool collection. Read-only to ranking; written by onboarding and
//! position reports.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::AgentClient;
use crate::model::DeliveryAgent;
use doc_store::DocumentActor;

/// Creates the agent collection actor and its client.
pub fn new(buffer_size: usize) -> (DocumentActor<DeliveryAgent>, AgentClient) {
    let (actor, generic_client) = DocumentActor::new("agents", buffer_size);
    (actor, AgentClient::new(generic_client))
}
