use crate::model::{DeliveryAgent, Order};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Assignment notification failed: {0}")]
pub struct NotifyError(pub String);

/// Tells the outside world (push, SMS, the agent's app) that an order was assigned.
#[async_trait]
pub trait AssignmentNotifier: Send + Sync {
    async fn notify(&self, order: &Order, agent: &DeliveryAgent) -> Result<(), NotifyError>;
}

/// Writes assignments to the log and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl AssignmentNotifier for TracingNotifier {
    async fn notify(&self, order: &Order, agent: &DeliveryAgent) -> Result<(), NotifyError> {
        info!(
            order_id = %order.id,
            agent_id = %agent.id,
            agent = %agent.name,
            "Order assigned to agent"
        );
        Ok(())
    }
}
