//! Order status transitions on top of the `orders` collection.

use super::{ensure_transition, OrderError};
use crate::clients::{DocumentClient, OrderClient};
use crate::model::{AgentId, Order, OrderId, OrderPatch, OrderStatus, PickupLocation};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Drives orders through `pending → processing → delivered | cancelled`.
///
/// Every transition is checked against the order as currently stored before
/// anything is written. Money fields are never part of a write after
/// [`OrderLifecycle::place`].
#[derive(Clone)]
pub struct OrderLifecycle {
    orders: OrderClient,
}

impl OrderLifecycle {
    pub fn new(orders: OrderClient) -> Self {
        Self { orders }
    }

    /// Persists a freshly built order.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn place(&self, order: Order) -> Result<Order, OrderError> {
        if !order.totals_consistent() {
            warn!(total = %order.total, "Refusing order with inconsistent totals");
            return Err(OrderError::InvalidTotals(order.id.to_string()));
        }
        if order.status != OrderStatus::Pending {
            return Err(OrderError::ValidationError(format!(
                "new orders start pending, got {}",
                order.status
            )));
        }
        let placed = self.orders.put(order).await?;
        info!(total = %placed.total, "Order placed");
        Ok(placed)
    }

    pub async fn get(&self, order_id: &OrderId) -> Result<Order, OrderError> {
        self.orders
            .fetch(order_id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    /// Moves an order to `next`, rejecting anything the lifecycle does not allow.
    #[instrument(skip(self))]
    pub async fn set_status(&self, order_id: &OrderId, next: OrderStatus) -> Result<Order, OrderError> {
        let current = self.get(order_id).await?;
        ensure_transition(current.status, next)?;
        let updated = self
            .orders
            .patch(order_id.clone(), OrderPatch::SetStatus(next))
            .await?;
        info!(from = %current.status, to = %updated.status, "Status changed");
        Ok(updated)
    }

    pub async fn start_processing(&self, order_id: &OrderId) -> Result<Order, OrderError> {
        self.set_status(order_id, OrderStatus::Processing).await
    }

    pub async fn mark_delivered(&self, order_id: &OrderId) -> Result<Order, OrderError> {
        self.set_status(order_id, OrderStatus::Delivered).await
    }

    pub async fn cancel(&self, order_id: &OrderId) -> Result<Order, OrderError> {
        self.set_status(order_id, OrderStatus::Cancelled).await
    }

    /// Hands a pending order to an agent: status, agent and pickup change in one write.
    #[instrument(skip(self, pickup))]
    pub async fn assign(
        &self,
        order_id: &OrderId,
        agent_id: AgentId,
        pickup: PickupLocation,
    ) -> Result<Order, OrderError> {
        let current = self.get(order_id).await?;
        ensure_transition(current.status, OrderStatus::Processing)?;
        let updated = self
            .orders
            .patch(order_id.clone(), OrderPatch::Assign { agent_id, pickup })
            .await?;
        info!(agent_id = ?updated.assigned_agent_id, "Order assigned");
        Ok(updated)
    }

    /// Number of `processing` orders each agent is currently carrying.
    pub async fn active_assignments(&self) -> Result<HashMap<AgentId, u32>, OrderError> {
        let orders = self.orders.fetch_all().await?;
        let mut active = HashMap::new();
        for order in orders {
            if order.status != OrderStatus::Processing {
                continue;
            }
            if let Some(agent_id) = order.assigned_agent_id {
                *active.entry(agent_id).or_insert(0) += 1;
            }
        }
        Ok(active)
    }
}
