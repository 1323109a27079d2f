//! Document trait implementation for the Order model.
//!
//! The store re-checks every status transition when it applies a patch, so two
//! writers racing on the same order cannot walk it out of a terminal state even
//! if both passed their own pre-write check.

use super::OrderError;
use crate::model::{Order, OrderId, OrderPatch, OrderStatus};
use doc_store::Document;

/// Rejects anything that is not an edge of the lifecycle, self-transitions included.
pub fn ensure_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(OrderError::InvalidTransition { from, to })
    }
}

impl Document for Order {
    type Id = OrderId;
    type Patch = OrderPatch;
    type Error = OrderError;

    fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::ValidationError(format!("{} has no items", self.id)));
        }
        if !self.totals_consistent() {
            return Err(OrderError::InvalidTotals(format!(
                "{} + {} != {}",
                self.subtotal, self.delivery_fee, self.total
            )));
        }
        Ok(())
    }

    fn apply_patch(&mut self, patch: OrderPatch) -> Result<(), OrderError> {
        match patch {
            OrderPatch::SetStatus(next) => {
                ensure_transition(self.status, next)?;
                self.status = next;
            }
            OrderPatch::Assign { agent_id, pickup } => {
                if self.status != OrderStatus::Pending {
                    return Err(OrderError::InvalidTransition {
                        from: self.status,
                        to: OrderStatus::Processing,
                    });
                }
                self.status = OrderStatus::Processing;
                self.assigned_agent_id = Some(agent_id);
                self.store_info = Some(pickup);
            }
        }
        Ok(())
    }
}
