//! Operator-driven dispatch: pick a pickup point, rank agents, confirm one.

use super::{AssignmentNotifier, LocationError, LocationProvider};
use crate::agent_actor::AgentError;
use crate::clients::AgentClient;
use crate::dispatch::{rank, Ranking};
use crate::model::{Order, OrderId, OrderStatus, PickupLocation, RankedAgent};
use crate::order_actor::{OrderError, OrderLifecycle};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("Pickup lookup failed: {0}")]
    Geocoding(#[from] LocationError),

    /// Only pending orders can be dispatched.
    #[error("Order {order_id} is {status}, not awaiting dispatch")]
    NotAwaitingDispatch {
        order_id: String,
        status: OrderStatus,
    },

    #[error("No candidate at rank {0}")]
    UnknownCandidate(usize),
}

/// How the operator names the pickup point.
#[derive(Debug, Clone, PartialEq)]
pub enum PickupQuery {
    /// Already picked on a map or from a saved list.
    Place(PickupLocation),
    /// Free text to geocode.
    Search(String),
}

/// Everything the operator needs to choose an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    pub order: Order,
    pub pickup: PickupLocation,
    pub ranking: Ranking,
}

impl DispatchPlan {
    pub fn candidate(&self, rank_index: usize) -> Option<&RankedAgent> {
        self.ranking.get(rank_index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Ready(DispatchPlan),
    /// The pool is empty, or every agent is at capacity or unlocated.
    NoAgentsAvailable,
    /// Distances cannot be computed from an unresolved pickup.
    PickupUnresolved,
}

/// Wires ranking and the order lifecycle together for one dispatch.
#[derive(Clone)]
pub struct DispatchWorkflow {
    lifecycle: OrderLifecycle,
    agents: AgentClient,
    locations: Arc<dyn LocationProvider>,
    notifier: Arc<dyn AssignmentNotifier>,
}

impl DispatchWorkflow {
    pub fn new(
        lifecycle: OrderLifecycle,
        agents: AgentClient,
        locations: Arc<dyn LocationProvider>,
        notifier: Arc<dyn AssignmentNotifier>,
    ) -> Self {
        Self {
            lifecycle,
            agents,
            locations,
            notifier,
        }
    }

    #[instrument(skip(self))]
    pub async fn select_pickup(&self, query: PickupQuery) -> Result<PickupLocation, DispatchError> {
        match query {
            PickupQuery::Place(pickup) => Ok(pickup),
            PickupQuery::Search(text) => {
                let place = self.locations.resolve(&text).await?;
                debug!(place = %place.description, "Pickup resolved");
                Ok(PickupLocation::new(place.description, place.location))
            }
        }
    }

    /// Ranks the agents that can still take an order, nearest to `pickup` first.
    #[instrument(skip(self, pickup), fields(pickup = %pickup.address))]
    pub async fn candidates(
        &self,
        order_id: &OrderId,
        pickup: PickupLocation,
    ) -> Result<DispatchOutcome, DispatchError> {
        let order = self.lifecycle.get(order_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(DispatchError::NotAwaitingDispatch {
                order_id: order_id.to_string(),
                status: order.status,
            });
        }
        if !pickup.position.resolved {
            warn!("Pickup has no coordinates");
            return Ok(DispatchOutcome::PickupUnresolved);
        }

        let pool = self.agents.pool().await?;
        let active = self.lifecycle.active_assignments().await?;
        let available: Vec<_> = pool
            .into_iter()
            .filter(|agent| agent.has_capacity(active.get(&agent.id).copied().unwrap_or(0)))
            .collect();

        let ranking = rank(&available, &pickup.position);
        if ranking.is_empty() {
            info!("No agents available");
            return Ok(DispatchOutcome::NoAgentsAvailable);
        }
        info!(candidates = ranking.len(), "Candidates ranked");
        Ok(DispatchOutcome::Ready(DispatchPlan {
            order,
            pickup,
            ranking,
        }))
    }

    /// Assigns the candidate at `rank_index` and notifies them.
    ///
    /// A notification failure is logged; the assignment stands.
    #[instrument(skip(self, plan), fields(order_id = %plan.order.id))]
    pub async fn confirm(&self, plan: &DispatchPlan, rank_index: usize) -> Result<Order, DispatchError> {
        let chosen = plan
            .candidate(rank_index)
            .ok_or(DispatchError::UnknownCandidate(rank_index))?;
        let agent = &chosen.agent;

        let order = self
            .lifecycle
            .assign(&plan.order.id, agent.id.clone(), plan.pickup.clone())
            .await?;

        if let Err(e) = self.notifier.notify(&order, agent).await {
            warn!(agent_id = %agent.id, error = %e, "Assignment notification failed");
        }
        Ok(order)
    }
}
