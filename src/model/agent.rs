use crate::model::{AgentId, Coordinate, Location};
use serde::{Deserialize, Serialize};

/// A delivery agent as stored in the agent pool.
///
/// # Document Store
/// Stored in the `agents` collection keyed by [`AgentId`]. See
/// [`agent_actor`](crate::agent_actor) for the [`Document`](doc_store::Document) impl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAgent {
    pub id: AgentId,
    pub name: String,
    /// Last reported position; the zero default means "not reported yet".
    pub position: Coordinate,
    pub max_concurrent_orders: u32,
}

impl DeliveryAgent {
    pub fn new(
        id: impl Into<AgentId>,
        name: impl Into<String>,
        position: Coordinate,
        max_concurrent_orders: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            max_concurrent_orders,
        }
    }

    pub fn location(&self) -> Location {
        Location::from_raw(self.position)
    }

    /// True when the agent can take one more order on top of `active`.
    pub fn has_capacity(&self, active: u32) -> bool {
        active < self.max_concurrent_orders
    }
}

/// Partial updates accepted by the `agents` collection.
#[derive(Debug, Clone)]
pub enum AgentPatch {
    /// A fresh position report from the agent's device.
    MoveTo(Coordinate),
    SetCapacity(u32),
}

/// One entry of a ranking: the agent, untouched, plus its place in the order.
///
/// `rank_index` is display order only. Downstream code keeps addressing the agent
/// by `agent.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedAgent {
    pub agent: DeliveryAgent,
    pub rank_index: usize,
    /// Distance to the ranking origin; `None` when the origin was unresolved.
    pub distance_km: Option<f64>,
}
