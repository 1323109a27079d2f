//! Document trait implementation for the DeliveryAgent model.

use super::AgentError;
use crate::model::{AgentId, AgentPatch, DeliveryAgent};
use doc_store::Document;

impl Document for DeliveryAgent {
    type Id = AgentId;
    type Patch = AgentPatch;
    type Error = AgentError;

    /// An agent must be able to carry at least one order. A zero position is
    /// accepted; it only keeps the agent out of distance rankings.
    fn validate(&self) -> Result<(), AgentError> {
        if self.name.trim().is_empty() {
            return Err(AgentError::InvalidAgent(format!("{} has no name", self.id)));
        }
        if self.max_concurrent_orders == 0 {
            return Err(AgentError::InvalidAgent(format!(
                "{} has zero capacity",
                self.id
            )));
        }
        Ok(())
    }

    fn apply_patch(&mut self, patch: AgentPatch) -> Result<(), AgentError> {
        match patch {
            AgentPatch::MoveTo(position) => self.position = position,
            AgentPatch::SetCapacity(max) => self.max_concurrent_orders = max,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut agent = DeliveryAgent::new("a1", "Ravi", Coordinate::new(12.97, 77.59), 2);
        assert!(agent.validate().is_ok());
        agent.apply_patch(AgentPatch::SetCapacity(0)).unwrap();
        assert!(matches!(agent.validate(), Err(AgentError::InvalidAgent(_))));
    }
}
