use crate::agent_actor::AgentError;
use crate::model::{AgentId, AgentPatch, Coordinate, DeliveryAgent};
use async_trait::async_trait;
use doc_store::{DocumentClient, StoreClient, StoreError};
use tracing::{debug, instrument};

/// Client for the `agents` collection.
#[derive(Clone)]
pub struct AgentClient {
    inner: StoreClient<DeliveryAgent>,
}

impl AgentClient {
    pub fn new(inner: StoreClient<DeliveryAgent>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, agent), fields(agent_id = %agent.id))]
    pub async fn register(&self, agent: DeliveryAgent) -> Result<(), AgentError> {
        debug!("Sending request");
        self.inner
            .set(agent.id.clone(), agent)
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn report_position(
        &self,
        id: AgentId,
        position: Coordinate,
    ) -> Result<(), AgentError> {
        debug!("Sending request");
        self.inner
            .update(id, AgentPatch::MoveTo(position))
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    /// The whole pool, ordered by id so repeated reads rank ties the same way.
    pub async fn pool(&self) -> Result<Vec<DeliveryAgent>, AgentError> {
        let mut agents = self.fetch_all().await?;
        agents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(agents)
    }
}

#[async_trait]
impl DocumentClient<DeliveryAgent> for AgentClient {
    type Error = AgentError;

    fn inner(&self) -> &StoreClient<DeliveryAgent> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        if let Some(rejected) = e.rejection::<AgentError>() {
            return rejected.clone();
        }
        match e {
            StoreError::NotFound(id) => AgentError::NotFound(id),
            other => AgentError::StoreCommunicationError(other.to_string()),
        }
    }
}
