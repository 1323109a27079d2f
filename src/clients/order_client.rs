use crate::model::{Order, OrderId, OrderPatch};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use doc_store::{DocumentClient, Snapshot, StoreClient, StoreError};
use tracing::{debug, instrument};

/// Client for the `orders` collection.
///
/// Status rules live in [`OrderLifecycle`](crate::order_actor::OrderLifecycle);
/// this type only moves documents.
#[derive(Clone)]
pub struct OrderClient {
    inner: StoreClient<Order>,
}

impl OrderClient {
    pub fn new(inner: StoreClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn put(&self, order: Order) -> Result<Order, OrderError> {
        debug!("Sending request");
        let snapshot = self
            .inner
            .set(order.id.clone(), order)
            .await
            .map_err(Self::map_error)?;
        written(snapshot)
    }

    #[instrument(skip(self))]
    pub async fn patch(&self, id: OrderId, patch: OrderPatch) -> Result<Order, OrderError> {
        debug!("Sending request");
        let snapshot = self
            .inner
            .update(id, patch)
            .await
            .map_err(Self::map_error)?;
        written(snapshot)
    }
}

fn written(snapshot: Snapshot<Order>) -> Result<Order, OrderError> {
    snapshot.into_document().ok_or_else(|| {
        OrderError::StoreCommunicationError("write returned no document".to_string())
    })
}

#[async_trait]
impl DocumentClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &StoreClient<Order> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        if let Some(rejected) = e.rejection::<OrderError>() {
            return rejected.clone();
        }
        match e {
            StoreError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::StoreCommunicationError(other.to_string()),
        }
    }
}
