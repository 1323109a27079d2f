use crate::cart_actor::CartError;
use crate::model::{Cart, CartLineItem, CartPatch, UserId};
use async_trait::async_trait;
use doc_store::{DocumentClient, Snapshot, StoreClient, StoreError};
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Client for the `carts` collection.
///
/// Unlike the other clients it hands back whole [`Snapshot`]s: the cart
/// synchronizer needs revisions to order its local view against remote changes.
#[derive(Clone)]
pub struct CartClient {
    inner: StoreClient<Cart>,
}

impl CartClient {
    pub fn new(inner: StoreClient<Cart>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn load(&self, user_id: UserId) -> Result<Snapshot<Cart>, CartError> {
        debug!("Sending request");
        self.inner.get(user_id).await.map_err(Self::map_error)
    }

    /// Replaces the stored item list with the one in `cart`.
    #[instrument(skip(self, cart), fields(user_id = %cart.user_id, lines = cart.items.len()))]
    pub async fn put(&self, cart: Cart) -> Result<Snapshot<Cart>, CartError> {
        debug!("Sending request");
        self.inner
            .set(cart.user_id.clone(), cart)
            .await
            .map_err(Self::map_error)
    }

    /// Merges new lines in, creating the cart on first add.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn append(
        &self,
        user_id: UserId,
        lines: Vec<CartLineItem>,
    ) -> Result<Snapshot<Cart>, CartError> {
        debug!("Sending request");
        self.inner
            .update(user_id, CartPatch::Append(lines))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn discard(&self, user_id: UserId) -> Result<Snapshot<Cart>, CartError> {
        debug!("Sending request");
        self.inner.delete(user_id).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn watch(&self, user_id: UserId) -> Result<watch::Receiver<Snapshot<Cart>>, CartError> {
        debug!("Sending request");
        self.inner.subscribe(user_id).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl DocumentClient<Cart> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &StoreClient<Cart> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        if let Some(rejected) = e.rejection::<CartError>() {
            return rejected.clone();
        }
        match e {
            StoreError::NotFound(id) => CartError::NotFound(id),
            other => CartError::StoreCommunicationError(other.to_string()),
        }
    }
}
