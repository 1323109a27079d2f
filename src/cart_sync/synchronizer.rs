use super::{CartSubscription, MutationOutcome, SkipReason};
use crate::cart_actor::CartError;
use crate::clients::CartClient;
use crate::config::DispatchConfig;
use crate::dispatch::FeeCalculator;
use crate::model::{Cart, CartLineItem, LineId, LineItemDraft, UserId};
use crate::order_actor::OrderLifecycle;
use crate::workflow::LocationProvider;
use chrono::Utc;
use doc_store::Snapshot;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Local view of one user's cart.
#[derive(Debug, Default)]
struct Mirror {
    cart: Option<Cart>,
    /// Last remote revision taken into `cart`.
    revision: u64,
    busy: bool,
}

type Mirrors = Arc<Mutex<HashMap<UserId, Mirror>>>;

fn lock(mirrors: &Mirrors) -> MutexGuard<'_, HashMap<UserId, Mirror>> {
    // a panicked holder cannot leave a Mirror half-written
    mirrors.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Takes `snapshot` into the mirror unless it is older. Returns whether it was taken.
fn accept(mirrors: &Mirrors, user_id: &UserId, snapshot: &Snapshot<Cart>) -> bool {
    let mut mirrors = lock(mirrors);
    let mirror = mirrors.entry(user_id.clone()).or_default();
    if !snapshot.is_newer_or_equal(mirror.revision) {
        return false;
    }
    mirror.revision = snapshot.revision;
    mirror.cart = snapshot.document.clone();
    true
}

/// Marks a cart busy for as long as it lives.
pub(super) struct BusyGuard {
    mirrors: Mirrors,
    user_id: UserId,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if let Some(mirror) = lock(&self.mirrors).get_mut(&self.user_id) {
            mirror.busy = false;
        }
    }
}

/// Optimistic, rollback-on-failure access to the `carts` collection.
///
/// Cloning is cheap; clones share the same local mirrors and busy flags.
#[derive(Clone)]
pub struct CartSynchronizer {
    carts: CartClient,
    pub(super) lifecycle: OrderLifecycle,
    pub(super) locations: Arc<dyn LocationProvider>,
    pub(super) fees: FeeCalculator,
    write_timeout: Duration,
    mirrors: Mirrors,
}

impl CartSynchronizer {
    pub fn new(
        carts: CartClient,
        lifecycle: OrderLifecycle,
        locations: Arc<dyn LocationProvider>,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            carts,
            lifecycle,
            locations,
            fees: FeeCalculator::new(config.fee_rate_per_km),
            write_timeout: config.write_timeout,
            mirrors: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The local view, without touching the store.
    pub fn snapshot(&self, user_id: &UserId) -> Option<Cart> {
        lock(&self.mirrors).get(user_id).and_then(|m| m.cart.clone())
    }

    /// Fetch-once read. A user without a stored cart gets an empty one.
    pub async fn load(&self, user_id: &UserId) -> Result<Cart, CartError> {
        Ok(self
            .load_existing(user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(user_id.clone())))
    }

    /// Like [`load`](Self::load), but `None` when no cart is stored.
    #[instrument(skip(self))]
    pub async fn load_existing(&self, user_id: &UserId) -> Result<Option<Cart>, CartError> {
        let snapshot = self.bounded(self.carts.load(user_id.clone())).await?;
        if accept(&self.mirrors, user_id, &snapshot) {
            Ok(snapshot.into_document())
        } else {
            debug!(revision = snapshot.revision, "Read is behind the local view");
            Ok(self.snapshot(user_id))
        }
    }

    /// Calls `on_update` with the stored cart now and after every remote change,
    /// own writes included. Changes older than the local view are skipped.
    #[instrument(skip(self, on_update))]
    pub async fn subscribe<F>(
        &self,
        user_id: &UserId,
        mut on_update: F,
    ) -> Result<CartSubscription, CartError>
    where
        F: FnMut(Option<Cart>) + Send + 'static,
    {
        let mut feed = self.bounded(self.carts.watch(user_id.clone())).await?;
        let mirrors = self.mirrors.clone();
        let user_id = user_id.clone();

        let task = tokio::spawn(async move {
            loop {
                let snapshot = feed.borrow_and_update().clone();
                if accept(&mirrors, &user_id, &snapshot) {
                    on_update(snapshot.document);
                } else {
                    debug!(%user_id, revision = snapshot.revision, "Discarding stale snapshot");
                }
                if feed.changed().await.is_err() {
                    debug!(%user_id, "Cart feed closed");
                    break;
                }
            }
        });
        Ok(CartSubscription::new(task))
    }

    /// Sets the quantity of one line. Quantities below one are ignored.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        user_id: &UserId,
        line_id: &LineId,
        quantity: u32,
    ) -> Result<MutationOutcome<Cart>, CartError> {
        if quantity < 1 {
            debug!("Ignoring quantity below one");
            return Ok(MutationOutcome::Skipped(SkipReason::InvalidQuantity));
        }
        let Some(_guard) = self.try_begin(user_id) else {
            return Ok(MutationOutcome::Skipped(SkipReason::Busy));
        };
        self.rewrite(user_id, |cart| cart.set_quantity(line_id, quantity))
            .await
    }

    /// Removes one line; removing the last line deletes the stored cart.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user_id: &UserId,
        line_id: &LineId,
    ) -> Result<MutationOutcome<Cart>, CartError> {
        let Some(_guard) = self.try_begin(user_id) else {
            return Ok(MutationOutcome::Skipped(SkipReason::Busy));
        };
        self.rewrite(user_id, |cart| cart.remove_line(line_id)).await
    }

    /// Adds a new line. The stored cart is created on the first add.
    ///
    /// Takes the cart's guard like every other mutation, so a full-list write or
    /// a checkout in flight can never drop a line reported as added.
    #[instrument(skip(self, draft), fields(product_id = %draft.product_id))]
    pub async fn add_item(
        &self,
        user_id: &UserId,
        draft: LineItemDraft,
    ) -> Result<MutationOutcome<CartLineItem>, CartError> {
        if draft.quantity < 1 {
            return Err(CartError::InvalidLine(format!(
                "{} has quantity {}",
                draft.product_id, draft.quantity
            )));
        }
        let Some(_guard) = self.try_begin(user_id) else {
            return Ok(MutationOutcome::Skipped(SkipReason::Busy));
        };
        let line = draft.into_line(Utc::now());
        self.modify_local(user_id, |cart| cart.items.push(line.clone()));

        match self
            .bounded(self.carts.append(user_id.clone(), vec![line.clone()]))
            .await
        {
            Ok(snapshot) => {
                accept(&self.mirrors, user_id, &snapshot);
                info!(line_id = %line.id, revision = snapshot.revision, "Line added");
                Ok(MutationOutcome::Applied(line))
            }
            Err(e) => {
                warn!(line_id = %line.id, error = %e, "Add failed, rolling back");
                self.modify_local(user_id, |cart| {
                    cart.remove_line(&line.id);
                });
                self.resync(user_id).await;
                Err(e)
            }
        }
    }

    /// Applies `change` locally, then persists the full item list, or deletes the
    /// stored cart when no line is left.
    async fn rewrite(
        &self,
        user_id: &UserId,
        change: impl FnOnce(&mut Cart) -> bool,
    ) -> Result<MutationOutcome<Cart>, CartError> {
        let previous = match self.snapshot(user_id) {
            Some(cart) => cart,
            None => self.load(user_id).await?,
        };
        let mut next = previous.clone();
        if !change(&mut next) {
            return Ok(MutationOutcome::Skipped(SkipReason::UnknownLine));
        }
        next.updated_at = Utc::now();
        self.set_local(user_id, Some(next.clone()));

        let written = if next.is_empty() {
            self.bounded(self.carts.discard(user_id.clone())).await
        } else {
            self.bounded(self.carts.put(next.clone())).await
        };

        match written {
            Ok(snapshot) => {
                accept(&self.mirrors, user_id, &snapshot);
                info!(revision = snapshot.revision, lines = next.items.len(), "Cart written");
                Ok(MutationOutcome::Applied(next))
            }
            Err(CartError::NotFound(_)) if next.is_empty() => {
                debug!("Cart already gone remotely");
                self.set_local(user_id, None);
                Ok(MutationOutcome::Applied(next))
            }
            Err(e) => {
                warn!(error = %e, "Cart write failed, rolling back");
                self.set_local(user_id, Some(previous));
                self.resync(user_id).await;
                Err(e)
            }
        }
    }

    /// Claims the cart's guard, or `None` when another operation holds it.
    pub(super) fn try_begin(&self, user_id: &UserId) -> Option<BusyGuard> {
        let mut mirrors = lock(&self.mirrors);
        let mirror = mirrors.entry(user_id.clone()).or_default();
        if mirror.busy {
            debug!(%user_id, "Cart busy, skipping");
            return None;
        }
        mirror.busy = true;
        Some(BusyGuard {
            mirrors: self.mirrors.clone(),
            user_id: user_id.clone(),
        })
    }

    /// Runs a store call under the write timeout.
    pub(super) async fn bounded<R>(
        &self,
        call: impl Future<Output = Result<R, CartError>>,
    ) -> Result<R, CartError> {
        tokio::time::timeout(self.write_timeout, call)
            .await
            .unwrap_or_else(|_| Err(CartError::Timeout(self.write_timeout.as_millis())))
    }

    pub(super) async fn discard_remote(&self, user_id: &UserId) -> Result<(), CartError> {
        let snapshot = self.bounded(self.carts.discard(user_id.clone())).await?;
        accept(&self.mirrors, user_id, &snapshot);
        Ok(())
    }

    /// Re-reads the stored cart after a failed write. Failure here only logs.
    pub(super) async fn resync(&self, user_id: &UserId) {
        match self.bounded(self.carts.load(user_id.clone())).await {
            Ok(snapshot) => {
                accept(&self.mirrors, user_id, &snapshot);
            }
            Err(e) => warn!(%user_id, error = %e, "Re-fetch failed, keeping rolled-back view"),
        }
    }

    fn set_local(&self, user_id: &UserId, cart: Option<Cart>) {
        lock(&self.mirrors).entry(user_id.clone()).or_default().cart = cart;
    }

    fn modify_local(&self, user_id: &UserId, change: impl FnOnce(&mut Cart)) {
        let mut mirrors = lock(&self.mirrors);
        let mirror = mirrors.entry(user_id.clone()).or_default();
        let mut cart = mirror
            .cart
            .take()
            .unwrap_or_else(|| Cart::empty(user_id.clone()));
        change(&mut cart);
        mirror.cart = (!cart.is_empty()).then_some(cart);
    }
}
