//! Turning a cart into an order.

use super::{CartSynchronizer, MutationOutcome, SkipReason};
use crate::cart_actor::CartError;
use crate::model::{CustomerInfo, Order, OrderId, PickupLocation, UserId};
use chrono::Utc;
use tracing::{info, instrument, warn};

impl CartSynchronizer {
    /// Places an order for everything in the cart and clears the cart.
    ///
    /// The drop-off is the customer's position, or the device's current location
    /// when the customer has none. The order is a copy of the stored cart lines;
    /// its fee comes from the straight-line distance between `pickup` and the
    /// drop-off.
    ///
    /// Once the order is placed it stands: if clearing the cart fails afterwards
    /// the failure is logged and the cart re-read, but no error is returned.
    ///
    /// When placing the order times out, the order is looked up by id before
    /// giving up, so a write that landed late still clears the cart. If it is not
    /// visible yet, `Timeout` is returned with the cart intact; the order may still
    /// land afterwards, and a blind retry can then place it twice.
    #[instrument(skip(self, customer, pickup), fields(pickup = %pickup.address))]
    pub async fn checkout(
        &self,
        user_id: &UserId,
        mut customer: CustomerInfo,
        pickup: &PickupLocation,
    ) -> Result<MutationOutcome<Order>, CartError> {
        let Some(_guard) = self.try_begin(user_id) else {
            return Ok(MutationOutcome::Skipped(SkipReason::Busy));
        };

        let cart = self
            .load_existing(user_id)
            .await?
            .filter(|cart| !cart.is_empty())
            .ok_or(CartError::EmptyCart)?;

        if !customer.position.resolved {
            let here = self.locations.current_location().await;
            if !here.resolved {
                return Err(CartError::DropoffUnresolved);
            }
            customer.position = here;
        }

        let fee = self
            .fees
            .fee(&pickup.position, &customer.position)
            .amount()
            .ok_or(CartError::FeeUndetermined)?;

        let order = Order::new(
            OrderId::generate(),
            user_id.clone(),
            cart.items,
            fee,
            customer,
            Utc::now(),
        );
        let order_id = order.id.clone();
        let placed = match self
            .bounded(async { self.lifecycle.place(order).await.map_err(CartError::from) })
            .await
        {
            Ok(placed) => placed,
            Err(CartError::Timeout(ms)) => {
                warn!(%order_id, "Placing the order timed out, looking it up");
                let lookup = async { self.lifecycle.get(&order_id).await.map_err(CartError::from) };
                self.bounded(lookup)
                    .await
                    .map_err(|_| CartError::Timeout(ms))?
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = self.discard_remote(user_id).await {
            warn!(order_id = %placed.id, error = %e, "Order placed but cart not cleared");
            self.resync(user_id).await;
        }

        info!(
            order_id = %placed.id,
            subtotal = %placed.subtotal,
            fee = %placed.delivery_fee,
            total = %placed.total,
            "Checked out"
        );
        Ok(MutationOutcome::Applied(placed))
    }
}
