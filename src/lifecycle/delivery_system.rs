use crate::cart_sync::CartSynchronizer;
use crate::clients::AgentClient;
use crate::config::DispatchConfig;
use crate::order_actor::OrderLifecycle;
use crate::workflow::{AssignmentNotifier, DispatchWorkflow, LocationProvider};
use std::sync::Arc;
use tracing::{error, info};

/// Starts the `carts`, `orders` and `agents` collections and wires the
/// services that sit on top of them.
///
/// # Example
///
/// ```ignore
/// let system = DeliverySystem::new(&config, locations, Arc::new(TracingNotifier));
///
/// system.carts.add_item(&user_id, draft).await?;
/// let order = system.carts.checkout(&user_id, customer, &pickup).await?;
///
/// system.shutdown().await?;
/// ```
pub struct DeliverySystem {
    pub carts: CartSynchronizer,
    pub orders: OrderLifecycle,
    pub dispatch: DispatchWorkflow,
    /// Raw access to the agent pool (onboarding, position reports).
    pub agents: AgentClient,

    /// Task handles for the collection actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl DeliverySystem {
    /// Spawns one actor per collection and builds the services.
    pub fn new(
        config: &DispatchConfig,
        locations: Arc<dyn LocationProvider>,
        notifier: Arc<dyn AssignmentNotifier>,
    ) -> Self {
        let (cart_actor, cart_client) = crate::cart_actor::new(config.mailbox_capacity);
        let (order_actor, order_client) = crate::order_actor::new(config.mailbox_capacity);
        let (agent_actor, agent_client) = crate::agent_actor::new(config.mailbox_capacity);

        let handles = vec![
            tokio::spawn(cart_actor.run()),
            tokio::spawn(order_actor.run()),
            tokio::spawn(agent_actor.run()),
        ];

        let orders = OrderLifecycle::new(order_client);
        let carts = CartSynchronizer::new(cart_client, orders.clone(), locations.clone(), config);
        let dispatch = DispatchWorkflow::new(orders.clone(), agent_client.clone(), locations, notifier);

        info!(
            fee_rate_per_km = %config.fee_rate_per_km,
            write_timeout_ms = config.write_timeout.as_millis() as u64,
            "Delivery system started"
        );

        Self {
            carts,
            orders,
            dispatch,
            agents: agent_client,
            handles,
        }
    }

    /// Drops every client, then waits for the collection actors to drain.
    ///
    /// Clones of the services held elsewhere keep their collections alive, so
    /// drop those first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        let Self {
            carts,
            orders,
            dispatch,
            agents,
            handles,
        } = self;
        drop(carts);
        drop(orders);
        drop(dispatch);
        drop(agents);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Collection task failed: {:?}", e);
                return Err(format!("Collection task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
