//! Demo: one customer checks out, an operator dispatches the order.

use delivery_dispatch::config::DispatchConfig;
use delivery_dispatch::lifecycle::{setup_tracing, DeliverySystem};
use delivery_dispatch::model::{
    Coordinate, CustomerInfo, DeliveryAgent, LineItemDraft, Location, UserId,
};
use delivery_dispatch::workflow::{
    DispatchOutcome, PickupQuery, StaticLocationProvider, TracingNotifier,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = DispatchConfig::from_env().map_err(|e| e.to_string())?;
    let locations = StaticLocationProvider::new()
        .with_place("Indiranagar Depot", Coordinate::new(12.9784, 77.6408))
        .with_place("Jayanagar Depot", Coordinate::new(12.9250, 77.5938));
    let system = DeliverySystem::new(&config, Arc::new(locations), Arc::new(TracingNotifier));

    for agent in [
        DeliveryAgent::new("agent-1", "Ravi", Coordinate::new(12.9352, 77.6245), 2),
        DeliveryAgent::new("agent-2", "Meena", Coordinate::new(12.9719, 77.6412), 1),
        DeliveryAgent::new("agent-3", "Arjun", Coordinate::default(), 3),
    ] {
        system.agents.register(agent).await.map_err(|e| e.to_string())?;
    }

    let user_id = UserId::new("user-1");
    let span = tracing::info_span!("shopping");
    let order = async {
        system
            .carts
            .add_item(
                &user_id,
                LineItemDraft::new("rice-5kg", "Rice 5kg", Decimal::new(45000, 2), 1)
                    .with_category("staples")
                    .with_image("https://img.example/rice-5kg.png"),
            )
            .await
            .map_err(|e| e.to_string())?;
        system
            .carts
            .add_item(
                &user_id,
                LineItemDraft::new("dal-1kg", "Toor Dal 1kg", Decimal::new(16000, 2), 2)
                    .with_category("staples"),
            )
            .await
            .map_err(|e| e.to_string())?;

        let customer = CustomerInfo {
            name: "Asha".to_string(),
            address: "80 Feet Road, Koramangala".to_string(),
            phone: "555-0100".to_string(),
            position: Location::resolved(Coordinate::new(12.9352, 77.6245)),
        };
        let pickup = system
            .dispatch
            .select_pickup(PickupQuery::Search("indiranagar".to_string()))
            .await
            .map_err(|e| e.to_string())?;
        let outcome = system
            .carts
            .checkout(&user_id, customer, &pickup)
            .await
            .map_err(|e| e.to_string())?;
        Ok::<_, String>((outcome, pickup))
    }
    .instrument(span)
    .await?;

    let (outcome, pickup) = order;
    let Some(order) = outcome.applied() else {
        return Err("checkout was skipped".to_string());
    };
    info!(order_id = %order.id, total = %order.total, "Order placed");

    let span = tracing::info_span!("dispatch", order_id = %order.id);
    async {
        match system.dispatch.candidates(&order.id, pickup).await {
            Ok(DispatchOutcome::Ready(plan)) => {
                for candidate in &plan.ranking.candidates {
                    info!(
                        rank = candidate.rank_index,
                        agent = %candidate.agent.name,
                        km = ?candidate.distance_km,
                        "Candidate"
                    );
                }
                match system.dispatch.confirm(&plan, 0).await {
                    Ok(order) => info!(status = %order.status, "Dispatched"),
                    Err(e) => warn!(error = %e, "Confirmation failed"),
                }
            }
            Ok(other) => warn!(?other, "Nothing to dispatch"),
            Err(e) => warn!(error = %e, "Dispatch failed"),
        }
    }
    .instrument(span)
    .await;

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
