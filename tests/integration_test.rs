use delivery_dispatch::agent_actor::AgentError;
use delivery_dispatch::config::DispatchConfig;
use delivery_dispatch::lifecycle::DeliverySystem;
use delivery_dispatch::model::{
    AgentId, Coordinate, CustomerInfo, DeliveryAgent, LineItemDraft, Location, Order, OrderStatus,
    PickupLocation, UserId,
};
use delivery_dispatch::order_actor::OrderError;
use delivery_dispatch::workflow::{
    DispatchError, DispatchOutcome, DispatchPlan, PickupQuery, StaticLocationProvider,
    TracingNotifier,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

const DEPOT: Coordinate = Coordinate::new(12.9716, 77.5946);
const KM_PER_DEGREE: f64 = 6371.0 * std::f64::consts::PI / 180.0;

/// A point `km` due north of `origin`.
fn north_of(origin: Coordinate, km: f64) -> Coordinate {
    Coordinate::new(origin.lat + km / KM_PER_DEGREE, origin.lng)
}

fn start() -> DeliverySystem {
    let locations = StaticLocationProvider::new().with_place("Central Depot", DEPOT);
    DeliverySystem::new(
        &DispatchConfig::default(),
        Arc::new(locations),
        Arc::new(TracingNotifier),
    )
}

fn customer(position: Location) -> CustomerInfo {
    CustomerInfo {
        name: "Asha".to_string(),
        address: "12 MG Road".to_string(),
        phone: "555-0100".to_string(),
        position,
    }
}

async fn register(system: &DeliverySystem, id: &str, km: f64, max: u32) {
    system
        .agents
        .register(DeliveryAgent::new(id, id, north_of(DEPOT, km), max))
        .await
        .expect("Failed to register agent");
}

/// Two units at 10.00 delivered 0.5 km from the depot.
async fn place_order(system: &DeliverySystem, user: &str) -> (Order, PickupLocation) {
    let user_id = UserId::new(user);
    system
        .carts
        .add_item(
            &user_id,
            LineItemDraft::new("milk", "Milk 1L", Decimal::new(1000, 2), 2),
        )
        .await
        .expect("Failed to add item")
        .applied()
        .expect("Add skipped");

    let pickup = system
        .dispatch
        .select_pickup(PickupQuery::Search("central depot".to_string()))
        .await
        .expect("Failed to resolve pickup");
    let dropoff = Location::resolved(north_of(DEPOT, 0.5));

    let order = system
        .carts
        .checkout(&user_id, customer(dropoff), &pickup)
        .await
        .expect("Checkout failed")
        .applied()
        .expect("Checkout skipped");
    (order, pickup)
}

fn ready(outcome: DispatchOutcome) -> DispatchPlan {
    match outcome {
        DispatchOutcome::Ready(plan) => plan,
        other => panic!("Expected a plan, got {other:?}"),
    }
}

/// Full end-to-end test: cart, checkout, ranking, confirmation, lifecycle.
#[tokio::test]
async fn test_checkout_and_dispatch_flow() {
    let system = start();
    register(&system, "five", 5.0, 2).await;
    register(&system, "one", 1.0, 2).await;
    register(&system, "three", 3.0, 2).await;

    let (order, pickup) = place_order(&system, "user-1").await;

    // Billing: 2 × 10.00 + 0.5 km × 100
    assert_eq!(order.subtotal, Decimal::new(2000, 2));
    assert_eq!(order.delivery_fee, Decimal::new(5000, 2));
    assert_eq!(order.total, Decimal::new(7000, 2));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 1);

    // The cart is gone once the order exists
    let user_id = UserId::new("user-1");
    assert!(system.carts.load_existing(&user_id).await.unwrap().is_none());
    assert!(system.carts.snapshot(&user_id).is_none());

    // Ranking: 1 km, 3 km, 5 km
    let plan = ready(system.dispatch.candidates(&order.id, pickup).await.unwrap());
    let ids: Vec<_> = plan.ranking.agent_ids().into_iter().map(|id| id.0).collect();
    assert_eq!(ids, vec!["one", "three", "five"]);
    let ranks: Vec<_> = plan.ranking.candidates.iter().map(|c| c.rank_index).collect();
    assert_eq!(ranks, vec![0, 1, 2]);

    // Confirming rank 1 assigns the agent by id, not by rank
    let assigned = system.dispatch.confirm(&plan, 1).await.unwrap();
    assert_eq!(assigned.status, OrderStatus::Processing);
    assert_eq!(assigned.assigned_agent_id, Some(AgentId::new("three")));
    assert_eq!(assigned.store_info.as_ref().map(|p| p.address.as_str()), Some("Central Depot"));
    assert_eq!(assigned.total, order.total);

    // The same plan cannot be confirmed twice
    let again = system.dispatch.confirm(&plan, 0).await;
    assert_eq!(
        again,
        Err(DispatchError::Order(OrderError::InvalidTransition {
            from: OrderStatus::Processing,
            to: OrderStatus::Processing,
        }))
    );

    let delivered = system.orders.mark_delivered(&order.id).await.unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.total, Decimal::new(7000, 2));

    // Terminal
    assert!(matches!(
        system.orders.cancel(&order.id).await,
        Err(OrderError::InvalidTransition { .. })
    ));

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_agents_at_capacity_are_not_offered() {
    let system = start();
    register(&system, "near", 1.0, 1).await;
    register(&system, "far", 4.0, 2).await;

    let (first, pickup) = place_order(&system, "user-1").await;
    let plan = ready(system.dispatch.candidates(&first.id, pickup.clone()).await.unwrap());
    system.dispatch.confirm(&plan, 0).await.unwrap();

    let (second, _) = place_order(&system, "user-2").await;
    let plan = ready(system.dispatch.candidates(&second.id, pickup.clone()).await.unwrap());
    let ids: Vec<_> = plan.ranking.agent_ids().into_iter().map(|id| id.0).collect();
    assert_eq!(ids, vec!["far"]);

    // Delivering frees the slot
    system.orders.mark_delivered(&first.id).await.unwrap();
    let plan = ready(system.dispatch.candidates(&second.id, pickup).await.unwrap());
    assert_eq!(plan.ranking.nearest().unwrap().agent.id.as_str(), "near");

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_position_reports_move_agents_in_the_ranking() {
    let system = start();
    register(&system, "early", 1.0, 1).await;
    register(&system, "late", 3.0, 1).await;
    let (order, pickup) = place_order(&system, "user-1").await;

    system
        .agents
        .report_position(AgentId::new("late"), north_of(DEPOT, 0.2))
        .await
        .unwrap();
    let plan = ready(system.dispatch.candidates(&order.id, pickup).await.unwrap());
    let ids: Vec<_> = plan.ranking.agent_ids().into_iter().map(|id| id.0).collect();
    assert_eq!(ids, vec!["late", "early"]);

    // Only registered agents can report
    assert_eq!(
        system
            .agents
            .report_position(AgentId::new("stranger"), DEPOT)
            .await,
        Err(AgentError::NotFound("stranger".to_string()))
    );

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_dispatch_degraded_outcomes() {
    let system = start();
    let (order, pickup) = place_order(&system, "user-1").await;

    // Empty pool
    let outcome = system.dispatch.candidates(&order.id, pickup.clone()).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::NoAgentsAvailable);

    // Only an agent that never reported a position
    system
        .agents
        .register(DeliveryAgent::new("ghost", "ghost", Coordinate::default(), 1))
        .await
        .unwrap();
    let outcome = system.dispatch.candidates(&order.id, pickup).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::NoAgentsAvailable);

    // Unresolved pickup
    let nowhere = PickupLocation::new("Unknown", Location::unresolved());
    let outcome = system.dispatch.candidates(&order.id, nowhere).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::PickupUnresolved);

    // Unknown place
    let lookup = system
        .dispatch
        .select_pickup(PickupQuery::Search("Harbour".to_string()))
        .await;
    assert!(matches!(lookup, Err(DispatchError::Geocoding(_))));

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_unknown_rank_index_is_rejected() {
    let system = start();
    register(&system, "only", 2.0, 1).await;
    let (order, pickup) = place_order(&system, "user-1").await;

    let plan = ready(system.dispatch.candidates(&order.id, pickup).await.unwrap());
    assert_eq!(
        system.dispatch.confirm(&plan, 3).await,
        Err(DispatchError::UnknownCandidate(3))
    );
    let unchanged = system.orders.get(&order.id).await.unwrap();
    assert_eq!(unchanged.status, OrderStatus::Pending);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_checkout_requires_a_dropoff() {
    let system = start();
    let user_id = UserId::new("user-1");
    let pickup = PickupLocation::new("Central Depot", Location::resolved(DEPOT));

    // Nothing in the cart
    let empty = system
        .carts
        .checkout(&user_id, customer(Location::resolved(DEPOT)), &pickup)
        .await;
    assert!(matches!(
        empty,
        Err(delivery_dispatch::cart_actor::CartError::EmptyCart)
    ));

    system
        .carts
        .add_item(&user_id, LineItemDraft::new("tea", "Tea", Decimal::new(300, 2), 1))
        .await
        .unwrap();

    // No customer position and the device has no fix either
    let result = system
        .carts
        .checkout(&user_id, customer(Location::unresolved()), &pickup)
        .await;
    assert!(matches!(
        result,
        Err(delivery_dispatch::cart_actor::CartError::DropoffUnresolved)
    ));

    // The cart survives a refused checkout
    assert_eq!(system.carts.load(&user_id).await.unwrap().items.len(), 1);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_order_document_shape() {
    let system = start();
    let (order, _) = place_order(&system, "user-1").await;

    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["status"], "pending");
    assert_eq!(json["userId"], "user-1");
    assert!(json["items"].is_array());
    assert!(json["customerInfo"]["position"]["lat"].is_f64());
    assert!(json["customerInfo"]["position"]["lng"].is_f64());
    assert!(json.get("assignedAgentId").is_none());

    let money = |key: &str| Decimal::from_str(json[key].as_str().unwrap()).unwrap();
    assert_eq!(money("subtotal"), Decimal::new(2000, 2));
    assert_eq!(money("deliveryFee"), Decimal::new(5000, 2));
    assert_eq!(money("total"), Decimal::new(7000, 2));

    let back: Order = serde_json::from_value(json).unwrap();
    assert_eq!(back, order);

    system.shutdown().await.expect("Shutdown failed");
}
