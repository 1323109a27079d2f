//! Order documents and their status machine.
//!
//! # Document Store
//! An [`Order`] is stored in the `orders` collection keyed by [`OrderId`]. See
//! [`order_actor`](crate::order_actor) for the [`Document`](doc_store::Document) impl
//! and [`OrderPatch`] for the only mutations an order accepts.
//!
//! # Persisted Shape
//! Orders serialize with camelCase field names (`subtotal`, `deliveryFee`, `total`,
//! `status`, `items`, `customerInfo.position.lat/lng`) and a lowercase status, which
//! reporting and export consumers rely on.

use crate::model::{AgentId, CartLineItem, Location, OrderId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lifecycle status of an order.
///
/// ```text
/// pending ──► processing ──► delivered
///    │             │
///    └─────────────┴──────► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Returns `true` if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Cancelled)
                | (Self::Processing, Self::Delivered)
                | (Self::Processing, Self::Cancelled)
        )
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Who receives the order and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub position: Location,
}

/// The place an order is dispatched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupLocation {
    pub address: String,
    pub position: Location,
}

impl PickupLocation {
    pub fn new(address: impl Into<String>, position: Location) -> Self {
        Self {
            address: address.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Copy of the cart lines at checkout; later cart edits do not reach it.
    pub items: Vec<CartLineItem>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub customer_info: CustomerInfo,
    /// Pickup side, recorded when dispatch completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_info: Option<PickupLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<AgentId>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds a pending order from a snapshot of cart lines.
    ///
    /// `total` is derived here and never recomputed afterwards.
    pub fn new(
        id: OrderId,
        user_id: UserId,
        items: Vec<CartLineItem>,
        delivery_fee: Decimal,
        customer_info: CustomerInfo,
        created_at: DateTime<Utc>,
    ) -> Self {
        let subtotal: Decimal = items.iter().map(CartLineItem::line_total).sum();
        Self {
            id,
            user_id,
            items,
            status: OrderStatus::Pending,
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
            customer_info,
            store_info: None,
            assigned_agent_id: None,
            created_at,
        }
    }

    pub fn totals_consistent(&self) -> bool {
        self.total == self.subtotal + self.delivery_fee
    }
}

/// Mutations the `orders` collection accepts. None of them can touch money fields.
#[derive(Debug, Clone)]
pub enum OrderPatch {
    /// Explicit status change by an operator or the customer.
    SetStatus(OrderStatus),
    /// Dispatch confirmation: pending → processing with the chosen agent and pickup.
    Assign {
        agent_id: AgentId,
        pickup: PickupLocation,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn test_pending_reaches_only_processing_and_cancelled() {
        let reachable: Vec<_> = ALL
            .into_iter()
            .filter(|next| OrderStatus::Pending.can_transition_to(*next))
            .collect();
        assert_eq!(reachable, vec![OrderStatus::Processing, OrderStatus::Cancelled]);
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            assert!(ALL.iter().all(|next| !terminal.can_transition_to(*next)));
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        for status in ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.to_string()));
            assert_eq!(serde_json::from_value::<OrderStatus>(json).unwrap(), status);
        }
        assert_eq!(
            serde_json::to_value(OrderStatus::Processing).unwrap(),
            "processing"
        );
    }
}
