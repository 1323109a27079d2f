//! Shopping cart documents.
//!
//! # Document Store
//! A [`Cart`] is stored in the `carts` collection keyed by the owner's [`UserId`].
//! See [`cart_actor`](crate::cart_actor) for the [`Document`](doc_store::Document) impl
//! and [`CartPatch`] for the partial updates it accepts.

use crate::model::{LineId, ProductId, UserId};
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a cart. The same product added twice yields two lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: LineId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image_url: String,
    pub category: String,
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// What the customer picked; becomes a [`CartLineItem`] once it gets a line id.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDraft {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image_url: String,
    pub category: String,
}

impl LineItemDraft {
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            image_url: String::new(),
            category: String::new(),
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Stamps the draft with a fresh line id and the add time.
    pub fn into_line(self, now: DateTime<Utc>) -> CartLineItem {
        CartLineItem {
            id: line_id_for(&self.product_id, now),
            product_id: self.product_id,
            name: self.name,
            unit_price: self.unit_price,
            quantity: self.quantity,
            image_url: self.image_url,
            category: self.category,
            added_at: now,
        }
    }
}

/// `<product>-<millis>-<random>`: unique per add even for the same product.
pub fn line_id_for(product_id: &ProductId, now: DateTime<Utc>) -> LineId {
    let disambiguator: u32 = rand::rng().random();
    LineId(format!(
        "{}-{}-{:08x}",
        product_id,
        now.timestamp_millis(),
        disambiguator
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: UserId,
    pub items: Vec<CartLineItem>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line(&self, line_id: &LineId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.id == line_id)
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sets the quantity of one line. Returns false if the line is not in the cart.
    pub fn set_quantity(&mut self, line_id: &LineId, quantity: u32) -> bool {
        match self.items.iter_mut().find(|item| &item.id == line_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Removes one line. Returns false if the line is not in the cart.
    pub fn remove_line(&mut self, line_id: &LineId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != line_id);
        self.items.len() != before
    }
}

/// Partial updates accepted by the `carts` collection.
#[derive(Debug, Clone)]
pub enum CartPatch {
    /// Append-only merge: lines whose id is already present are skipped.
    Append(Vec<CartLineItem>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_product_twice_gives_distinct_lines() {
        let now = Utc::now();
        let a = LineItemDraft::new("p1", "Milk", Decimal::new(250, 2), 1).into_line(now);
        let b = LineItemDraft::new("p1", "Milk", Decimal::new(250, 2), 1).into_line(now);
        assert_ne!(a.id, b.id);
        assert!(a.id.as_str().starts_with("p1-"));
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let now = Utc::now();
        let mut cart = Cart::empty(UserId::new("u1"));
        cart.items
            .push(LineItemDraft::new("p1", "Milk", Decimal::new(1000, 2), 2).into_line(now));
        cart.items
            .push(LineItemDraft::new("p2", "Bread", Decimal::new(350, 2), 1).into_line(now));
        assert_eq!(cart.subtotal(), Decimal::new(2350, 2));
        assert_eq!(cart.item_count(), 3);
    }
}
