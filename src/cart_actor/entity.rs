//! Document trait implementation for the Cart model.
//!
//! Carts are keyed by their owner. Full writes replace the item list (last write
//! wins); the only partial update is an append-only merge of new lines.

use super::CartError;
use crate::model::{Cart, CartPatch, UserId};
use chrono::Utc;
use doc_store::Document;
use std::collections::HashSet;

impl Document for Cart {
    type Id = UserId;
    type Patch = CartPatch;
    type Error = CartError;

    /// A stored cart is non-empty, every line has quantity ≥ 1 and line ids are unique.
    fn validate(&self) -> Result<(), CartError> {
        if self.items.is_empty() {
            return Err(CartError::EmptyCart);
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.quantity < 1 {
                return Err(CartError::InvalidLine(format!(
                    "{} has quantity {}",
                    item.id, item.quantity
                )));
            }
            if !seen.insert(&item.id) {
                return Err(CartError::InvalidLine(format!("{} appears twice", item.id)));
            }
        }
        Ok(())
    }

    fn apply_patch(&mut self, patch: CartPatch) -> Result<(), CartError> {
        match patch {
            CartPatch::Append(lines) => {
                for line in lines {
                    if self.line(&line.id).is_none() {
                        self.items.push(line);
                    }
                }
                self.updated_at = Utc::now();
                Ok(())
            }
        }
    }

    /// First add-to-cart creates the document.
    fn seed(id: &UserId) -> Option<Self> {
        Some(Cart::empty(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineItemDraft;
    use rust_decimal::Decimal;

    #[test]
    fn test_append_skips_known_lines() {
        let line = LineItemDraft::new("p1", "Eggs", Decimal::new(600, 2), 1).into_line(Utc::now());
        let mut cart = Cart::seed(&UserId::new("u1")).unwrap();
        cart.apply_patch(CartPatch::Append(vec![line.clone()])).unwrap();
        cart.apply_patch(CartPatch::Append(vec![line])).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert!(cart.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_and_zero_quantity() {
        let mut cart = Cart::empty(UserId::new("u1"));
        assert_eq!(cart.validate(), Err(CartError::EmptyCart));

        let mut line = LineItemDraft::new("p1", "Eggs", Decimal::new(600, 2), 1).into_line(Utc::now());
        line.quantity = 0;
        cart.items.push(line);
        assert!(matches!(cart.validate(), Err(CartError::InvalidLine(_))));
    }
}
