//! Distance-based delivery fee.

use crate::geo::distance_km;
use crate::model::Location;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Outcome of a fee computation.
///
/// `Undetermined` means a location was not resolved yet; it is never a free
/// delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryFee {
    Determined(Decimal),
    Undetermined,
}

impl DeliveryFee {
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Determined(amount) => Some(*amount),
            Self::Undetermined => None,
        }
    }
}

/// Linear fee: `distance_km × rate_per_km`, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeCalculator {
    rate_per_km: Decimal,
}

impl FeeCalculator {
    pub const fn new(rate_per_km: Decimal) -> Self {
        Self { rate_per_km }
    }

    pub fn rate_per_km(&self) -> Decimal {
        self.rate_per_km
    }

    /// Fee for a straight-line trip from `pickup` to `dropoff`.
    pub fn fee(&self, pickup: &Location, dropoff: &Location) -> DeliveryFee {
        match (pickup.coordinate(), dropoff.coordinate()) {
            (Some(from), Some(to)) => self.fee_for_distance(distance_km(from, to)),
            _ => DeliveryFee::Undetermined,
        }
    }

    /// Fee for a known distance. Non-finite or negative distances are undetermined,
    /// and so is a product too large for a `Decimal`.
    pub fn fee_for_distance(&self, km: f64) -> DeliveryFee {
        if !km.is_finite() || km < 0.0 {
            return DeliveryFee::Undetermined;
        }
        Decimal::from_f64(km)
            .and_then(|km| km.checked_mul(self.rate_per_km))
            .map_or(DeliveryFee::Undetermined, |fee| {
                DeliveryFee::Determined(
                    fee.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
                )
            })
    }
}
