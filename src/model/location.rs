use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees.
///
/// Serialized as `{ "lat": …, "lng": … }`, the shape external consumers of order
/// documents read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// A raw coordinate is unset when it is the zero default or not finite.
    pub fn is_unset(&self) -> bool {
        !self.lat.is_finite() || !self.lng.is_finite() || (self.lat == 0.0 && self.lng == 0.0)
    }
}

/// A coordinate paired with whether it was actually resolved.
///
/// Replaces the `(0, 0)` sentinel: an unresolved location still carries a
/// coordinate for serialization, but distance and fee code never trust it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(default)]
    pub resolved: bool,
}

impl Location {
    pub const fn resolved(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            resolved: true,
        }
    }

    pub const fn unresolved() -> Self {
        Self {
            coordinate: Coordinate::new(0.0, 0.0),
            resolved: false,
        }
    }

    /// Classifies a coordinate read from raw data.
    pub fn from_raw(coordinate: Coordinate) -> Self {
        if coordinate.is_unset() {
            Self {
                coordinate,
                resolved: false,
            }
        } else {
            Self::resolved(coordinate)
        }
    }

    /// The coordinate, if it can be used for distance math.
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.resolved.then_some(self.coordinate)
    }
}

impl From<Coordinate> for Location {
    fn from(coordinate: Coordinate) -> Self {
        Self::from_raw(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_default_is_unresolved() {
        assert!(!Location::from_raw(Coordinate::default()).resolved);
        assert!(!Location::from_raw(Coordinate::new(f64::NAN, 3.0)).resolved);
        assert!(Location::from_raw(Coordinate::new(0.0, 3.0)).resolved);
    }

    #[test]
    fn test_unresolved_location_hides_coordinate() {
        let location = Location {
            coordinate: Coordinate::new(12.9, 77.6),
            resolved: false,
        };
        assert_eq!(location.coordinate(), None);
    }
}
