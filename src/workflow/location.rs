//! Geocoding and device location, behind a trait so callers can inject them.

use crate::model::{Coordinate, Location};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("Empty location query")]
    EmptyQuery,

    #[error("No place matches {0:?}")]
    NoMatch(String),

    /// The geocoding backend could not be reached.
    #[error("Location service unavailable: {0}")]
    Unavailable(String),
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub description: String,
    pub location: Location,
}

/// Resolves free-text places and reports where this device is.
///
/// There is no process-wide "last known location"; whoever needs a position
/// asks the provider it was handed.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<ResolvedPlace, LocationError>;

    /// Current device position; unresolved when no fix is available.
    async fn current_location(&self) -> Location;
}

/// In-memory gazetteer. Lookups are case-insensitive; an exact name wins over
/// the first (alphabetical) name containing the query.
#[derive(Debug, Clone, Default)]
pub struct StaticLocationProvider {
    places: HashMap<String, ResolvedPlace>,
    current: Option<Coordinate>,
}

impl StaticLocationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, description: impl Into<String>, coordinate: Coordinate) -> Self {
        let description = description.into();
        self.places.insert(
            description.to_lowercase(),
            ResolvedPlace {
                description,
                location: Location::from_raw(coordinate),
            },
        );
        self
    }

    pub fn with_current(mut self, coordinate: Coordinate) -> Self {
        self.current = Some(coordinate);
        self
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn resolve(&self, query: &str) -> Result<ResolvedPlace, LocationError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(LocationError::EmptyQuery);
        }
        if let Some(place) = self.places.get(&needle) {
            return Ok(place.clone());
        }
        let mut partial: Vec<_> = self
            .places
            .iter()
            .filter(|(name, _)| name.contains(&needle))
            .collect();
        partial.sort_by(|a, b| a.0.cmp(b.0));
        partial
            .first()
            .map(|(_, place)| (*place).clone())
            .ok_or_else(|| LocationError::NoMatch(query.to_string()))
    }

    async fn current_location(&self) -> Location {
        self.current.map_or_else(Location::unresolved, Location::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gazetteer() -> StaticLocationProvider {
        StaticLocationProvider::new()
            .with_place("Central Depot", Coordinate::new(12.9716, 77.5946))
            .with_place("North Depot", Coordinate::new(13.0358, 77.5970))
    }

    #[tokio::test]
    async fn test_resolve_exact_and_partial() {
        let places = gazetteer();
        let exact = places.resolve("central depot").await.unwrap();
        assert_eq!(exact.description, "Central Depot");
        assert!(exact.location.resolved);

        let partial = places.resolve("North").await.unwrap();
        assert_eq!(partial.description, "North Depot");
    }

    #[tokio::test]
    async fn test_resolve_failures() {
        let places = gazetteer();
        assert_eq!(places.resolve("  ").await, Err(LocationError::EmptyQuery));
        assert!(matches!(
            places.resolve("Harbour").await,
            Err(LocationError::NoMatch(_))
        ));
    }

    #[tokio::test]
    async fn test_current_location_defaults_to_unresolved() {
        assert!(!gazetteer().current_location().await.resolved);
        let located = gazetteer().with_current(Coordinate::new(12.9, 77.6));
        assert!(located.current_location().await.resolved);
    }
}
