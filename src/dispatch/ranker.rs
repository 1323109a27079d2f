//! Distance ranking of delivery agents.

use crate::geo::distance_km;
use crate::model::{AgentId, DeliveryAgent, Location, RankedAgent};
use serde::{Deserialize, Serialize};

/// Anything that can be ranked: plain agents or an earlier ranking.
pub trait Positioned {
    fn agent(&self) -> &DeliveryAgent;
}

impl Positioned for DeliveryAgent {
    fn agent(&self) -> &DeliveryAgent {
        self
    }
}

impl Positioned for RankedAgent {
    fn agent(&self) -> &DeliveryAgent {
        &self.agent
    }
}

/// Result of a ranking pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    /// False when the origin was unresolved and `candidates` is the input order.
    pub origin_resolved: bool,
    pub candidates: Vec<RankedAgent>,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn get(&self, rank_index: usize) -> Option<&RankedAgent> {
        self.candidates.get(rank_index)
    }

    pub fn nearest(&self) -> Option<&RankedAgent> {
        self.candidates.first()
    }

    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.candidates.iter().map(|c| c.agent.id.clone()).collect()
    }
}

/// Orders agents by distance from `from`, nearest first.
///
/// - Ties keep their input order.
/// - Agents with an unset position, or a non-finite distance, are left out.
/// - An unresolved `from` returns every agent in input order with no distances and
///   `origin_resolved = false`; callers must not read that order as proximity.
///
/// The input is never modified and durable agent ids are preserved; the position in
/// the output is carried separately as `rank_index`.
pub fn rank<P: Positioned>(agents: &[P], from: &Location) -> Ranking {
    let Some(origin) = from.coordinate() else {
        let candidates = agents
            .iter()
            .enumerate()
            .map(|(rank_index, p)| RankedAgent {
                agent: p.agent().clone(),
                rank_index,
                distance_km: None,
            })
            .collect();
        return Ranking {
            origin_resolved: false,
            candidates,
        };
    };

    let mut measured: Vec<(f64, &DeliveryAgent)> = agents
        .iter()
        .map(Positioned::agent)
        .filter_map(|agent| {
            let position = agent.location().coordinate()?;
            let km = distance_km(position, origin);
            km.is_finite().then_some((km, agent))
        })
        .collect();
    // sort_by is stable; distances are finite so total_cmp agrees with <
    measured.sort_by(|a, b| a.0.total_cmp(&b.0));

    let candidates = measured
        .into_iter()
        .enumerate()
        .map(|(rank_index, (km, agent))| RankedAgent {
            agent: agent.clone(),
            rank_index,
            distance_km: Some(km),
        })
        .collect();

    Ranking {
        origin_resolved: true,
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    // ~0.009 degrees of latitude per km at the equator
    fn agent_at_km(id: &str, km: f64) -> DeliveryAgent {
        DeliveryAgent::new(id, id, Coordinate::new(km / 111.195, 30.0), 3)
    }

    fn origin() -> Location {
        Location::resolved(Coordinate::new(0.0, 30.0))
    }

    #[test]
    fn test_nearest_first_with_rank_indices() {
        let pool = vec![
            agent_at_km("five", 5.0),
            agent_at_km("one", 1.0),
            agent_at_km("three", 3.0),
        ];
        let ranking = rank(&pool, &origin());

        assert!(ranking.origin_resolved);
        let ids: Vec<_> = ranking.agent_ids().into_iter().map(|id| id.0).collect();
        assert_eq!(ids, vec!["one", "three", "five"]);
        let ranks: Vec<_> = ranking.candidates.iter().map(|c| c.rank_index).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let a = vec![agent_at_km("x", 2.0), agent_at_km("y", 4.0), agent_at_km("z", 1.0)];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(rank(&a, &origin()), rank(&b, &origin()));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let pool = vec![
            agent_at_km("late", 2.0),
            agent_at_km("first", 2.0),
            agent_at_km("near", 1.0),
        ];
        let ids: Vec<_> = rank(&pool, &origin())
            .agent_ids()
            .into_iter()
            .map(|id| id.0)
            .collect();
        assert_eq!(ids, vec!["near", "late", "first"]);
    }

    #[test]
    fn test_sorted_and_idempotent() {
        let pool: Vec<_> = [7.5, 0.2, 3.3, 3.3, 12.0, 0.9]
            .iter()
            .enumerate()
            .map(|(i, km)| agent_at_km(&format!("a{i}"), *km))
            .collect();
        let once = rank(&pool, &origin());
        let distances: Vec<f64> = once.candidates.iter().filter_map(|c| c.distance_km).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));

        let twice = rank(&once.candidates, &origin());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_source_list_is_untouched() {
        let pool = vec![agent_at_km("b", 3.0), agent_at_km("a", 1.0)];
        let before = pool.clone();
        let _ = rank(&pool, &origin());
        assert_eq!(pool, before);
    }

    #[test]
    fn test_unset_positions_are_excluded() {
        let pool = vec![
            DeliveryAgent::new("nowhere", "nowhere", Coordinate::default(), 1),
            agent_at_km("here", 1.0),
        ];
        let ranking = rank(&pool, &origin());
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking.candidates[0].agent.id.as_str(), "here");
    }

    #[test]
    fn test_unresolved_origin_returns_input_unsorted() {
        let pool = vec![agent_at_km("far", 9.0), agent_at_km("near", 1.0)];
        let ranking = rank(&pool, &Location::unresolved());

        assert!(!ranking.origin_resolved);
        let ids: Vec<_> = ranking.agent_ids().into_iter().map(|id| id.0).collect();
        assert_eq!(ids, vec!["far", "near"]);
        assert!(ranking.candidates.iter().all(|c| c.distance_km.is_none()));
    }

    #[test]
    fn test_empty_pool() {
        let pool: Vec<DeliveryAgent> = Vec::new();
        assert!(rank(&pool, &origin()).is_empty());
    }
}
