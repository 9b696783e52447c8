//! Spatial clustering of places into zones.
//!
//! A greedy single-link pass stands in for a proper density-based
//! clustering query. Absorption is tested against the zone's seed point
//! only, not against every current member, so chained zones can exceed
//! `epsilon_m` in diameter. That behavior is load-bearing for score
//! compatibility; do not tighten it to transitive-closure DBSCAN.

use crate::geo;
use crate::model::{ClusteringParams, PlaceNode, Zone};

/// Partition `places` into zones.
///
/// Inputs smaller than `params.min_points` collapse into a single zone.
/// Always returns a valid partition: every place lands in exactly one zone.
pub fn cluster(places: &[PlaceNode], params: ClusteringParams) -> Vec<Zone> {
    if places.is_empty() {
        return Vec::new();
    }
    if places.len() < params.min_points {
        return vec![make_zone(0, places.iter().collect())];
    }

    let mut assigned = vec![false; places.len()];
    let mut zones = Vec::new();

    for seed_idx in 0..places.len() {
        if assigned[seed_idx] {
            continue;
        }
        assigned[seed_idx] = true;
        let seed = &places[seed_idx];
        let mut members = vec![seed];

        for other_idx in seed_idx + 1..places.len() {
            if assigned[other_idx] {
                continue;
            }
            let candidate = &places[other_idx];
            if geo::haversine_m(seed.location, candidate.location) <= params.epsilon_m {
                assigned[other_idx] = true;
                members.push(candidate);
            }
        }

        zones.push(make_zone(zones.len(), members));
    }

    zones
}

fn make_zone(id: usize, members: Vec<&PlaceNode>) -> Zone {
    let points: Vec<(f64, f64)> = members.iter().map(|p| p.location).collect();
    let centroid = geo::centroid(&points);
    Zone {
        id,
        centroid,
        members: members.iter().map(|p| p.id).collect(),
        radius_m: geo::max_radius_m(centroid, &points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn place(id: u64, lat: f64, lng: f64) -> PlaceNode {
        PlaceNode::new(id, format!("p{id}"), Category::Attraction, lat, lng)
    }

    #[test]
    fn test_tiny_input_single_zone() {
        let places = vec![place(1, 50.0, 14.0)];
        let zones = cluster(&places, ClusteringParams::default());
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].members, vec![1]);
    }

    #[test]
    fn test_nearby_points_share_zone() {
        // ~50 m apart: one zone at epsilon=2000.
        let places = vec![place(1, 50.0, 14.0), place(2, 50.00045, 14.0)];
        let zones = cluster(&places, ClusteringParams::default());
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].members.len(), 2);
    }

    #[test]
    fn test_distant_points_split() {
        // ~50 km apart: two zones at epsilon=2000.
        let places = vec![place(1, 50.0, 14.0), place(2, 50.45, 14.0)];
        let zones = cluster(&places, ClusteringParams::default());
        assert_eq!(zones.len(), 2);
    }

    #[test]
    fn test_partition_invariant() {
        let places = vec![
            place(1, 50.0, 14.0),
            place(2, 50.001, 14.001),
            place(3, 50.2, 14.2),
            place(4, 50.2005, 14.2),
            place(5, 51.0, 15.0),
        ];
        let zones = cluster(&places, ClusteringParams::default());

        let mut seen: Vec<u64> = zones.iter().flat_map(|z| z.members.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5], "union must equal the input set");

        let total: usize = zones.iter().map(|z| z.members.len()).sum();
        assert_eq!(total, places.len(), "zones must be pairwise disjoint");
    }

    #[test]
    fn test_absorption_is_seed_only() {
        // b is within epsilon of seed a; c is within epsilon of b but not
        // of a. Seed-only absorption leaves c in its own zone.
        let params = ClusteringParams {
            epsilon_m: 2000.0,
            min_points: 2,
        };
        let a = place(1, 50.0, 14.0);
        let b = place(2, 50.016, 14.0); // ~1.8 km from a
        let c = place(3, 50.032, 14.0); // ~3.6 km from a, ~1.8 km from b
        let zones = cluster(&[a, b, c], params);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].members, vec![1, 2]);
        assert_eq!(zones[1].members, vec![3]);
    }

    #[test]
    fn test_centroid_and_radius() {
        let places = vec![place(1, 50.0, 14.0), place(2, 50.001, 14.0)];
        let zones = cluster(&places, ClusteringParams::default());
        assert_eq!(zones.len(), 1);
        let zone = &zones[0];
        assert!((zone.centroid.0 - 50.0005).abs() < 1e-9);
        // Half of ~111 m.
        assert!(zone.radius_m > 40.0 && zone.radius_m < 70.0);
    }
}
