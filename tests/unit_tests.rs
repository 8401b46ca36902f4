// Unit tests for Tayib Geo

use tayib_geo::core::{
    distance::{distance, haversine_distance},
    filters::{filter_by_radius, in_radius_only},
    sorting::sort_results,
};
use tayib_geo::models::{Candidate, GeoPoint, SortKey};

/// Small deterministic generator so the sweeps below are reproducible
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn point_near(&mut self, lat: f64, lon: f64, spread_deg: f64) -> GeoPoint {
        GeoPoint::new(
            lat + (self.next_f64() - 0.5) * spread_deg,
            lon + (self.next_f64() - 0.5) * spread_deg,
        )
    }
}

fn candidates_around(rng: &mut Lcg, n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| Candidate {
            id: i.to_string(),
            name: format!("Restaurant {}", (b'a' + (i % 26) as u8) as char),
            rating: if i % 4 == 0 { None } else { Some((i % 5) as f64) },
            point: if i % 7 == 0 { None } else { Some(rng.point_near(33.8938, 35.5018, 0.3)) },
        })
        .collect()
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(33.8938, 35.5018, 33.8938, 35.5018);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_beirut_to_sidon() {
    // Beirut to Sidon is roughly 40 km
    let distance = haversine_distance(33.8938, 35.5018, 33.5571, 35.3729);
    assert!(distance > 35.0 && distance < 45.0, "got {}", distance);
}

#[test]
fn test_distance_symmetry() {
    let mut rng = Lcg(7);
    for _ in 0..200 {
        let a = rng.point_near(0.0, 0.0, 170.0);
        let b = rng.point_near(0.0, 0.0, 170.0);
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-9);
    }
}

#[test]
fn test_distance_identity() {
    let mut rng = Lcg(11);
    for _ in 0..100 {
        let a = rng.point_near(0.0, 0.0, 170.0);
        assert!(distance(&a, &a).abs() < 1e-9);
    }
}

#[test]
fn test_triangle_inequality_for_nearby_points() {
    let mut rng = Lcg(13);
    for _ in 0..200 {
        let a = rng.point_near(33.9, 35.5, 3.0);
        let b = rng.point_near(33.9, 35.5, 3.0);
        let c = rng.point_near(33.9, 35.5, 3.0);
        assert!(distance(&a, &c) <= distance(&a, &b) + distance(&b, &c) + 1e-6);
    }
}

#[test]
fn test_inclusion_is_monotone_in_radius() {
    let mut rng = Lcg(17);
    let candidates = candidates_around(&mut rng, 120);
    let center = GeoPoint::new(33.8938, 35.5018);

    let mut previous: Vec<String> = Vec::new();
    for step in 0..=40 {
        let radius = step as f64 * 0.5;
        let current: Vec<String> = in_radius_only(filter_by_radius(&center, radius, &candidates))
            .into_iter()
            .map(|r| r.candidate.id)
            .collect();

        assert!(previous.iter().all(|id| current.contains(id)), "radius {} dropped a candidate", radius);
        previous = current;
    }
}

#[test]
fn test_filter_preserves_length_and_order() {
    let mut rng = Lcg(19);
    let candidates = candidates_around(&mut rng, 60);
    let center = GeoPoint::new(33.8938, 35.5018);

    let results = filter_by_radius(&center, 5.0, &candidates);

    assert_eq!(results.len(), candidates.len());
    for (result, candidate) in results.iter().zip(&candidates) {
        assert_eq!(&result.candidate, candidate);
        if candidate.point.is_none() {
            assert!(result.distance_km.is_none());
            assert!(!result.in_radius);
        }
    }
}

#[test]
fn test_sort_by_name_is_idempotent() {
    let mut rng = Lcg(23);
    let candidates = candidates_around(&mut rng, 80);
    let center = GeoPoint::new(33.8938, 35.5018);
    let in_radius = in_radius_only(filter_by_radius(&center, 10.0, &candidates));

    let once = sort_results(&in_radius, SortKey::Name);
    let twice = sort_results(&once, SortKey::Name);

    assert_eq!(once, twice);
}

#[test]
fn test_sort_by_distance_is_ascending() {
    let mut rng = Lcg(29);
    let candidates = candidates_around(&mut rng, 80);
    let center = GeoPoint::new(33.8938, 35.5018);
    let sorted = sort_results(&filter_by_radius(&center, 10.0, &candidates), SortKey::Distance);

    let known: Vec<f64> = sorted.iter().filter_map(|r| r.distance_km).collect();
    assert!(known.windows(2).all(|w| w[0] <= w[1]));

    // Unknown distances sink to the end
    let first_unknown = sorted.iter().position(|r| r.distance_km.is_none()).unwrap();
    assert!(sorted[first_unknown..].iter().all(|r| r.distance_km.is_none()));
}

#[test]
fn test_sort_by_rating_is_descending() {
    let mut rng = Lcg(31);
    let candidates = candidates_around(&mut rng, 50);
    let center = GeoPoint::new(33.8938, 35.5018);
    let sorted = sort_results(&filter_by_radius(&center, 10.0, &candidates), SortKey::Rating);

    let ratings: Vec<f64> = sorted.iter().map(|r| r.candidate.rating.unwrap_or(0.0)).collect();
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
}
