use crate::models::{Candidate, FilteredCandidate, GeoPoint};
use super::distance::distance;

/// Distance from `center` to a candidate, or `None` when it cannot be known
///
/// A missing point, an invalid point, or an invalid center all count as unknown.
#[inline]
pub fn candidate_distance(center: &GeoPoint, candidate: &Candidate) -> Option<f64> {
    let point = candidate.point.as_ref()?;
    if !center.is_valid() || !point.is_valid() {
        return None;
    }

    let d = distance(center, point);
    if d.is_nan() {
        None
    } else {
        Some(d)
    }
}

/// Check whether a known distance falls inside the radius
///
/// A non-positive radius only admits exactly coincident points.
#[inline]
pub fn is_within_radius(distance_km: Option<f64>, radius_km: f64) -> bool {
    match distance_km {
        Some(d) => d <= radius_km.max(0.0),
        None => false,
    }
}

/// Annotate every candidate with its distance from `center` and an in-radius flag
///
/// Output has the same length and order as the input. The input is not touched;
/// every call recomputes from scratch.
pub fn filter_by_radius(
    center: &GeoPoint,
    radius_km: f64,
    candidates: &[Candidate],
) -> Vec<FilteredCandidate> {
    candidates
        .iter()
        .map(|candidate| {
            let distance_km = candidate_distance(center, candidate);
            FilteredCandidate {
                candidate: candidate.clone(),
                distance_km,
                in_radius: is_within_radius(distance_km, radius_km),
            }
        })
        .collect()
}

/// Keep only the entries flagged as in radius, preserving order
pub fn in_radius_only(results: Vec<FilteredCandidate>) -> Vec<FilteredCandidate> {
    results.into_iter().filter(|r| r.in_radius).collect()
}
