use crate::models::{Candidate, FilteredCandidate, GeoPoint, SortKey};
use crate::core::{
    filters::{filter_by_radius, in_radius_only},
    sorting::sort_results,
};

/// Allowed radius range, default, and slider step, all in kilometers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusBounds {
    min_km: f64,
    max_km: f64,
    default_km: f64,
    step_km: f64,
}

impl RadiusBounds {
    /// Build bounds, swapping an inverted range and pulling the default inside it
    pub fn new(min_km: f64, max_km: f64, default_km: f64, step_km: f64) -> Self {
        let (min_km, max_km) = if min_km <= max_km { (min_km, max_km) } else { (max_km, min_km) };
        let default_km = if default_km.is_nan() { min_km } else { default_km.clamp(min_km, max_km) };
        let step_km = if step_km.is_finite() && step_km > 0.0 { step_km } else { 0.0 };

        Self { min_km, max_km, default_km, step_km }
    }

    pub fn min_km(&self) -> f64 {
        self.min_km
    }

    pub fn max_km(&self) -> f64 {
        self.max_km
    }

    pub fn default_km(&self) -> f64 {
        self.default_km
    }

    pub fn step_km(&self) -> f64 {
        self.step_km
    }

    /// Snap a requested radius to the step grid and clamp it into range
    ///
    /// NaN falls back to the default radius.
    pub fn clamp(&self, radius_km: f64) -> f64 {
        if radius_km.is_nan() {
            return self.default_km;
        }

        let snapped = if self.step_km > 0.0 && radius_km.is_finite() {
            let steps = ((radius_km - self.min_km) / self.step_km).round();
            self.min_km + steps * self.step_km
        } else {
            radius_km
        };

        snapped.clamp(self.min_km, self.max_km)
    }
}

impl Default for RadiusBounds {
    fn default() -> Self {
        Self::new(1.0, 10.0, 3.0, 0.5)
    }
}

/// Result of a nearby search
#[derive(Debug, Clone)]
pub struct NearbyResult {
    /// In-radius candidates in the requested order
    pub results: Vec<FilteredCandidate>,
    /// Radius actually applied after clamping
    pub radius_km: f64,
    pub total_candidates: usize,
    /// Candidates whose distance could not be computed
    pub without_location: usize,
}

/// Filter-then-sort pipeline
///
/// # Pipeline Stages
/// 1. Radius clamped into the configured bounds
/// 2. Every candidate annotated with distance and in-radius flag
/// 3. In-radius subset kept
/// 4. Subset ordered by the sort key
#[derive(Debug, Clone, Default)]
pub struct RadiusFilter {
    bounds: RadiusBounds,
}

impl RadiusFilter {
    pub fn new(bounds: RadiusBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &RadiusBounds {
        &self.bounds
    }

    /// Find the candidates within `radius_km` of `center`, sorted by `key`
    ///
    /// `radius_km` of `None` uses the default radius.
    pub fn find_nearby(
        &self,
        center: &GeoPoint,
        radius_km: Option<f64>,
        candidates: &[Candidate],
        key: SortKey,
    ) -> NearbyResult {
        let radius_km = radius_km
            .map(|r| self.bounds.clamp(r))
            .unwrap_or(self.bounds.default_km);

        let annotated = filter_by_radius(center, radius_km, candidates);
        let without_location = annotated.iter().filter(|r| r.distance_km.is_none()).count();
        let results = sort_results(&in_radius_only(annotated), key);

        tracing::debug!(
            "Radius filter kept {} of {} candidates within {} km ({} without location)",
            results.len(),
            candidates.len(),
            radius_km,
            without_location
        );

        NearbyResult {
            results,
            radius_km,
            total_candidates: candidates.len(),
            without_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_candidate(id: &str, name: &str, rating: Option<f64>, lat: f64, lon: f64) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: name.to_string(),
            rating,
            point: Some(GeoPoint::new(lat, lon)),
        }
    }

    #[test]
    fn test_clamp_and_snap() {
        let bounds = RadiusBounds::default();

        assert_eq!(bounds.clamp(0.2), 1.0);
        assert_eq!(bounds.clamp(42.0), 10.0);
        assert_eq!(bounds.clamp(4.5), 4.5);
        assert_eq!(bounds.clamp(4.4), 4.5);
        assert_eq!(bounds.clamp(f64::NAN), 3.0);
        assert_eq!(bounds.clamp(f64::INFINITY), 10.0);
    }

    #[test]
    fn test_bounds_normalization() {
        let bounds = RadiusBounds::new(10.0, 1.0, 50.0, -1.0);
        assert_eq!(bounds.min_km(), 1.0);
        assert_eq!(bounds.max_km(), 10.0);
        assert_eq!(bounds.default_km(), 10.0);
        assert_eq!(bounds.step_km(), 0.0);
        assert_eq!(bounds.clamp(2.37), 2.37);
    }

    #[test]
    fn test_find_nearby_filters_and_sorts() {
        let filter = RadiusFilter::default();
        let center = GeoPoint::new(33.8938, 35.5018);

        let candidates = vec![
            create_candidate("tripoli", "Tripoli Sweets", Some(5.0), 34.4367, 35.8497),
            create_candidate("hamra", "Hamra Cafe", Some(3.5), 33.8966, 35.4823),
            create_candidate("downtown", "Downtown Grill", Some(4.0), 33.8950, 35.5030),
            Candidate {
                id: "unknown".to_string(),
                name: "No Address".to_string(),
                rating: Some(5.0),
                point: None,
            },
        ];

        let result = filter.find_nearby(&center, Some(5.0), &candidates, SortKey::Distance);

        assert_eq!(result.total_candidates, 4);
        assert_eq!(result.without_location, 1);
        let ids: Vec<&str> = result.results.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["downtown", "hamra"]);

        let by_rating = filter.find_nearby(&center, Some(5.0), &candidates, SortKey::Rating);
        assert_eq!(by_rating.results[0].candidate.id, "downtown");
    }

    #[test]
    fn test_find_nearby_uses_default_radius() {
        let filter = RadiusFilter::default();
        let center = GeoPoint::new(33.8938, 35.5018);

        let result = filter.find_nearby(&center, None, &[], SortKey::Name);
        assert_eq!(result.radius_km, 3.0);
        assert!(result.results.is_empty());
    }
}
