//! Tayib Geo - geo-radius restaurant filter for the Tayib restaurant client
//!
//! This library provides the map page's core: haversine distance, the radius
//! filter, result sorting, and the pin/radius session state machine, plus the
//! REST client and HTTP service that sit around them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    distance, filter_by_radius, sort_results, FilterSession, Phase, RadiusBounds, RadiusFilter,
    SessionSnapshot,
};
pub use models::{Candidate, FilteredCandidate, GeoPoint, SortKey};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let beirut = GeoPoint::new(33.8938, 35.5018);
        assert_eq!(distance(&beirut, &beirut), 0.0);
        assert_eq!(RadiusBounds::default().default_km(), 3.0);
    }
}
