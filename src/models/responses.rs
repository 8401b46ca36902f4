use serde::{Deserialize, Serialize};
use crate::models::domain::{FilteredCandidate, GeoPoint, Restaurant, Review, SortKey};

/// Response for the nearby restaurants endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub center: GeoPoint,
    #[serde(rename = "radiusKm")]
    pub radius_km: f64,
    #[serde(rename = "sortBy")]
    pub sort_by: SortKey,
    pub results: Vec<FilteredCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "withoutLocation")]
    pub without_location: usize,
}

/// A restaurant together with its reviews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantDetailResponse {
    pub restaurant: Restaurant,
    pub reviews: Vec<Review>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
