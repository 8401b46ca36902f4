// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{GeoPoint, GeoError, Restaurant, Review, Candidate, FilteredCandidate, SortKey};
pub use requests::{NearbyQuery, PinRequest, RadiusRequest, SortRequest};
pub use responses::{NearbyResponse, RestaurantDetailResponse, HealthResponse, ErrorResponse};
