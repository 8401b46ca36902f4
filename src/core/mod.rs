// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod radius;
pub mod session;
pub mod sorting;

pub use distance::{distance, haversine_distance, EARTH_RADIUS_KM};
pub use filters::{filter_by_radius, in_radius_only, is_within_radius};
pub use radius::{RadiusBounds, RadiusFilter, NearbyResult};
pub use session::{FilterSession, FilterTicket, Phase, SessionError, SessionSnapshot};
pub use sorting::sort_results;
