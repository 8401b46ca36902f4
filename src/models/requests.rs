use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::SortKey;

/// Query for nearby restaurants
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
    #[serde(alias = "radius_km", rename = "radiusKm", default)]
    #[validate(range(min = 0.0))]
    pub radius_km: Option<f64>,
    #[serde(alias = "sort_by", rename = "sortBy", default)]
    pub sort_by: Option<SortKey>,
}

/// Place or move the session pin
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PinRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// Change the session radius
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiusRequest {
    #[serde(alias = "radius_km", rename = "radiusKm")]
    pub radius_km: f64,
}

/// Run or re-order the session results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortRequest {
    #[serde(alias = "sort_by", rename = "sortBy", default)]
    pub sort_by: Option<SortKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_validation() {
        let ok = NearbyQuery { lat: 33.9, lon: 35.5, radius_km: Some(4.5), sort_by: None };
        assert!(ok.validate().is_ok());

        let bad_lat = NearbyQuery { lat: 95.0, lon: 35.5, radius_km: None, sort_by: None };
        assert!(bad_lat.validate().is_err());

        let bad_radius = NearbyQuery { lat: 33.9, lon: 35.5, radius_km: Some(-1.0), sort_by: None };
        assert!(bad_radius.validate().is_err());
    }

    #[test]
    fn test_pin_request_validation() {
        assert!(PinRequest { latitude: 33.9, longitude: 35.5 }.validate().is_ok());
        assert!(PinRequest { latitude: 33.9, longitude: 190.0 }.validate().is_err());
    }

    #[test]
    fn test_sort_request_accepts_snake_case() {
        let req: SortRequest = serde_json::from_str(r#"{"sort_by": "rating"}"#).unwrap();
        assert_eq!(req.sort_by, Some(SortKey::Rating));

        let empty: SortRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.sort_by.is_none());
    }
}
