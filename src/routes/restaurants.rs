use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use std::sync::Arc;
use crate::core::RadiusFilter;
use crate::models::{ErrorResponse, GeoPoint, HealthResponse, NearbyQuery, NearbyResponse, RestaurantDetailResponse};
use crate::routes::SharedSession;
use crate::services::{ApiError, CandidateCache, RestaurantApiClient, LOAD_FAILED_MESSAGE};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub candidates: Arc<CandidateCache<RestaurantApiClient>>,
    pub filter: RadiusFilter,
    pub session: SharedSession,
}

/// Configure all restaurant routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/restaurants/nearby", web::get().to(nearby_restaurants))
        .route("/restaurants/{id}", web::get().to(restaurant_detail));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Nearby restaurants endpoint
///
/// GET /api/v1/restaurants/nearby?lat=33.8938&lon=35.5018&radiusKm=5&sortBy=rating
///
/// `radiusKm` is clamped into the configured bounds (default radius when
/// absent); `sortBy` is one of `distance`, `rating`, `name`.
async fn nearby_restaurants(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for nearby request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let center = GeoPoint::new(query.lat, query.lon);
    let sort_by = query.sort_by.unwrap_or_default();

    let candidates = match state.candidates.candidates().await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to load candidates: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to load restaurants".to_string(),
                message: LOAD_FAILED_MESSAGE.to_string(),
                status_code: 502,
            });
        }
    };

    let result = state
        .filter
        .find_nearby(&center, query.radius_km, &candidates, sort_by);

    tracing::info!(
        "Returning {} restaurants within {} km of {:.4}, {:.4} (from {} candidates)",
        result.results.len(),
        result.radius_km,
        center.latitude(),
        center.longitude(),
        result.total_candidates
    );

    HttpResponse::Ok().json(NearbyResponse {
        center,
        radius_km: result.radius_km,
        sort_by,
        results: result.results,
        total_candidates: result.total_candidates,
        without_location: result.without_location,
    })
}

/// Restaurant detail endpoint
///
/// GET /api/v1/restaurants/{id}
///
/// Returns the restaurant and its reviews.
async fn restaurant_detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    let client = state.candidates.provider();

    let fetched = tokio::try_join!(client.get_restaurant(id), client.get_reviews(id));

    match fetched {
        Ok((restaurant, reviews)) => {
            tracing::debug!("Fetched restaurant {} with {} reviews", id, reviews.len());
            HttpResponse::Ok().json(RestaurantDetailResponse { restaurant, reviews })
        }
        Err(ApiError::NotFound(message)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Restaurant not found".to_string(),
            message,
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch restaurant {}: {}", id, e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch restaurant".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
