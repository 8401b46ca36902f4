use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tokio::sync::Mutex;
use validator::Validate;
use crate::core::{FilterSession, SessionError};
use crate::models::{ErrorResponse, GeoPoint, PinRequest, RadiusRequest, SortRequest};
use crate::routes::AppState;
use crate::services::{KeyValueStore, LOAD_FAILED_MESSAGE};

/// The map session served to the local frontend
///
/// A single session per process; the lock is never held across an await on
/// the upstream API.
pub type SharedSession = Arc<Mutex<FilterSession<Box<dyn KeyValueStore + Send>>>>;

/// Configure the session routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/session", web::get().to(get_session))
        .route("/session/placement", web::post().to(enter_placement))
        .route("/session/placement", web::delete().to(cancel_placement))
        .route("/session/pin", web::put().to(place_pin))
        .route("/session/pin", web::delete().to(remove_pin))
        .route("/session/radius", web::put().to(set_radius))
        .route("/session/filter", web::post().to(run_filter))
        .route("/session/sort", web::post().to(resort))
        .route("/session/results", web::delete().to(dismiss_results))
        .route("/session/reset", web::post().to(reset));
}

fn session_error(e: SessionError) -> HttpResponse {
    match e {
        SessionError::InvalidPin(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid pin".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
        _ => HttpResponse::Conflict().json(ErrorResponse {
            error: "Invalid session transition".to_string(),
            message: e.to_string(),
            status_code: 409,
        }),
    }
}

/// Current phase, pin, radius, and results
async fn get_session(state: web::Data<AppState>) -> impl Responder {
    let session = state.session.lock().await;
    HttpResponse::Ok().json(session.snapshot())
}

async fn enter_placement(state: web::Data<AppState>) -> impl Responder {
    let mut session = state.session.lock().await;
    match session.enter_pin_placement() {
        Ok(()) => HttpResponse::Ok().json(session.snapshot()),
        Err(e) => session_error(e),
    }
}

async fn cancel_placement(state: web::Data<AppState>) -> impl Responder {
    let mut session = state.session.lock().await;
    match session.cancel_pin_placement() {
        Ok(()) => HttpResponse::Ok().json(session.snapshot()),
        Err(e) => session_error(e),
    }
}

/// Place or drag the pin
///
/// PUT /api/v1/session/pin
///
/// ```json
/// { "latitude": 33.8938, "longitude": 35.5018 }
/// ```
async fn place_pin(
    state: web::Data<AppState>,
    req: web::Json<PinRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let mut session = state.session.lock().await;
    match session.place_pin(GeoPoint::new(req.latitude, req.longitude)) {
        Ok(()) => HttpResponse::Ok().json(session.snapshot()),
        Err(e) => session_error(e),
    }
}

async fn remove_pin(state: web::Data<AppState>) -> impl Responder {
    let mut session = state.session.lock().await;
    session.remove_pin();
    HttpResponse::Ok().json(session.snapshot())
}

/// Change the radius; the response carries the clamped value
async fn set_radius(
    state: web::Data<AppState>,
    req: web::Json<RadiusRequest>,
) -> impl Responder {
    let mut session = state.session.lock().await;
    let applied = session.set_radius(req.radius_km);
    tracing::debug!("Session radius set to {} km (requested {})", applied, req.radius_km);
    HttpResponse::Ok().json(session.snapshot())
}

/// Run the filter for the current pin and radius
///
/// POST /api/v1/session/filter
///
/// The session enters `filtering` while candidates are fetched. If the pin or
/// radius changes before the fetch returns, the run is discarded and 409 is
/// returned.
async fn run_filter(
    state: web::Data<AppState>,
    req: Option<web::Json<SortRequest>>,
) -> impl Responder {
    let sort_by = req.and_then(|r| r.sort_by).unwrap_or_default();

    let ticket = {
        let mut session = state.session.lock().await;
        match session.begin_filter() {
            Ok(ticket) => ticket,
            Err(e) => return session_error(e),
        }
    };

    let candidates = state.candidates.candidates().await;

    let mut session = state.session.lock().await;
    match candidates {
        Ok(candidates) => {
            if session.complete_filter(&ticket, &candidates, sort_by) {
                let center = ticket.center();
                tracing::info!(
                    "Session filter found {} restaurants within {} km of {:.4}, {:.4}",
                    session.results().len(),
                    ticket.radius_km(),
                    center.latitude(),
                    center.longitude()
                );
                HttpResponse::Ok().json(session.snapshot())
            } else {
                HttpResponse::Conflict().json(ErrorResponse {
                    error: "Stale filter run".to_string(),
                    message: "The pin or radius changed while filtering".to_string(),
                    status_code: 409,
                })
            }
        }
        Err(e) => {
            tracing::error!("Failed to load candidates for session filter: {}", e);
            session.fail_filter(&ticket);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to load restaurants".to_string(),
                message: LOAD_FAILED_MESSAGE.to_string(),
                status_code: 502,
            })
        }
    }
}

async fn resort(
    state: web::Data<AppState>,
    req: web::Json<SortRequest>,
) -> impl Responder {
    let mut session = state.session.lock().await;
    match session.resort(req.sort_by.unwrap_or_default()) {
        Ok(()) => HttpResponse::Ok().json(session.snapshot()),
        Err(e) => session_error(e),
    }
}

async fn dismiss_results(state: web::Data<AppState>) -> impl Responder {
    let mut session = state.session.lock().await;
    match session.dismiss_results() {
        Ok(()) => HttpResponse::Ok().json(session.snapshot()),
        Err(e) => session_error(e),
    }
}

async fn reset(state: web::Data<AppState>) -> impl Responder {
    let mut session = state.session.lock().await;
    session.reset();
    tracing::info!("Session reset");
    HttpResponse::Ok().json(session.snapshot())
}
