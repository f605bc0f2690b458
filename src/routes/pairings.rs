use actix_web::{web, HttpResponse, Responder, ResponseError};
use validator::Validate;

use crate::core::{apply_availability, Ranker};
use crate::models::{
    ApplyAvailabilityRequest, AvailabilityResponse, ErrorResponse, HealthResponse, PairingConfig,
    RankRequest, RankResponse, TopPairingsRequest, TopPairingsResponse,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ranker: Ranker,
}

impl AppState {
    pub fn new(config: PairingConfig) -> Self {
        Self {
            ranker: Ranker::new(config),
        }
    }
}

/// Configure all pairing-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/pairings/rank", web::post().to(rank))
        .route("/pairings/availability", web::post().to(availability))
        .route("/pairings/top", web::post().to(top_pairings));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    ErrorResponse::bad_request(error, message).error_response()
}

/// Server settings with the request's partial overrides layered on top
fn ranker_for(state: &AppState, overrides: Option<&serde_json::Value>) -> Result<Ranker, HttpResponse> {
    let Some(overrides) = overrides else {
        return Ok(state.ranker.clone());
    };

    state
        .ranker
        .config()
        .with_overrides(overrides)
        .map(Ranker::new)
        .map_err(|e| {
            tracing::info!("Rejected pairing config override: {}", e);
            bad_request("Invalid config", e.to_string())
        })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank restaurants for an event
///
/// POST /api/v1/pairings/rank
///
/// Request body:
/// ```json
/// {
///   "event": { "id": "string", "type": "SHOW", "startAt": "2024-01-15T19:00:00-08:00", ... },
///   "restaurants": [{ "id": "string", ... }],
///   "travelTimes": { "restaurantId": 12 },
///   "config": { "pre_buffer_minutes": 15 },
///   "availability": [{ "restaurantId": "string", "date": "2024-01-15", "partySize": 2, "availableTimes": ["17:30"] }]
/// }
/// ```
async fn rank(state: web::Data<AppState>, req: web::Json<RankRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let ranker = match ranker_for(&state, req.config.as_ref()) {
        Ok(ranker) => ranker,
        Err(response) => return response,
    };

    tracing::info!(
        "Ranking {} restaurants for event {} ({} availability payloads)",
        req.restaurants.len(),
        req.event.id,
        req.availability.len()
    );

    let result = ranker.rank(
        &req.event,
        &req.restaurants,
        req.travel_times.as_ref(),
        Some(req.availability.as_slice()),
    );

    HttpResponse::Ok().json(RankResponse {
        ranking_id: uuid::Uuid::new_v4().to_string(),
        event_id: req.event.id.clone(),
        recommendations: result.recommendations,
        total_candidates: result.total_candidates,
        excluded_count: result.excluded_count,
    })
}

/// Re-rank previously returned recommendations with live availability
///
/// POST /api/v1/pairings/availability
async fn availability(
    state: web::Data<AppState>,
    req: web::Json<ApplyAvailabilityRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for availability request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let ranker = match ranker_for(&state, req.config.as_ref()) {
        Ok(ranker) => ranker,
        Err(response) => return response,
    };

    let ApplyAvailabilityRequest {
        event,
        mut recommendations,
        availability,
        ..
    } = req.into_inner();

    apply_availability(&mut recommendations, &availability, &event, ranker.config());

    HttpResponse::Ok().json(AvailabilityResponse {
        event_id: event.id,
        recommendations,
    })
}

/// Best pairing per event
///
/// POST /api/v1/pairings/top
///
/// Each event is ranked on its own; events with no eligible restaurant are
/// omitted from `pairings`.
async fn top_pairings(state: web::Data<AppState>, req: web::Json<TopPairingsRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for top pairings request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let ranker = match ranker_for(&state, req.config.as_ref()) {
        Ok(ranker) => ranker,
        Err(response) => return response,
    };

    let pairings = ranker.top_pairings(
        &req.events,
        &req.restaurants,
        req.travel_times.as_ref(),
        Some(req.availability.as_slice()),
    );

    tracing::info!("Paired {} of {} events", pairings.len(), req.events.len());

    HttpResponse::Ok().json(TopPairingsResponse {
        pairings,
        total_events: req.events.len(),
    })
}
