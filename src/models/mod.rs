// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AvailabilityPayload, DiningWindows, Event, FallbackWindow, FitResult, Location, MealIntent,
    PairingConfig, PairingRecommendation, RecommendedWindows, Restaurant, ScoreBreakdown,
    ScoringWeights, TimeWindow, TopPairing,
};
pub use requests::{ApplyAvailabilityRequest, RankRequest, TopPairingsRequest};
pub use responses::{AvailabilityResponse, ErrorResponse, HealthResponse, RankResponse, TopPairingsResponse};
