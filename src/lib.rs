//! Happenstance Pairing - pairs events with nearby, fitting restaurants
//!
//! The core ranks restaurants in two phases: Phase A scores fit (service style,
//! travel time, cuisine) before booking availability is known, Phase B folds in
//! live seating times supplied later by a client and re-ranks.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use core::{
    apply_availability, compute_dining_windows, haversine_distance, rank_restaurants_for_event,
    score_restaurant_fit, ClockTime, Ranker,
};
pub use error::PairingError;
pub use models::{
    AvailabilityPayload, Event, MealIntent, PairingConfig, PairingRecommendation, Restaurant,
    ScoringWeights,
};
