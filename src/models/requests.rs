use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{AvailabilityPayload, Event, PairingRecommendation, Restaurant};

/// Request to rank restaurants for one event
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RankRequest {
    #[validate(nested)]
    pub event: Event,
    #[validate(length(max = 500), nested)]
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub travel_times: Option<HashMap<String, u32>>,
    /// Partial `PairingConfig` layered over the server's settings
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    #[serde(default)]
    #[validate(nested)]
    pub availability: Vec<AvailabilityPayload>,
}

/// Request to re-rank Phase A output with live availability
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyAvailabilityRequest {
    #[validate(nested)]
    pub event: Event,
    #[validate(length(max = 500))]
    pub recommendations: Vec<PairingRecommendation>,
    #[validate(nested)]
    pub availability: Vec<AvailabilityPayload>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// Request for the best pairing of each of several events
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TopPairingsRequest {
    #[validate(length(min = 1, max = 50), nested)]
    pub events: Vec<Event>,
    #[validate(length(max = 500), nested)]
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub travel_times: Option<HashMap<String, u32>>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    #[serde(default)]
    #[validate(nested)]
    pub availability: Vec<AvailabilityPayload>,
}
