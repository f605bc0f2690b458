use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::clock::ClockTime;
use crate::error::PairingError;

/// Assumed length of an event that carries neither an end time nor a duration
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 120;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Whether the meal precedes, follows, or is the event itself
///
/// An absent `mealIntent` is `BeforeEvent`. Any value present that is not one of
/// the two timed intents, `null` and non-strings included, is `MealIsEvent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "serde_json::Value")]
pub enum MealIntent {
    #[default]
    BeforeEvent,
    AfterEvent,
    MealIsEvent,
}

impl From<serde_json::Value> for MealIntent {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => s.into(),
            _ => MealIntent::MealIsEvent,
        }
    }
}

impl From<String> for MealIntent {
    /// Anything other than the two timed intents falls back to `MealIsEvent`
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "BEFORE_EVENT" => MealIntent::BeforeEvent,
            "AFTER_EVENT" => MealIntent::AfterEvent,
            _ => MealIntent::MealIsEvent,
        }
    }
}

/// One occurrence someone plans to attend
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[validate(length(min = 1))]
    pub id: String,
    /// Free-form category (e.g. `FAMILY_STYLE_GATHERING`, `SHOW`), matched by keyword
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub location: Option<Location>,
    /// Unresolved address when `location` has not been geocoded yet
    #[serde(default)]
    pub address: Option<String>,
    pub start_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub end_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub meal_intent: MealIntent,
    #[validate(range(min = 1))]
    pub party_size: u32,
    #[serde(default)]
    pub has_kids: bool,
    #[serde(default)]
    pub travel_mode: Option<String>,
}

impl Event {
    /// Parse an ISO-8601 timestamp that must carry an explicit UTC offset
    pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, PairingError> {
        DateTime::parse_from_rfc3339(value.trim()).map_err(|source| PairingError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
    }

    /// Case-insensitive keyword test against the event type
    pub fn type_mentions(&self, keyword: &str) -> bool {
        self.event_type
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    }

    /// Family-type events, kids with a party of four or more, or any party of six or more
    pub fn requires_family_style(&self) -> bool {
        self.type_mentions("family")
            || (self.has_kids && self.party_size >= 4)
            || self.party_size >= 6
    }

    /// Explicit end, else start plus duration, else start plus two hours
    ///
    /// Expressed in the start timestamp's offset so clock times stay event-local.
    pub fn resolved_end(&self) -> DateTime<FixedOffset> {
        if let Some(end_at) = self.end_at {
            return end_at.with_timezone(self.start_at.offset());
        }

        let minutes = self
            .duration_minutes
            .filter(|&m| m > 0)
            .map(i64::from)
            .unwrap_or(DEFAULT_EVENT_DURATION_MINUTES);

        self.start_at + Duration::minutes(minutes)
    }
}

/// A dining candidate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub cuisine_tags: Vec<String>,
    /// `family_style` and `share_plates` are the tags that matter for scoring
    #[serde(default)]
    pub service_style_tags: Vec<String>,
    /// `large_tables`, `kids_menu`, `noise_tolerant`, `private_room` earn bonuses
    #[serde(default)]
    pub group_signals: Vec<String>,
    #[serde(default)]
    pub price_tier: Option<u8>,
    /// Opening hours as supplied by the provider; not consulted when scoring
    #[serde(default)]
    pub hours: Option<serde_json::Value>,
}

impl Restaurant {
    pub fn has_service_style(&self, tag: &str) -> bool {
        self.service_style_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn has_group_signal(&self, signal: &str) -> bool {
        self.group_signals.iter().any(|s| s.eq_ignore_ascii_case(signal))
    }
}

/// Live seating availability reported by a client for one restaurant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPayload {
    #[validate(length(min = 1))]
    pub restaurant_id: String,
    pub date: NaiveDate,
    pub party_size: u32,
    /// Local to the event, in any order
    #[serde(default)]
    pub available_times: Vec<ClockTime>,
}

/// Start/end of a seating range, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl TimeWindow {
    pub fn new(start_time: ClockTime, end_time: ClockTime) -> Self {
        Self { start_time, end_time }
    }

    #[inline]
    pub fn contains(&self, time: ClockTime) -> bool {
        time.is_within(self.start_time, self.end_time)
    }
}

/// A labeled alternative to the preferred window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackWindow {
    pub label: String,
    #[serde(flatten)]
    pub window: TimeWindow,
}

impl FallbackWindow {
    pub fn new(label: &str, window: TimeWindow) -> Self {
        Self {
            label: label.to_string(),
            window,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedWindows {
    pub preferred: TimeWindow,
    pub fallbacks: Vec<FallbackWindow>,
}

/// Output of the dining window calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningWindows {
    pub target_time: ClockTime,
    #[serde(flatten)]
    pub windows: RecommendedWindows,
}

/// The four weighted sub-scores, each in `[0, 100]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub service_style: f64,
    pub travel_time: f64,
    pub cuisine_diet: f64,
    pub availability_fit: f64,
}

impl ScoreBreakdown {
    /// `Σ weight_i * breakdown_i`
    pub fn weighted_total(&self, weights: &ScoringWeights) -> f64 {
        self.service_style * weights.service_style
            + self.travel_time * weights.travel_time
            + self.cuisine_diet * weights.cuisine_diet
            + self.availability_fit * weights.availability
    }
}

/// Phase A fit for one restaurant against one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitResult {
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub reasons: Vec<String>,
    pub excluded: bool,
}

/// One ranked restaurant for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingRecommendation {
    pub restaurant_id: String,
    pub score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub recommended_windows: RecommendedWindows,
    pub target_time: ClockTime,
    pub availability_pending: bool,
    /// Up to three real seating times, filled in once availability is known
    #[serde(default)]
    pub recommended_available_times: Option<Vec<ClockTime>>,
    #[serde(default)]
    pub why_matched: Vec<String>,
}

/// Best recommendation for one event in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPairing {
    pub event_id: String,
    pub restaurant_name: String,
    /// `why_matched` joined for display
    pub match_reason: String,
    #[serde(flatten)]
    pub recommendation: PairingRecommendation,
}

/// Scoring weights
///
/// Keyed `weight_*` on the wire, flat alongside the other pairing settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    #[serde(rename = "weight_service_style")]
    pub service_style: f64,
    #[serde(rename = "weight_travel_time")]
    pub travel_time: f64,
    #[serde(rename = "weight_cuisine_diet")]
    pub cuisine_diet: f64,
    #[serde(rename = "weight_availability")]
    pub availability: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            service_style: 0.35,
            travel_time: 0.25,
            cuisine_diet: 0.20,
            availability: 0.20,
        }
    }
}

/// Tunables for window computation and scoring
///
/// Every field has a default, so any subset may be supplied when deserializing.
/// `travel_time_caps`, `exit_buffer_big_venue` and `meal_duration_nice` are
/// carried for forward compatibility and do not affect current scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    pub travel_time_caps: BTreeMap<String, u32>,
    pub pre_buffer_minutes: u32,
    pub pre_buffer_with_kids: u32,
    pub exit_buffer_minutes: u32,
    pub exit_buffer_big_venue: u32,
    pub meal_duration_casual: u32,
    pub meal_duration_nice: u32,
    #[serde(flatten)]
    pub weights: ScoringWeights,
    pub require_family_style_for_family_events: bool,
    pub default_travel_speed_mph: f64,
}

impl PairingConfig {
    /// Pre-arrival buffer, larger when children come along
    pub fn pre_buffer_for(&self, has_kids: bool) -> u32 {
        if has_kids {
            self.pre_buffer_with_kids
        } else {
            self.pre_buffer_minutes
        }
    }

    /// Layer a partial JSON object over this config
    ///
    /// Nested objects (`travel_time_caps`) merge key by key, so an
    /// override only replaces the fields it names.
    pub fn with_overrides(&self, overrides: &serde_json::Value) -> Result<Self, serde_json::Error> {
        if overrides.is_null() {
            return Ok(self.clone());
        }

        let mut merged = serde_json::to_value(self)?;
        merge_json(&mut merged, overrides);
        serde_json::from_value(merged)
    }
}

fn merge_json(base: &mut serde_json::Value, patch: &serde_json::Value) {
    use serde_json::Value;

    match (base, patch) {
        (&mut Value::Object(ref mut base), &Value::Object(ref patch)) => {
            for (key, value) in patch {
                merge_json(base.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        let travel_time_caps = [
            ("FAMILY_STYLE_GATHERING", 15),
            ("BEFORE_EVENT_TIMED", 20),
            ("AFTER_EVENT", 25),
            ("MEAL_IS_EVENT", 35),
            ("DEFAULT", 25),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            travel_time_caps,
            pre_buffer_minutes: 10,
            pre_buffer_with_kids: 15,
            exit_buffer_minutes: 15,
            exit_buffer_big_venue: 20,
            meal_duration_casual: 90,
            meal_duration_nice: 105,
            weights: ScoringWeights::default(),
            require_family_style_for_family_events: true,
            default_travel_speed_mph: 25.0,
        }
    }
}
