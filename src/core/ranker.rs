use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, info};

use crate::core::{
    availability::apply_availability,
    distance::approximate_travel_minutes,
    scoring::score_restaurant_fit,
    windows::compute_dining_windows,
};
use crate::models::{
    AvailabilityPayload, Event, PairingConfig, PairingRecommendation, Restaurant, TopPairing,
};

/// Travel time assumed when neither a supplied time nor both coordinates are available
pub const DEFAULT_TRAVEL_TIME_MINUTES: u32 = 20;

/// Result of ranking one event
#[derive(Debug)]
pub struct RankingResult {
    pub recommendations: Vec<PairingRecommendation>,
    pub total_candidates: usize,
    pub excluded_count: usize,
}

/// Ranking orchestrator - runs the pairing pipeline for one event at a time
///
/// # Pipeline Stages
/// 1. Travel time (supplied map, haversine approximation, or static default)
/// 2. Dining windows
/// 3. Fit scoring and hard-filter exclusion
/// 4. Sorting
/// 5. Availability re-rank, when payloads are supplied
///
/// Holds nothing but configuration, so one `Ranker` can serve any number of
/// events concurrently.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: PairingConfig,
}

impl Ranker {
    pub fn new(config: PairingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PairingConfig {
        &self.config
    }

    /// Rank restaurants for an event
    ///
    /// # Arguments
    /// * `event` - The event being planned around
    /// * `restaurants` - Candidate restaurants
    /// * `travel_times` - Optional restaurant id to travel minutes
    /// * `availability` - Optional live availability; non-empty triggers Phase B
    ///
    /// # Returns
    /// RankingResult with recommendations sorted best first
    pub fn rank(
        &self,
        event: &Event,
        restaurants: &[Restaurant],
        travel_times: Option<&HashMap<String, u32>>,
        availability: Option<&[AvailabilityPayload]>,
    ) -> RankingResult {
        let total_candidates = restaurants.len();

        let mut recommendations: Vec<PairingRecommendation> = restaurants
            .iter()
            .filter_map(|restaurant| {
                let travel_time = self.resolve_travel_time(event, restaurant, travel_times);
                let windows = compute_dining_windows(event, travel_time, &self.config);
                let fit = score_restaurant_fit(event, restaurant, travel_time, &self.config);

                if fit.excluded {
                    debug!("Excluding {} for event {}: {:?}", restaurant.id, event.id, fit.reasons);
                    return None;
                }

                Some(PairingRecommendation {
                    restaurant_id: restaurant.id.clone(),
                    score: fit.total_score,
                    score_breakdown: fit.breakdown,
                    recommended_windows: windows.windows,
                    target_time: windows.target_time,
                    availability_pending: true,
                    recommended_available_times: None,
                    why_matched: fit.reasons,
                })
            })
            .collect();

        let excluded_count = total_candidates - recommendations.len();

        sort_recommendations(&mut recommendations);

        if let Some(payloads) = availability.filter(|p| !p.is_empty()) {
            apply_availability(&mut recommendations, payloads, event, &self.config);
        }

        info!(
            "Ranked {} restaurants for event {} ({} excluded)",
            recommendations.len(),
            event.id,
            excluded_count
        );

        RankingResult {
            recommendations,
            total_candidates,
            excluded_count,
        }
    }

    /// Rank each event independently and keep its single best recommendation
    ///
    /// Events with no eligible restaurant are left out.
    pub fn top_pairings(
        &self,
        events: &[Event],
        restaurants: &[Restaurant],
        travel_times: Option<&HashMap<String, u32>>,
        availability: Option<&[AvailabilityPayload]>,
    ) -> Vec<TopPairing> {
        let names: HashMap<&str, &str> = restaurants
            .iter()
            .map(|r| (r.id.as_str(), r.name.as_str()))
            .collect();

        events
            .iter()
            .filter_map(|event| {
                let result = self.rank(event, restaurants, travel_times, availability);
                let top = result.recommendations.into_iter().next()?;
                let restaurant_name = names
                    .get(top.restaurant_id.as_str())
                    .map(|name| name.to_string())
                    .unwrap_or_default();

                Some(TopPairing {
                    event_id: event.id.clone(),
                    restaurant_name,
                    match_reason: top.why_matched.join("; "),
                    recommendation: top,
                })
            })
            .collect()
    }

    fn resolve_travel_time(
        &self,
        event: &Event,
        restaurant: &Restaurant,
        travel_times: Option<&HashMap<String, u32>>,
    ) -> u32 {
        if let Some(&minutes) = travel_times.and_then(|map| map.get(&restaurant.id)) {
            return minutes;
        }

        match (&event.location, &restaurant.location) {
            (Some(from), Some(to)) => {
                approximate_travel_minutes(from, to, self.config.default_travel_speed_mph)
                    .unwrap_or(DEFAULT_TRAVEL_TIME_MINUTES)
            }
            _ => DEFAULT_TRAVEL_TIME_MINUTES,
        }
    }
}

/// Rank restaurants for an event using `config`, or the defaults when `None`
pub fn rank_restaurants_for_event(
    event: &Event,
    restaurants: &[Restaurant],
    travel_times: Option<&HashMap<String, u32>>,
    config: Option<&PairingConfig>,
    availability: Option<&[AvailabilityPayload]>,
) -> Vec<PairingRecommendation> {
    let ranker = Ranker::new(config.cloned().unwrap_or_default());
    ranker.rank(event, restaurants, travel_times, availability).recommendations
}

/// Sort by score (descending), then travel-time score (descending, closer wins),
/// then restaurant id (ascending)
pub fn sort_recommendations(recommendations: &mut [PairingRecommendation]) {
    recommendations.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.score_breakdown
                    .travel_time
                    .partial_cmp(&a.score_breakdown.travel_time)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.restaurant_id.cmp(&b.restaurant_id))
    });
}
