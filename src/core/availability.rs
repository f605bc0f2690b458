use std::collections::HashMap;

use tracing::{debug, warn};

use crate::core::clock::ClockTime;
use crate::core::ranker::sort_recommendations;
use crate::models::{AvailabilityPayload, Event, PairingConfig, PairingRecommendation, RecommendedWindows};

/// Availability fit when a real time lands in the preferred window
pub const PREFERRED_WINDOW_FIT: f64 = 100.0;
/// ... in the first fallback window
pub const FIRST_FALLBACK_FIT: f64 = 66.0;
/// ... in the second fallback window
pub const SECOND_FALLBACK_FIT: f64 = 33.0;
pub const NO_WINDOW_FIT: f64 = 0.0;

const MAX_RECOMMENDED_TIMES: usize = 3;

/// Fold live availability into Phase A recommendations and re-rank (Phase B)
///
/// Recommendations with a matching payload are updated in place: availability
/// fit, recommended times, pending flag and total score are overwritten, so
/// applying the same payloads twice gives the same result. Recommendations
/// without a payload stay pending. The whole slice is re-sorted afterwards.
/// When several payloads share a restaurant id the last one wins.
pub fn apply_availability(
    recommendations: &mut [PairingRecommendation],
    availability_payloads: &[AvailabilityPayload],
    event: &Event,
    config: &PairingConfig,
) {
    let by_restaurant: HashMap<&str, &AvailabilityPayload> = availability_payloads
        .iter()
        .map(|payload| (payload.restaurant_id.as_str(), payload))
        .collect();

    let mut updated = 0usize;

    for recommendation in recommendations.iter_mut() {
        let Some(payload) = by_restaurant.get(recommendation.restaurant_id.as_str()) else {
            continue;
        };

        check_payload_matches_event(payload, event);

        let (fit, times) = classify_availability(
            &payload.available_times,
            &recommendation.recommended_windows,
            recommendation.target_time,
        );

        recommendation.score_breakdown.availability_fit = fit;
        recommendation.availability_pending = false;
        recommendation.recommended_available_times = Some(times);
        recommendation.score = recommendation.score_breakdown.weighted_total(&config.weights);
        updated += 1;

        debug!(
            "Availability for {} on event {}: fit {}, score {:.2}",
            recommendation.restaurant_id, event.id, fit, recommendation.score
        );
    }

    debug!(
        "Applied availability to {} of {} recommendations for event {}",
        updated,
        recommendations.len(),
        event.id
    );

    sort_recommendations(recommendations);
}

/// Score available times against the recommended windows
///
/// Buckets are tried in priority order (preferred, first fallback, second
/// fallback). The first non-empty bucket sets the fit level and supplies the
/// suggested times; if none match, the suggestions come from every available
/// time and the fit is 0. Suggestions are the (up to) three times closest to
/// `target`, ties kept in input order.
pub fn classify_availability(
    available_times: &[ClockTime],
    windows: &RecommendedWindows,
    target: ClockTime,
) -> (f64, Vec<ClockTime>) {
    if available_times.is_empty() {
        return (NO_WINDOW_FIT, Vec::new());
    }

    let buckets = [
        (Some(&windows.preferred), PREFERRED_WINDOW_FIT),
        (windows.fallbacks.first().map(|f| &f.window), FIRST_FALLBACK_FIT),
        (windows.fallbacks.get(1).map(|f| &f.window), SECOND_FALLBACK_FIT),
    ];

    for (window, fit) in buckets {
        let Some(window) = window else {
            continue;
        };

        let inside: Vec<ClockTime> = available_times
            .iter()
            .copied()
            .filter(|&time| window.contains(time))
            .collect();

        if !inside.is_empty() {
            return (fit, closest_to_target(&inside, target));
        }
    }

    (NO_WINDOW_FIT, closest_to_target(available_times, target))
}

/// Up to three times nearest `target`; stable, so ties keep input order
fn closest_to_target(times: &[ClockTime], target: ClockTime) -> Vec<ClockTime> {
    let mut sorted = times.to_vec();
    sorted.sort_by_key(|time| time.distance_to(target));
    sorted.truncate(MAX_RECOMMENDED_TIMES);
    sorted
}

fn check_payload_matches_event(payload: &AvailabilityPayload, event: &Event) {
    let event_date = event.start_at.date_naive();
    if payload.date != event_date {
        warn!(
            "Availability for {} is dated {} but event {} is on {}",
            payload.restaurant_id, payload.date, event.id, event_date
        );
    }
    if payload.party_size != event.party_size {
        warn!(
            "Availability for {} is for a party of {} but event {} has {}",
            payload.restaurant_id, payload.party_size, event.id, event.party_size
        );
    }
}
