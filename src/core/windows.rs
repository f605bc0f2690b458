use chrono::{DateTime, Duration, FixedOffset};

use crate::core::clock::{ceil_to_five_minutes, floor_to_five_minutes, ClockTime};
use crate::models::{DiningWindows, Event, FallbackWindow, MealIntent, PairingConfig, RecommendedWindows, TimeWindow};

pub const EARLIER_SEATING: &str = "Earlier seating";
pub const LATER_SEATING: &str = "Later seating";

/// Preferred window spans this far either side of the target (before an event)
const PREFERRED_HALF_SPAN_MINUTES: i64 = 30;
/// Width of windows that start at a computed seat time
const WINDOW_SPAN_MINUTES: i64 = 60;
const EARLIER_SHIFT_MINUTES: i64 = 60;
const LATER_SHIFT_MINUTES: i64 = 45;
/// Gap kept between a clamped later seating's meal and the latest finish
const LATER_CLAMP_MARGIN_MINUTES: i64 = 15;
const AFTER_EARLIER_SHIFT_MINUTES: i64 = 30;

/// Fixed dinner windows used when the meal is the event
struct FixedWindows {
    target: ClockTime,
    preferred: TimeWindow,
    later: TimeWindow,
    earlier: TimeWindow,
}

const WITH_KIDS: FixedWindows = FixedWindows {
    target: ClockTime::hm(17, 30),
    preferred: TimeWindow { start_time: ClockTime::hm(17, 0), end_time: ClockTime::hm(18, 30) },
    later: TimeWindow { start_time: ClockTime::hm(18, 30), end_time: ClockTime::hm(20, 0) },
    earlier: TimeWindow { start_time: ClockTime::hm(16, 0), end_time: ClockTime::hm(17, 0) },
};

const ADULTS_ONLY: FixedWindows = FixedWindows {
    target: ClockTime::hm(18, 30),
    preferred: TimeWindow { start_time: ClockTime::hm(18, 0), end_time: ClockTime::hm(19, 30) },
    later: TimeWindow { start_time: ClockTime::hm(19, 30), end_time: ClockTime::hm(20, 30) },
    earlier: TimeWindow { start_time: ClockTime::hm(17, 0), end_time: ClockTime::hm(18, 0) },
};

#[inline]
fn minutes(value: u32) -> Duration {
    Duration::minutes(i64::from(value))
}

fn window(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> TimeWindow {
    TimeWindow::new(ClockTime::from_datetime(&start), ClockTime::from_datetime(&end))
}

/// Compute the target seat time plus preferred and fallback windows
///
/// All times are local to the event's start offset.
///
/// * `BEFORE_EVENT` works back from the event start, rounding down so the party
///   is never late.
/// * `AFTER_EVENT` works forward from the event end, rounding up so the party is
///   never seated before it can arrive.
/// * `MEAL_IS_EVENT` uses fixed dinner windows, earlier when kids come along.
pub fn compute_dining_windows(
    event: &Event,
    travel_time_minutes: u32,
    config: &PairingConfig,
) -> DiningWindows {
    match event.meal_intent {
        MealIntent::BeforeEvent => before_event_windows(event, travel_time_minutes, config),
        MealIntent::AfterEvent => after_event_windows(event, travel_time_minutes, config),
        MealIntent::MealIsEvent => meal_is_event_windows(event.has_kids),
    }
}

fn before_event_windows(event: &Event, travel_time_minutes: u32, config: &PairingConfig) -> DiningWindows {
    let pre_buffer = minutes(config.pre_buffer_for(event.has_kids));
    let meal_duration = minutes(config.meal_duration_casual);

    let latest_finish = event.start_at - minutes(travel_time_minutes) - pre_buffer;
    let target_seat = floor_to_five_minutes(latest_finish - meal_duration);

    let half_span = Duration::minutes(PREFERRED_HALF_SPAN_MINUTES);
    let preferred_start = target_seat - half_span;
    let preferred_end = target_seat + half_span;

    let earlier_shift = Duration::minutes(EARLIER_SHIFT_MINUTES);
    let earlier = window(preferred_start - earlier_shift, preferred_end - earlier_shift);

    let later_shift = Duration::minutes(LATER_SHIFT_MINUTES);
    let mut later_start = preferred_start + later_shift;
    let mut later_end = preferred_end + later_shift;
    if later_end + meal_duration > latest_finish {
        later_end = floor_to_five_minutes(
            latest_finish - meal_duration - Duration::minutes(LATER_CLAMP_MARGIN_MINUTES),
        );
        later_start = later_end - Duration::minutes(WINDOW_SPAN_MINUTES);
    }

    DiningWindows {
        target_time: ClockTime::from_datetime(&target_seat),
        windows: RecommendedWindows {
            preferred: window(preferred_start, preferred_end),
            fallbacks: vec![
                FallbackWindow::new(EARLIER_SEATING, earlier),
                FallbackWindow::new(LATER_SEATING, window(later_start, later_end)),
            ],
        },
    }
}

fn after_event_windows(event: &Event, travel_time_minutes: u32, config: &PairingConfig) -> DiningWindows {
    let pre_buffer = minutes(config.pre_buffer_for(event.has_kids));
    let event_end = event.resolved_end();

    let earliest_seat = ceil_to_five_minutes(
        event_end + minutes(config.exit_buffer_minutes) + minutes(travel_time_minutes) + pre_buffer,
    );

    let span = Duration::minutes(WINDOW_SPAN_MINUTES);
    let preferred = window(earliest_seat, earliest_seat + span);
    let later = window(earliest_seat + span, earliest_seat + span + span);

    // Never earlier than the buffered event end
    let earlier_start = std::cmp::max(
        earliest_seat - Duration::minutes(AFTER_EARLIER_SHIFT_MINUTES),
        ceil_to_five_minutes(event_end + pre_buffer),
    );
    let earlier = window(earlier_start, earlier_start + span);

    DiningWindows {
        target_time: ClockTime::from_datetime(&earliest_seat),
        windows: RecommendedWindows {
            preferred,
            fallbacks: vec![
                FallbackWindow::new(LATER_SEATING, later),
                FallbackWindow::new(EARLIER_SEATING, earlier),
            ],
        },
    }
}

fn meal_is_event_windows(has_kids: bool) -> DiningWindows {
    let fixed = if has_kids { &WITH_KIDS } else { &ADULTS_ONLY };

    DiningWindows {
        target_time: fixed.target,
        windows: RecommendedWindows {
            preferred: fixed.preferred,
            fallbacks: vec![
                FallbackWindow::new(LATER_SEATING, fixed.later),
                FallbackWindow::new(EARLIER_SEATING, fixed.earlier),
            ],
        },
    }
}
