use crate::models::{Event, FitResult, PairingConfig, Restaurant, ScoreBreakdown};

pub const FAMILY_STYLE: &str = "family_style";
pub const SHARE_PLATES: &str = "share_plates";

pub const LARGE_TABLES: &str = "large_tables";
pub const KIDS_MENU: &str = "kids_menu";
pub const NOISE_TOLERANT: &str = "noise_tolerant";
pub const PRIVATE_ROOM: &str = "private_room";

pub const NOT_FAMILY_STYLE_REASON: &str = "Not family-style or share-plates";

/// Party size at which a private room earns a bonus
const PRIVATE_ROOM_PARTY_SIZE: u32 = 8;

/// Cuisine affinities by event keyword, checked in order; first match wins
const CUISINE_AFFINITIES: &[CuisineAffinity] = &[
    CuisineAffinity {
        event_keywords: &["music", "show"],
        cuisines: &["italian", "mediterranean", "american", "sushi"],
        score: 80.0,
        reason: "Great for pre-show dining",
    },
    CuisineAffinity {
        event_keywords: &["family"],
        cuisines: &["italian", "american", "mexican", "pizza"],
        score: 85.0,
        reason: "Family-friendly cuisine",
    },
    CuisineAffinity {
        event_keywords: &["sports"],
        cuisines: &["american", "bbq", "pizza", "mexican"],
        score: 80.0,
        reason: "Perfect sports dining",
    },
];

const CUISINE_BASELINE: f64 = 50.0;

/// Highest travel score past 25 minutes
const FAR_TRAVEL_CEILING: f64 = 50.0;

struct CuisineAffinity {
    event_keywords: &'static [&'static str],
    cuisines: &'static [&'static str],
    score: f64,
    reason: &'static str,
}

/// Score how well a restaurant fits an event before availability is known
///
/// Scoring formula:
/// score = (
///     service_style * 0.35 +      # Family-style fit plus group signals
///     travel_time * 0.25 +        # Closer = higher
///     cuisine_diet * 0.20 +       # Cuisine suits the event type
///     availability_fit * 0.20     # Always 0 here, filled in by Phase B
/// )
///
/// Restaurants that are not family-style for an event that needs it are
/// excluded outright unless the hard filter is switched off in `config`.
pub fn score_restaurant_fit(
    event: &Event,
    restaurant: &Restaurant,
    travel_time_minutes: u32,
    config: &PairingConfig,
) -> FitResult {
    let mut breakdown = ScoreBreakdown::default();
    let mut reasons = Vec::new();

    let requires_family_style = event.requires_family_style();
    let offers_family_style =
        restaurant.has_service_style(FAMILY_STYLE) || restaurant.has_service_style(SHARE_PLATES);

    if requires_family_style && !offers_family_style {
        if config.require_family_style_for_family_events {
            return FitResult {
                total_score: 0.0,
                breakdown,
                reasons: vec![NOT_FAMILY_STYLE_REASON.to_string()],
                excluded: true,
            };
        }

        breakdown.service_style = 10.0;
        reasons.push("Not family-style dining".to_string());
    } else {
        breakdown.service_style = calculate_service_style_score(
            event,
            restaurant,
            requires_family_style,
            offers_family_style,
            &mut reasons,
        );
    }

    breakdown.travel_time = calculate_travel_time_score(travel_time_minutes, &mut reasons);
    breakdown.cuisine_diet = calculate_cuisine_score(event, restaurant, &mut reasons);
    breakdown.availability_fit = 0.0;

    FitResult {
        total_score: breakdown.weighted_total(&config.weights),
        breakdown,
        reasons,
        excluded: false,
    }
}

/// Service style (0-100): family-style base plus group-signal bonuses
fn calculate_service_style_score(
    event: &Event,
    restaurant: &Restaurant,
    requires_family_style: bool,
    offers_family_style: bool,
    reasons: &mut Vec<String>,
) -> f64 {
    let base = if offers_family_style && requires_family_style {
        reasons.push("Family-style dining".to_string());
        90.0
    } else if offers_family_style {
        reasons.push("Share plates available".to_string());
        70.0
    } else {
        50.0
    };

    let mut bonus: f64 = 0.0;
    if restaurant.has_group_signal(LARGE_TABLES) {
        bonus += 5.0;
        reasons.push("Large tables available".to_string());
    }
    if restaurant.has_group_signal(KIDS_MENU) && event.has_kids {
        bonus += 5.0;
        reasons.push("Kids menu available".to_string());
    }
    if restaurant.has_group_signal(NOISE_TOLERANT) {
        bonus += 3.0;
    }
    if restaurant.has_group_signal(PRIVATE_ROOM) && event.party_size >= PRIVATE_ROOM_PARTY_SIZE {
        bonus += 7.0;
        reasons.push("Private room available".to_string());
    }

    (base + bonus).min(100.0)
}

/// Travel time score (0-100)
///
/// Stepped up to 25 minutes. Beyond that it decays by 3 points per extra
/// minute from 100, capped at the 25-minute tier so a longer trip never
/// outscores a shorter one.
pub fn calculate_travel_time_score(travel_time_minutes: u32, reasons: &mut Vec<String>) -> f64 {
    let minutes = travel_time_minutes;
    let (score, reason) = match minutes {
        0..=10 => (100.0, Some(format!("{minutes} min away - very close"))),
        11..=15 => (85.0, Some(format!("{minutes} min away"))),
        16..=20 => (70.0, Some(format!("{minutes} min drive"))),
        21..=25 => (50.0, Some(format!("{minutes} min away"))),
        _ => {
            let score = (100.0 - f64::from(minutes - 25) * 3.0).clamp(0.0, FAR_TRAVEL_CEILING);
            let reason = (score > 0.0).then(|| format!("{minutes} min drive - far"));
            (score, reason)
        }
    };

    reasons.extend(reason);
    score
}

/// Cuisine score (0-100) from keyword affinities between event type and cuisine tags
fn calculate_cuisine_score(event: &Event, restaurant: &Restaurant, reasons: &mut Vec<String>) -> f64 {
    let cuisines: Vec<String> = restaurant.cuisine_tags.iter().map(|c| c.to_lowercase()).collect();

    let Some(affinity) = CUISINE_AFFINITIES
        .iter()
        .find(|a| a.event_keywords.iter().any(|kw| event.type_mentions(kw)))
    else {
        return CUISINE_BASELINE;
    };

    let matches = cuisines
        .iter()
        .any(|cuisine| affinity.cuisines.iter().any(|kw| cuisine.contains(kw)));

    if matches {
        reasons.push(affinity.reason.to_string());
        affinity.score
    } else {
        CUISINE_BASELINE
    }
}
