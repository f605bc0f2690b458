// Core algorithm exports
pub mod availability;
pub mod clock;
pub mod distance;
pub mod ranker;
pub mod scoring;
pub mod windows;

pub use availability::{apply_availability, classify_availability};
pub use clock::ClockTime;
pub use distance::{approximate_travel_minutes, distance_between, haversine_distance};
pub use ranker::{rank_restaurants_for_event, sort_recommendations, Ranker, RankingResult};
pub use scoring::score_restaurant_fit;
pub use windows::compute_dining_windows;
