// Integration tests for Happenstance pairing

use actix_web::{http::StatusCode, test as actix_test, web, App};
use happenstance_pairing::core::{apply_availability, ClockTime, Ranker};
use happenstance_pairing::models::{
    AvailabilityPayload, AvailabilityResponse, ErrorResponse, Event, Location, PairingConfig, PairingRecommendation,
    RankResponse, Restaurant, TopPairingsResponse,
};
use happenstance_pairing::routes::{configure_routes, pairings::AppState};
use serde_json::json;
use std::collections::HashMap;

fn family_gathering() -> Event {
    serde_json::from_value(json!({
        "id": "family-dinner-1",
        "type": "FAMILY_STYLE_GATHERING",
        "startAt": "2024-06-15T18:00:00-07:00",
        "mealIntent": "MEAL_IS_EVENT",
        "partySize": 8,
        "hasKids": true,
        "location": {"lat": 37.7749, "lng": -122.4194}
    }))
    .unwrap()
}

fn family_restaurants() -> Vec<Restaurant> {
    serde_json::from_value(json!([
        {
            "id": "italian-family-rest",
            "name": "Bella Famiglia",
            "location": {"lat": 37.7750, "lng": -122.4195},
            "cuisineTags": ["Italian"],
            "serviceStyleTags": ["family_style"],
            "groupSignals": ["large_tables", "kids_menu", "noise_tolerant"]
        },
        {
            "id": "tapas-share-rest",
            "name": "Barcelona Tapas",
            "location": {"lat": 37.7751, "lng": -122.4196},
            "cuisineTags": ["Spanish"],
            "serviceStyleTags": ["share_plates"],
            "groupSignals": ["large_tables", "noise_tolerant"]
        },
        {
            "id": "fancy-french",
            "name": "Le Petit Paris",
            "location": {"lat": 37.7752, "lng": -122.4197},
            "cuisineTags": ["French"],
            "serviceStyleTags": ["fine_dining"],
            "groupSignals": []
        }
    ]))
    .unwrap()
}

fn family_travel_times() -> HashMap<String, u32> {
    HashMap::from([
        ("italian-family-rest".to_string(), 8),
        ("tapas-share-rest".to_string(), 12),
        ("fancy-french".to_string(), 10),
    ])
}

fn pre_show() -> Event {
    serde_json::from_value(json!({
        "id": "theater-show-1",
        "type": "SHOW",
        "startAt": "2024-06-15T19:00:00-07:00",
        "mealIntent": "BEFORE_EVENT",
        "partySize": 2,
        "hasKids": false,
        "location": {"lat": 37.7749, "lng": -122.4194}
    }))
    .unwrap()
}

fn pre_show_restaurants() -> Vec<Restaurant> {
    serde_json::from_value(json!([
        {
            "id": "italian-near",
            "name": "Teatro Italiano",
            "location": {"lat": 37.7750, "lng": -122.4195},
            "cuisineTags": ["Italian"],
            "serviceStyleTags": ["casual"]
        },
        {
            "id": "sushi-far",
            "name": "Sushi Master",
            "location": {"lat": 37.7800, "lng": -122.4300},
            "cuisineTags": ["Sushi"],
            "serviceStyleTags": ["casual"]
        }
    ]))
    .unwrap()
}

fn payload(restaurant_id: &str, party_size: u32, times: &[&str]) -> AvailabilityPayload {
    AvailabilityPayload {
        restaurant_id: restaurant_id.to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        party_size,
        available_times: times.iter().map(|s| s.parse().unwrap()).collect(),
    }
}

fn times(recommendation: &PairingRecommendation) -> Vec<String> {
    recommendation
        .recommended_available_times
        .as_ref()
        .map(|ts| ts.iter().map(ClockTime::to_string).collect())
        .unwrap_or_default()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
}

#[test]
fn test_integration_family_gathering_phases() {
    let ranker = Ranker::default();
    let event = family_gathering();
    let restaurants = family_restaurants();
    let travel_times = family_travel_times();

    // Phase A: fine dining is excluded for a party of eight with kids
    let phase_a = ranker.rank(&event, &restaurants, Some(&travel_times), None);

    assert_eq!(phase_a.total_candidates, 3);
    assert_eq!(phase_a.excluded_count, 1);
    let ids: Vec<&str> = phase_a.recommendations.iter().map(|r| r.restaurant_id.as_str()).collect();
    assert_eq!(ids, vec!["italian-family-rest", "tapas-share-rest"]);

    let italian = &phase_a.recommendations[0];
    assert_close(italian.score, 77.0);
    assert_eq!(italian.score_breakdown.service_style, 100.0);
    assert_eq!(italian.target_time.to_string(), "17:30");
    assert_eq!(italian.recommended_windows.preferred.start_time.to_string(), "17:00");
    assert_eq!(italian.recommended_windows.preferred.end_time.to_string(), "18:30");
    assert!(italian.why_matched.contains(&"Family-friendly cuisine".to_string()));
    assert!(italian.availability_pending);

    assert_close(phase_a.recommendations[1].score, 65.55);

    // Phase B
    let availability = vec![
        payload("italian-family-rest", 8, &["17:30", "17:45", "18:00"]),
        payload("tapas-share-rest", 8, &["19:30", "20:00"]),
    ];
    let phase_b = ranker.rank(&event, &restaurants, Some(&travel_times), Some(&availability));

    let italian = &phase_b.recommendations[0];
    assert_eq!(italian.restaurant_id, "italian-family-rest");
    assert_eq!(italian.score_breakdown.availability_fit, 100.0);
    assert_close(italian.score, 97.0);
    assert_eq!(times(italian), vec!["17:30", "17:45", "18:00"]);

    // Only the later seating fits the tapas bar
    let tapas = &phase_b.recommendations[1];
    assert_eq!(tapas.score_breakdown.availability_fit, 66.0);
    assert_close(tapas.score, 78.75);
    assert_eq!(times(tapas), vec!["19:30", "20:00"]);
    assert!(!tapas.availability_pending);
}

#[test]
fn test_integration_pre_show_dinner() {
    let ranker = Ranker::default();
    let event = pre_show();
    let restaurants = pre_show_restaurants();
    let travel_times = HashMap::from([("italian-near".to_string(), 5), ("sushi-far".to_string(), 25)]);

    let phase_a = ranker.rank(&event, &restaurants, Some(&travel_times), None);
    assert_eq!(phase_a.excluded_count, 0);

    let italian = &phase_a.recommendations[0];
    assert_eq!(italian.restaurant_id, "italian-near");
    assert_close(italian.score, 58.5);
    assert_eq!(italian.target_time.to_string(), "17:15");
    assert_eq!(italian.recommended_windows.preferred.start_time.to_string(), "16:45");
    assert_eq!(italian.recommended_windows.preferred.end_time.to_string(), "17:45");

    let later = &italian.recommended_windows.fallbacks[1];
    assert_eq!(later.label, "Later seating");
    assert_eq!(later.window.start_time.to_string(), "16:00");
    assert_eq!(later.window.end_time.to_string(), "17:00");

    let sushi = &phase_a.recommendations[1];
    assert_close(sushi.score, 46.0);
    assert_eq!(sushi.target_time.to_string(), "16:55");

    let availability = vec![
        payload("italian-near", 2, &["17:00", "17:15", "17:30"]),
        payload("sushi-far", 2, &["16:00", "16:15", "16:30"]),
    ];
    let phase_b = ranker.rank(&event, &restaurants, Some(&travel_times), Some(&availability));

    let italian = &phase_b.recommendations[0];
    assert_close(italian.score, 78.5);
    // Equidistant times keep their supplied order
    assert_eq!(times(italian), vec!["17:15", "17:00", "17:30"]);

    let sushi = &phase_b.recommendations[1];
    assert_eq!(sushi.score_breakdown.availability_fit, 100.0);
    assert_eq!(times(sushi), vec!["16:30"]);
}

#[test]
fn test_integration_split_phases_match_single_call() {
    let ranker = Ranker::default();
    let event = family_gathering();
    let restaurants = family_restaurants();
    let travel_times = family_travel_times();
    let availability = vec![payload("tapas-share-rest", 8, &["17:15"])];

    let combined = ranker.rank(&event, &restaurants, Some(&travel_times), Some(&availability));

    let mut split = ranker.rank(&event, &restaurants, Some(&travel_times), None).recommendations;
    apply_availability(&mut split, &availability, &event, ranker.config());

    assert_eq!(split, combined.recommendations);
    assert_eq!(split[0].restaurant_id, "tapas-share-rest");
    assert!(split[1].availability_pending);
}

#[test]
fn test_integration_score_range() {
    let ranker = Ranker::default();
    let event = pre_show();

    let restaurants: Vec<Restaurant> = (0..50)
        .map(|i| Restaurant {
            id: format!("r{:02}", i),
            name: format!("Restaurant {}", i),
            location: Some(Location {
                lat: 37.7749 + (i as f64 * 0.002),
                lng: -122.4194,
            }),
            address: None,
            cuisine_tags: vec!["Italian".to_string()],
            service_style_tags: vec![],
            group_signals: vec!["large_tables".to_string(), "private_room".to_string()],
            price_tier: None,
            hours: None,
        })
        .collect();

    let result = ranker.rank(&event, &restaurants, None, None);
    assert_eq!(result.recommendations.len(), 50);

    for r in &result.recommendations {
        assert!(r.score >= 0.0 && r.score <= 100.0, "Score {} out of range", r.score);
    }
    for i in 1..result.recommendations.len() {
        assert!(
            result.recommendations[i - 1].score >= result.recommendations[i].score,
            "Recommendations not sorted by score"
        );
    }
}

#[test]
fn test_integration_event_json_round_trip() {
    let event = family_gathering();

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "FAMILY_STYLE_GATHERING");
    assert_eq!(value["mealIntent"], "MEAL_IS_EVENT");
    assert_eq!(value["partySize"], 8);

    let back: Event = serde_json::from_value(value).unwrap();
    assert_eq!(back.start_at, event.start_at);
    assert_eq!(back.meal_intent, event.meal_intent);
}

fn app_state(config: PairingConfig) -> web::Data<AppState> {
    web::Data::new(AppState::new(config))
}

#[actix_web::test]
async fn test_http_rank_endpoint() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(PairingConfig::default()))
            .configure(configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/pairings/rank")
        .set_json(json!({
            "event": family_gathering(),
            "restaurants": family_restaurants(),
            "travelTimes": family_travel_times(),
        }))
        .to_request();

    let body: RankResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.event_id, "family-dinner-1");
    assert!(uuid::Uuid::parse_str(&body.ranking_id).is_ok());
    assert_eq!(body.total_candidates, 3);
    assert_eq!(body.excluded_count, 1);
    assert_eq!(body.recommendations[0].restaurant_id, "italian-family-rest");
    assert!(body.recommendations.iter().all(|r| r.availability_pending));
}

#[actix_web::test]
async fn test_http_rank_with_config_override() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(PairingConfig::default()))
            .configure(configure_routes),
    )
    .await;

    // Soft penalty instead of exclusion
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/pairings/rank")
        .set_json(json!({
            "event": family_gathering(),
            "restaurants": family_restaurants(),
            "travelTimes": family_travel_times(),
            "config": {"require_family_style_for_family_events": false},
        }))
        .to_request();

    let body: RankResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.excluded_count, 0);
    let french = body
        .recommendations
        .iter()
        .find(|r| r.restaurant_id == "fancy-french")
        .unwrap();
    assert_eq!(french.score_breakdown.service_style, 10.0);
    assert_eq!(body.recommendations.last().unwrap().restaurant_id, "fancy-french");
}

#[actix_web::test]
async fn test_http_availability_endpoint() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(PairingConfig::default()))
            .configure(configure_routes),
    )
    .await;

    let event = pre_show();
    let travel_times = HashMap::from([("italian-near".to_string(), 5), ("sushi-far".to_string(), 25)]);
    let phase_a = Ranker::default()
        .rank(&event, &pre_show_restaurants(), Some(&travel_times), None)
        .recommendations;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/pairings/availability")
        .set_json(json!({
            "event": event,
            "recommendations": phase_a,
            "availability": [
                {"restaurantId": "sushi-far", "date": "2024-06-15", "partySize": 2, "availableTimes": ["16:55"]}
            ],
        }))
        .to_request();

    let body: AvailabilityResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.event_id, "theater-show-1");
    assert_eq!(body.recommendations[0].restaurant_id, "sushi-far");
    assert_close(body.recommendations[0].score, 66.0);
    assert!(body.recommendations[1].availability_pending);
}

#[actix_web::test]
async fn test_http_top_pairings_endpoint() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(PairingConfig::default()))
            .configure(configure_routes),
    )
    .await;

    let mut restaurants = family_restaurants();
    restaurants.extend(pre_show_restaurants());

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/pairings/top")
        .set_json(json!({
            "events": [family_gathering(), pre_show()],
            "restaurants": restaurants,
        }))
        .to_request();

    let body: TopPairingsResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.total_events, 2);
    assert_eq!(body.pairings.len(), 2);
    assert_eq!(body.pairings[0].event_id, "family-dinner-1");
    assert_eq!(body.pairings[0].restaurant_name, "Bella Famiglia");
    assert_eq!(body.pairings[1].event_id, "theater-show-1");
    assert!(!body.pairings[1].match_reason.is_empty());
}

#[actix_web::test]
async fn test_http_top_pairings_rejects_empty_batch() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(PairingConfig::default()))
            .configure(configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/pairings/top")
        .set_json(json!({"events": [], "restaurants": []}))
        .to_request();

    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = actix_test::read_body_json(resp).await;
    assert_eq!(body.status_code, 400);
}

#[actix_web::test]
async fn test_http_health_under_api_scope() {
    let app = actix_test::init_service(App::new().configure(configure_routes)).await;

    let req = actix_test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn test_http_rank_with_flat_weight_override() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(PairingConfig::default()))
            .configure(configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/pairings/rank")
        .set_json(json!({
            "event": pre_show(),
            "restaurants": pre_show_restaurants(),
            "travelTimes": {"italian-near": 5, "sushi-far": 25},
            "config": {
                "weight_service_style": 0.0,
                "weight_travel_time": 1.0,
                "weight_cuisine_diet": 0.0,
                "weight_availability": 0.0
            },
        }))
        .to_request();

    let body: RankResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_close(body.recommendations[0].score, 100.0);
    assert_close(body.recommendations[1].score, 50.0);
}

#[actix_web::test]
async fn test_http_rank_accepts_null_meal_intent() {
    let app = actix_test::init_service(
        App::new()
            .app_data(app_state(PairingConfig::default()))
            .configure(configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/pairings/rank")
        .set_json(json!({
            "event": {
                "id": "dinner",
                "type": "MEETING",
                "startAt": "2024-06-15T12:00:00-07:00",
                "mealIntent": null,
                "partySize": 2
            },
            "restaurants": pre_show_restaurants(),
        }))
        .to_request();

    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: RankResponse = actix_test::read_body_json(resp).await;
    assert_eq!(body.recommendations[0].target_time.to_string(), "18:30");
}
