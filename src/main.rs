use actix_cors::Cors;
use actix_web::{error, middleware, web, App, HttpRequest, HttpServer};
use happenstance_pairing::config::Settings;
use happenstance_pairing::models::ErrorResponse;
use happenstance_pairing::routes::{self, pairings::AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Malformed or mistyped JSON bodies get the same error shape as validation failures
fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ErrorResponse::bad_request("Invalid JSON", err.to_string()).into()
}

/// RUST_LOG wins over the configured level when set
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Happenstance pairing service...");
    info!("Pairing configured with weights: {:?}", settings.pairing.weights);

    let weight_sum = settings.pairing.weights.service_style
        + settings.pairing.weights.travel_time
        + settings.pairing.weights.cuisine_diet
        + settings.pairing.weights.availability;
    if (weight_sum - 1.0).abs() > 1e-6 {
        warn!("Scoring weights sum to {:.3}, scores may fall outside 0-100", weight_sum);
    }

    let app_state = AppState::new(settings.pairing);

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
