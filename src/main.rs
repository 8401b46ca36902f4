use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tayib_geo::config::Settings;
use tayib_geo::core::{FilterSession, RadiusFilter};
use tayib_geo::routes::{self, AppState};
use tayib_geo::services::{CandidateCache, FileStore, KeyValueStore, MemoryStore, RestaurantApiClient};
use tokio::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Tayib geo service...");

    let client = RestaurantApiClient::new(
        settings.api.base_url.clone(),
        Duration::from_secs(settings.api.timeout_secs),
    )
    .map_err(|e| {
        error!("Failed to create restaurant API client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Restaurant API client initialized ({})", settings.api.base_url);

    let candidates = Arc::new(CandidateCache::new(
        client,
        settings.cache.ttl_secs,
        settings.cache.capacity,
    ));

    info!("Candidate cache initialized (TTL: {}s)", settings.cache.ttl_secs);

    let bounds = settings.filter.bounds();
    let filter = RadiusFilter::new(bounds);

    info!(
        "Radius filter initialized: {}-{} km, default {} km, step {} km",
        bounds.min_km(),
        bounds.max_km(),
        bounds.default_km(),
        bounds.step_km()
    );

    let store: Box<dyn KeyValueStore + Send> = match &settings.session.store_path {
        Some(path) => match FileStore::open(path) {
            Ok(store) => {
                info!("Session store opened at {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                error!("Failed to open session store at {} ({}), keeping the session in memory", path, e);
                Box::new(MemoryStore::new())
            }
        },
        None => Box::new(MemoryStore::new()),
    };

    let session = FilterSession::new(filter.clone(), store);
    info!("Map session restored in phase {}", session.phase());

    let app_state = AppState {
        candidates,
        filter,
        session: Arc::new(Mutex::new(session)),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
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
