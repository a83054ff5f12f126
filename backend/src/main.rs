//! Microgreens Grow Tracker - Backend Server
//!
//! Tracks sown trays of microgreens from planting through dome and light
//! stages to harvest, with calendar, reporting and variety planning.

use axum::{routing::get, Router};
use shared::{Harvest, Planting, VarietyCatalog};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod clock;
mod config;
mod error;
mod handlers;
mod repository;
mod routes;
mod seed;
mod services;

pub use config::Config;

use clock::{Clock, SystemClock};
use repository::{InMemoryRepository, Repository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub plantings: Arc<dyn Repository<Planting>>,
    pub harvests: Arc<dyn Repository<Harvest>>,
    pub catalog: Arc<VarietyCatalog>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Empty in-memory stores with the built-in variety catalog
    pub fn in_memory(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            plantings: Arc::new(InMemoryRepository::<Planting>::new()),
            harvests: Arc::new(InMemoryRepository::<Harvest>::new()),
            catalog: Arc::new(VarietyCatalog::default()),
            clock,
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mg_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Microgreens Grow Tracker");
    tracing::info!("Environment: {}", config.environment);

    let offset = config
        .farm
        .offset()
        .map_err(|e| error::AppError::Configuration(e.to_string()))?;
    tracing::info!("Farm '{}' at UTC{}", config.farm.name, offset);

    // Create application state
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(offset));
    let state = AppState::in_memory(config.clone(), clock);

    if config.seed.demo_data {
        let today = state.clock.today();
        seed::load_demo_data(&state, today)?;
        tracing::info!("Demo plantings loaded around {}", today);
    }

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Microgreens Grow Tracker API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
