//! TVPSS Server - school TVPSS version and equipment tracking
//!
//! REST API server for school, district and state administrators.

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tvpss_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{storage::LocalFileStore, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("tvpss_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }

    tracing::info!("Starting TVPSS Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let store = LocalFileStore::new(&config.storage.root);
    tokio::fs::create_dir_all(store.root())
        .await
        .with_context(|| format!("Failed to create storage root {}", config.storage.root))?;

    let repository = Repository::new(pool);
    let services = Services::new(
        repository,
        config.auth.clone(),
        config.storage.clone(),
        Arc::new(store),
    );

    services
        .users
        .bootstrap_super_admin()
        .await
        .context("Failed to bootstrap super admin")?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Users
        .route("/users", get(api::users::list_users).post(api::users::create_user))
        .route(
            "/users/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        // Schools
        .route("/schools", get(api::schools::list_all_schools).post(api::schools::create_school))
        // Own school
        .route("/school/info", get(api::schools::get_my_school).put(api::schools::update_my_school))
        .route(
            "/school/version",
            get(api::versions::get_my_version).put(api::versions::submit_my_version),
        )
        .route(
            "/school/equipment",
            get(api::equipment::list_my_equipment).post(api::equipment::create_equipment),
        )
        .route("/school/stats", get(api::stats::school_stats))
        // District
        .route("/ppd/schools", get(api::schools::list_district_schools))
        .route("/ppd/schools/:code", get(api::schools::view_district_school))
        .route("/ppd/schools/:code/approve", post(api::versions::ppd_approve))
        .route("/ppd/schools/:code/reject", post(api::versions::ppd_reject))
        .route("/ppd/equipment/schools", get(api::schools::list_equipment_schools))
        .route("/ppd/equipment/schools/:school_id", get(api::schools::list_school_equipment))
        .route("/ppd/stats", get(api::stats::ppd_stats))
        // State
        .route("/state/schools", get(api::schools::list_state_schools))
        .route("/state/schools/:code", get(api::schools::view_state_school))
        .route("/state/schools/:code/approve", post(api::versions::state_approve))
        .route("/state/schools/:code/reject", post(api::versions::state_reject))
        // Equipment
        .route(
            "/equipment/:id",
            get(api::equipment::get_equipment)
                .put(api::equipment::update_equipment)
                .delete(api::equipment::delete_equipment),
        )
        .route("/equipment/:id/status", put(api::equipment::update_equipment_status))
        .route(
            "/equipment/:id/follow-ups",
            get(api::equipment::list_follow_ups).post(api::equipment::create_follow_up),
        )
        // Lookups
        .route("/status-options", get(api::lookups::status_options))
        .route("/equipment-types", get(api::lookups::equipment_types))
        .route("/equipment-locations", get(api::lookups::equipment_locations))
        // Students
        .route("/students", get(api::students::list_students).post(api::students::create_student))
        .route(
            "/students/:id",
            get(api::students::get_student)
                .put(api::students::update_student)
                .delete(api::students::delete_student),
        )
        .route("/studentsPage", get(api::students::dashboard))
        .route("/applyCrew", post(api::crews::apply))
        .route("/resultApply", get(api::crews::results))
        // Crew applications
        .route("/crew-applications", get(api::crews::list_applications))
        .route("/crew-applications/:id/approve", post(api::crews::approve))
        .route("/crew-applications/:id/reject", post(api::crews::reject))
        .layer(DefaultBodyLimit::max(state.config.max_request_bytes()))
        .with_state(state.clone());

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .nest_service(
            &state.config.storage.public_url_prefix,
            ServeDir::new(&state.config.storage.root),
        )
        .merge(openapi)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
