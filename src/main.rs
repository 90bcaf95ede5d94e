//! Wedding Site Backend
//!
//! Content API for the wedding website: compliments, gallery, guestbook,
//! journey timeline and blessings, persisted in SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod media;
mod models;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::CollectionStore;
use media::MediaBackend;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CollectionStore>,
    pub media: Arc<dyn MediaBackend>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting wedding site backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Legacy seed directory: {:?}", config.seed_dir);
    tracing::info!("Media directory: {:?}", config.media_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin.is_none() {
        tracing::warn!(
            "No admin credentials configured (ADMIN_USERNAME/ADMIN_PASSWORD). Admin routes are open!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let store = Arc::new(CollectionStore::new(pool));

    let imported = store.import_legacy(&config.seed_dir).await?;
    if imported > 0 {
        tracing::info!("Imported {} legacy entries", imported);
    }

    let media = media::backend_from_config(&config)?;
    tracing::info!("Media backend: {}", media.kind());

    let state = AppState {
        store,
        media,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = match &state.config.cors_origin {
        Some(origin) => CorsLayer::new().allow_origin(origin.clone()),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    // A wildcard never covers Authorization in browsers
    .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // Clone credentials for the auth layer
    let admin = state.config.admin.clone();

    // Uploads and deletions
    let admin_routes = Router::new()
        .route("/upload", post(api::upload_compliment))
        .route("/gallery/upload", post(api::upload_gallery_item))
        .route("/compliments/{id}", delete(api::delete_compliment))
        .route("/gallery/{id}", delete(api::delete_gallery_item))
        .route("/guestbook/{id}", delete(api::delete_guestbook_message))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .route_layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(admin.clone(), req, next)
        }));

    let public_routes = Router::new()
        .route("/compliments", get(api::list_compliments))
        .route("/gallery", get(api::list_gallery))
        .route(
            "/guestbook",
            get(api::list_guestbook).post(api::create_guestbook_message),
        )
        .route("/journey", get(api::list_journey))
        .route("/generate-dua", post(api::generate_dua));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(admin_routes))
        .merge(health_routes)
        .nest_service("/assets", ServeDir::new(&state.config.media_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
