// src/main.rs

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use therabot::api::http::http_router;
use therabot::config::CONFIG;
use therabot::db;
use therabot::state::create_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let level = CONFIG.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Therabot");
    info!("Generation model: {}", CONFIG.gemini_model);
    info!("Embedding model: {}", CONFIG.embedding_model);
    if CONFIG.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY not set - replies will degrade to canned fallbacks");
    }

    // Database
    let pool = db::create_pool(&CONFIG.database_url, CONFIG.sqlite_max_connections).await?;
    db::init_schema(&pool).await?;

    // Pipeline services
    let app_state = create_app_state(pool);

    let cors = CorsLayer::new()
        .allow_origin(
            CONFIG
                .cors_origin
                .parse::<axum::http::HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?,
        )
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let app = Router::new()
        .nest("/api", http_router(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
