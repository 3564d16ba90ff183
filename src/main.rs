use std::sync::Arc;

use medboard_server::auth::SessionSigner;
use medboard_server::config::Config;
use medboard_server::models::AppState;
use medboard_server::routes;
use medboard_server::store::{mem::MemStore, pg::PgStore, Store};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;

    let store: Arc<dyn Store> = match &cfg.database_url {
        Some(url) => Arc::new(PgStore::connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, running on the in-memory store");
            Arc::new(MemStore::new())
        }
    };

    let state = AppState {
        store,
        signer: SessionSigner::new(cfg.session_secret.as_bytes().to_vec(), cfg.session_ttl_days),
    };

    // Allow the dashboard frontend (separate origin in dev) to call the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
