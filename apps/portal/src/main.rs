use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use auth_cell::SessionStore;
use shared_config::AppConfig;
use shared_database::storage::FileStorage;
use shared_utils::clock::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting patient portal");

    let config = Arc::new(AppConfig::from_env());

    // Pick up whoever was signed in when the portal last ran
    let storage = Arc::new(FileStorage::new(config.session_store_path.clone()));
    let session = Arc::new(SessionStore::restore(&config, storage).await);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router::create_router(config.clone(), session, Arc::new(SystemClock))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
