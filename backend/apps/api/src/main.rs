//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::Router;
use base64::Engine;
use base64::engine::general_purpose;
use gate::{GateConfig, RedisRateLimiter};
use platform::store::RedisKeyValueStore;
use session::{SessionConfig, session_router};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod kv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,gate=info,session=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Shared Redis connection for the limiter state and the value store
    let redis_url =
        env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let client = redis::Client::open(redis_url.as_str())?;
    let conn = redis::aio::ConnectionManager::new(client).await?;

    tracing::info!("Connected to store");

    let store = Arc::new(RedisKeyValueStore::new(conn.clone()));
    let limiter = Arc::new(RedisRateLimiter::new(conn));

    // Session configuration
    let session_config = if cfg!(debug_assertions) {
        SessionConfig::development()
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        SessionConfig::new(secret)
    };
    let session_config = Arc::new(session_config);

    // Fail-closed; rate overrides are read from the environment per call
    let gate_config = Arc::new(GateConfig::default());

    // Build router
    let app = Router::new()
        .merge(session_router(
            store.clone(),
            session_config,
            limiter.clone(),
            gate_config.clone(),
        ))
        .merge(kv::kv_router(store, limiter, gate_config))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
