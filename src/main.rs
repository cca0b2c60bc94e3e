/**
 * ShopAuth Server Entry Point
 *
 * This is the main entry point for the account authentication server.
 * It loads configuration, connects to the database, and starts the
 * Axum HTTP server.
 */

use shopauth::server::config::AppConfig;
use shopauth::server::init::create_app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    // Configuration is loaded once at startup and is immutable afterwards.
    // A missing or malformed signing key is fatal here, never per-request.
    let config = AppConfig::from_env()?;
    let port = config.port;

    let app = create_app(config).await?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
