use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "<unset>".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "9876".to_string());
    info!(
        target: "storefront",
        "storefront-admin starting: RUST_LOG='{}', APP_ENV='{}', host={}, port={}",
        rust_log, app_env, host, port
    );

    storefront_admin::server::run().await
}
