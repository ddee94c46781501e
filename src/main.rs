use receipt_relay::{build_app, run_server, AppConfig, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let port = config.port;
    let app = build_app(AppState::new(config));

    info!(port, "receipt relay listening");
    run_server(app, port).await;
}
