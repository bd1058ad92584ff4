#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use notehub_server::{AppState, Config, api};

#[tokio::main]
async fn main() {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,notehub_server=debug".into()),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting notehub server");

    let config = Config::from_env().expect("Failed to load notehub configuration");
    let bind_addr = config.bind_addr.clone();

    let state = AppState::new(config).expect("Failed to initialize app state");
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("notehub listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
