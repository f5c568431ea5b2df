use despatch_api::{app, build_in_memory, worker};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "despatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = despatch_store::app_config::Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config load failed, using defaults");
        despatch_store::app_config::Config::default()
    });
    tracing::info!("Starting Despatch API on port {}", config.server.port);

    let (state, handles) = build_in_memory(config.settlement.clone(), config.fx.clone());

    let interval = state.rules.scheduler_interval_seconds;
    tokio::spawn(worker::start_profit_worker(handles.scheduler, interval));

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server failed");
}
