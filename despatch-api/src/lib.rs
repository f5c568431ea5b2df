use axum::{http::Method, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod agent_remits;
pub mod auth;
pub mod error;
pub mod investors;
pub mod metrics;
pub mod notifier;
pub mod orders;
pub mod remittances;
pub mod state;
pub mod wallets;
pub mod worker;

pub use state::{build_in_memory, AppState, StoreHandles};

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let protected = Router::new()
        .merge(orders::routes())
        .merge(remittances::routes())
        .merge(agent_remits::routes())
        .merge(wallets::routes())
        .merge(investors::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::actor_middleware,
        ));

    Router::new()
        .route("/health", get(metrics::health_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
