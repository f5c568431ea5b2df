use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

use crate::state::AppState;

/// Process-wide counters, registered against a private registry so tests
/// can run several engines side by side.
pub struct Metrics {
    registry: Registry,
    pub orders_created: IntCounter,
    pub orders_delivered: IntCounter,
    pub remittances_submitted: IntCounter,
    pub agent_remits_submitted: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let orders_created =
            IntCounter::new("despatch_orders_created_total", "Orders created").unwrap();
        let orders_delivered =
            IntCounter::new("despatch_orders_delivered_total", "Orders delivered").unwrap();
        let remittances_submitted = IntCounter::new(
            "despatch_remittances_submitted_total",
            "Driver remittances submitted",
        )
        .unwrap();
        let agent_remits_submitted = IntCounter::new(
            "despatch_agent_remits_submitted_total",
            "Agent withdrawal requests submitted",
        )
        .unwrap();

        for collector in [
            &orders_created,
            &orders_delivered,
            &remittances_submitted,
            &agent_remits_submitted,
        ] {
            registry
                .register(Box::new(collector.clone()))
                .expect("metric registration");
        }

        Self {
            registry,
            orders_created,
            orders_delivered,
            remittances_submitted,
            agent_remits_submitted,
        }
    }

    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if encoder
            .encode(&self.registry.gather(), &mut buffer)
            .is_err()
        {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
