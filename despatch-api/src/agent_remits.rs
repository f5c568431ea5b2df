use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use despatch_core::Actor;
use despatch_ledger::AgentRemit;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/agent-remits", post(submit_remit))
        .route("/v1/agent-remits/{id}/approve", post(approve_remit))
        .route("/v1/agent-remits/{id}/send", post(send_remit))
}

#[derive(Debug, Deserialize)]
pub struct SubmitAgentRemitRequest {
    pub amount: f64,
    pub note: Option<String>,
}

/// POST /v1/agent-remits
pub async fn submit_remit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<SubmitAgentRemitRequest>,
) -> Result<(StatusCode, Json<AgentRemit>), AppError> {
    let remit = state
        .agent_ledger
        .submit(&actor, req.amount, req.note)
        .await?;
    state.metrics.agent_remits_submitted.inc();
    Ok((StatusCode::CREATED, Json(remit)))
}

/// POST /v1/agent-remits/{id}/approve
pub async fn approve_remit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<AgentRemit>, AppError> {
    let remit = state.agent_ledger.approve(&actor, id).await?;
    Ok(Json(remit))
}

/// POST /v1/agent-remits/{id}/send
pub async fn send_remit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<AgentRemit>, AppError> {
    let remit = state.agent_ledger.send(&actor, id).await?;
    Ok(Json(remit))
}
