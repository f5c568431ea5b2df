use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use despatch_core::Actor;
use despatch_ledger::driver::SubmitRemittance;
use despatch_ledger::{RemitMethod, Remittance};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/remittances", post(submit_remittance))
        .route("/v1/remittances/{id}/accept", post(accept_remittance))
        .route("/v1/remittances/{id}/reject", post(reject_remittance))
}

#[derive(Debug, Deserialize)]
pub struct SubmitRemittanceRequest {
    pub manager_id: Uuid,
    pub amount: f64,
    pub currency: Option<String>,
    pub method: RemitMethod,
    pub proof_ref: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// POST /v1/remittances
pub async fn submit_remittance(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<SubmitRemittanceRequest>,
) -> Result<(StatusCode, Json<Remittance>), AppError> {
    let remittance = state
        .driver_ledger
        .submit(
            &actor,
            SubmitRemittance {
                manager_id: req.manager_id,
                amount: req.amount,
                currency: req.currency.unwrap_or_else(|| "AED".to_string()),
                method: req.method,
                proof_ref: req.proof_ref,
                from: req.from,
                to: req.to,
            },
        )
        .await?;
    state.metrics.remittances_submitted.inc();
    Ok((StatusCode::CREATED, Json(remittance)))
}

/// POST /v1/remittances/{id}/accept
pub async fn accept_remittance(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Remittance>, AppError> {
    let remittance = state.driver_ledger.accept(&actor, id).await?;
    Ok(Json(remittance))
}

/// POST /v1/remittances/{id}/reject
pub async fn reject_remittance(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Remittance>, AppError> {
    let remittance = state.driver_ledger.reject(&actor, id).await?;
    Ok(Json(remittance))
}
