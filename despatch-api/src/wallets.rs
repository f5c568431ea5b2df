use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use despatch_core::Actor;
use despatch_ledger::models::WalletSummary;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/wallets/driver/{id}", get(driver_wallet))
        .route("/v1/wallets/agent/{id}", get(agent_wallet))
}

fn authorize_wallet_read(actor: &Actor, subject: Uuid) -> Result<(), AppError> {
    if actor.id == subject || actor.role.is_staff() {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(
            "wallets are visible to their owner and workspace staff only".to_string(),
        ))
    }
}

/// GET /v1/wallets/driver/{id}
pub async fn driver_wallet(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(driver_id): Path<Uuid>,
) -> Result<Json<WalletSummary>, AppError> {
    authorize_wallet_read(&actor, driver_id)?;
    let wallet = state.driver_ledger.wallet(driver_id).await?;
    Ok(Json(wallet))
}

/// GET /v1/wallets/agent/{id}
pub async fn agent_wallet(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(agent_id): Path<Uuid>,
) -> Result<Json<WalletSummary>, AppError> {
    authorize_wallet_read(&actor, agent_id)?;
    let wallet = state.agent_ledger.wallet(agent_id).await?;
    Ok(Json(wallet))
}
