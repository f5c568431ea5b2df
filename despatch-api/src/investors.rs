use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use despatch_core::{Actor, Role};
use despatch_invest::DailyProfit;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/investors/{id}/profits", get(list_profits))
}

#[derive(Debug, Serialize)]
pub struct ProfitListing {
    pub request_id: Uuid,
    pub total: f64,
    pub profits: Vec<DailyProfit>,
}

/// GET /v1/investors/{id}/profits — the payout trail for one investor
/// request, visible to the investor it belongs to and workspace staff.
pub async fn list_profits(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<ProfitListing>, AppError> {
    let request = state
        .investors
        .get_request(request_id)
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e.to_string())))?
        .ok_or_else(|| AppError::NotFoundError(format!("investor request {}", request_id)))?;

    let allowed = actor.role.is_staff()
        || (actor.role == Role::Investor && actor.id == request.investor_id);
    if !allowed {
        return Err(AppError::AuthorizationError(
            "profits are visible to the investor and workspace staff only".to_string(),
        ));
    }

    let profits = state
        .investors
        .list_profits(request_id)
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e.to_string())))?;
    let total = profits.iter().map(|p| p.amount).sum();

    Ok(Json(ProfitListing {
        request_id,
        total,
        profits,
    }))
}
