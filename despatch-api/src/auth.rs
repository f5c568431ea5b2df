use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::state::AppState;

/// Resolves the calling actor from the `X-Actor-Id` header via the
/// capability-check collaborator and injects it into request extensions.
///
/// Token verification happens at the gateway in front of this service; by
/// the time a request lands here the header is trusted.
pub async fn actor_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let header = req
        .headers()
        .get("x-actor-id")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let actor_id = Uuid::parse_str(header).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let actor = state
        .capabilities
        .resolve(actor_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "capability resolution failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}
