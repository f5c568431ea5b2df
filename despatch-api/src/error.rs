use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use despatch_ledger::LedgerError;
use despatch_order::OrderError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, msg)
            }
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(msg) => AppError::NotFoundError(msg),
            OrderError::Forbidden(msg) => AppError::AuthorizationError(msg),
            OrderError::Validation(msg) => AppError::ValidationError(msg),
            OrderError::InvalidTransition { from, to } => AppError::ValidationError(format!(
                "invalid shipment transition {} -> {}",
                from, to
            )),
            OrderError::Storage(msg) => AppError::Anyhow(anyhow::anyhow!(msg)),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(msg) => AppError::NotFoundError(msg),
            LedgerError::Forbidden(msg) => AppError::AuthorizationError(msg),
            LedgerError::Validation(msg) => AppError::ValidationError(msg),
            LedgerError::PendingExists(id) => AppError::ConflictError(format!(
                "a pending remittance already exists: {}",
                id
            )),
            LedgerError::BelowMinimum { amount, minimum } => AppError::ValidationError(format!(
                "amount {} is below the minimum payout of {}",
                amount, minimum
            )),
            LedgerError::ExceedsAvailable {
                requested,
                available,
            } => AppError::ValidationError(format!(
                "requested {} exceeds available balance {}",
                requested, available
            )),
            LedgerError::Storage(msg) => AppError::Anyhow(anyhow::anyhow!(msg)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
