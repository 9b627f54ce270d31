//! `performTransaction` handler.
//!
//! validate request -> build receipt -> validate receipt -> respond.

use axum::{extract::State, Json};
use serde_json::Value;
use service_core::error::{validation_error_paths, AppError};
use service_core::extract::ApiJson;

use crate::{
    dtos::TransactionResponse,
    schema::{validate_request, validate_response},
    services::{record_transaction, Outcome},
    startup::AppState,
};

#[tracing::instrument(skip(state, body))]
pub async fn perform_transaction(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Json<TransactionResponse>, AppError> {
    let request = match validate_request(&body) {
        Ok(request) => request,
        Err(AppError::ValidationError(errors)) => {
            tracing::warn!(
                violations = ?validation_error_paths(&errors),
                "Rejected transaction request"
            );
            record_transaction(Outcome::Rejected);
            return Err(AppError::ValidationError(errors));
        }
        Err(e) => {
            record_transaction(Outcome::Failed);
            return Err(e);
        }
    };

    tracing::info!(
        request_id = %request.id,
        transaction_id = %request.params.id,
        service_id = %request.params.service_id,
        amount = %request.params.fields.amount,
        "Performing transaction"
    );

    let response = state.receipts.build(&request);

    if let Err(e) = validate_response(&response) {
        record_transaction(Outcome::Failed);
        return Err(e);
    }

    record_transaction(Outcome::Performed);
    tracing::info!(
        request_id = %request.id,
        receipt_id = %response.result.transaction_id,
        "Transaction performed"
    );

    Ok(Json(response))
}
