//! Schemas for the `performTransaction` request and its receipt.

use anyhow::Context;
use serde_json::Value;
use service_core::error::{validation_error_paths, AppError};

use super::{Field, Schema};
use crate::dtos::{TransactionRequest, TransactionResponse};

const TRANSACTION_FIELDS: &[Field] = &[Field::text("clientid"), Field::integer("amount")];

const TRANSACTION_PARAMS: &[Field] = &[
    Field::integer("id"),
    Field::integer("time"),
    Field::object("fields", TRANSACTION_FIELDS),
    Field::text("service_id"),
];

const REQUEST_FIELDS: &[Field] = &[
    Field::text("jsonrpc"),
    Field::text("method"),
    Field::blank_text("token"),
    Field::integer("id"),
    Field::object("params", TRANSACTION_PARAMS),
];

const LINE_ITEM_FIELDS: &[Field] = &[
    Field::text("key"),
    Field::text("labelRu"),
    Field::text("labelUz"),
    Field::nullable_text("value"),
];

const RESULT_FIELDS: &[Field] = &[
    Field::text("transactionId"),
    Field::text("status"),
    Field::text("statusText"),
    Field::integer("time"),
    Field::object_list("response", LINE_ITEM_FIELDS),
];

const RESPONSE_FIELDS: &[Field] = &[
    Field::text("jsonrpc"),
    Field::text("id"),
    Field::object("result", RESULT_FIELDS),
];

pub const REQUEST_SCHEMA: Schema = Schema::new(REQUEST_FIELDS);

pub const RESPONSE_SCHEMA: Schema = Schema::new(RESPONSE_FIELDS);

/// Validate an untyped request body and convert it to a [`TransactionRequest`].
///
/// Client mistakes come back as `AppError::ValidationError` carrying every
/// violation; anything else is an internal error.
pub fn validate_request(body: &Value) -> Result<TransactionRequest, AppError> {
    let cleaned = REQUEST_SCHEMA.validate(body)?;

    serde_json::from_value(cleaned)
        .context("validated request did not match TransactionRequest")
        .map_err(AppError::InternalError)
}

/// Check a built response against [`RESPONSE_SCHEMA`].
///
/// A failure here is a defect in the builder, never the caller's fault, so it
/// is reported as an internal error.
pub fn validate_response(response: &TransactionResponse) -> Result<(), AppError> {
    let value = serde_json::to_value(response).context("failed to serialize response")?;

    RESPONSE_SCHEMA.validate(&value).map(|_| ()).map_err(|errors| {
        let paths = validation_error_paths(&errors);
        tracing::error!(violations = ?paths, "Built response failed its schema");
        AppError::InternalError(anyhow::anyhow!(
            "response failed schema validation at {}",
            paths.join(", ")
        ))
    })
}
