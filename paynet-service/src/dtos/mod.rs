use serde::{Deserialize, Serialize};
use serde_json::Number;

/// `performTransaction` call as sent by Paynet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub jsonrpc: String,
    pub method: String,
    /// Required, may be empty.
    pub token: String,
    /// Correlation id, echoed back as a string. Integers are unbounded.
    pub id: Number,
    pub params: TransactionParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionParams {
    pub id: Number,
    pub time: Number,
    pub fields: TransactionFields,
    pub service_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFields {
    pub clientid: String,
    pub amount: Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub jsonrpc: String,
    pub id: String,
    pub result: TransactionResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub transaction_id: String,
    pub status: String,
    pub status_text: String,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    pub response: Vec<LineItem>,
}

/// One bilingual row of the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub key: String,
    pub label_ru: String,
    pub label_uz: String,
    pub value: Option<String>,
}
