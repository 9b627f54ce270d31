//! Builds the canned `performTransaction` receipt.
//!
//! The receipt is a fixed 16-line template. Only three lines change per
//! request: `time`, `transaction_id` and `clientid`. Every clock-derived value
//! reads the clock on its own, so the millisecond values are not guaranteed to
//! agree with each other.

use std::sync::Arc;

use crate::dtos::{LineItem, TransactionRequest, TransactionResponse, TransactionResult};
use crate::services::clock::Clock;

pub const JSONRPC_VERSION: &str = "2.0";
pub const STATUS_SUCCESS: &str = "0";
pub const STATUS_TEXT_SUCCESS: &str = "Проведен успешно";

/// `DD.MM.YYYY HH:MM:SS`
pub const RECEIPT_TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

#[derive(Debug, Clone, Copy)]
enum Slot {
    Fixed(Option<&'static str>),
    Time,
    TransactionId,
    ClientId,
}

#[derive(Debug, Clone, Copy)]
struct LineTemplate {
    key: &'static str,
    label_ru: &'static str,
    label_uz: &'static str,
    slot: Slot,
}

const fn line(
    key: &'static str,
    label_ru: &'static str,
    label_uz: &'static str,
    slot: Slot,
) -> LineTemplate {
    LineTemplate {
        key,
        label_ru,
        label_uz,
        slot,
    }
}

static RECEIPT_TEMPLATE: [LineTemplate; 16] = [
    line("agent_name", "Агент", "Agent", Slot::Fixed(Some("CONTINEO ASIA"))),
    line("agent_inn", "ИНН", "STIR", Slot::Fixed(Some("305923492"))),
    line("provider_name", "Оператор", "Operator", Slot::Fixed(Some("Сотовая связь"))),
    line("service_name", "Услуга", "Xizmat turi", Slot::Fixed(Some("Проверка номера"))),
    line("time", "Время", "To'lov vaqti", Slot::Time),
    line("terminal_id", "Номер терминала", "Terminal raqami", Slot::Fixed(Some("4187535"))),
    line("transaction_id", "Номер чека", "Chek raqami", Slot::TransactionId),
    line("clientid", "Номер телефона", "Telefon raqami", Slot::ClientId),
    line("check_status", "Статус номера", "Raqam statusi", Slot::Fixed(None)),
    line("provider_id_new", "Провайдер ID", "Provayder ID", Slot::Fixed(Some("45"))),
    line(
        "provider_name_real",
        "Наименование оператора",
        "Operator nomi",
        Slot::Fixed(Some("UzMobile")),
    ),
    line("service_id_new", "Сервис ID", "Servis ID", Slot::Fixed(Some("4987"))),
    line(
        "service_name_real",
        "Наименование сервиса",
        "Xizmat nomi",
        Slot::Fixed(Some("Проверка номера")),
    ),
    line(
        "limit",
        "Лимит пополнения в месяц",
        "Oyiga to`ldirish cheklovi",
        Slot::Fixed(None),
    ),
    line("max_amount", "Максимальная сумма", "Maksimal summa", Slot::Fixed(None)),
    line("agent_commission", "Комиссия агента", "Agent komissiyasi", Slot::Fixed(Some("0"))),
];

/// Produces the receipt returned for a validated request.
pub trait Receipts: Send + Sync {
    fn build(&self, request: &TransactionRequest) -> TransactionResponse;
}

#[derive(Clone)]
pub struct ReceiptBuilder {
    clock: Arc<dyn Clock>,
}

impl ReceiptBuilder {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Build the receipt for an already validated request.
    ///
    /// Only `id` and `params.fields.clientid` are read from the request.
    pub fn build(&self, request: &TransactionRequest) -> TransactionResponse {
        let transaction_id = self.now_millis().to_string();
        let time = self.now_millis();

        let response = RECEIPT_TEMPLATE
            .iter()
            .map(|line| LineItem {
                key: line.key.to_string(),
                label_ru: line.label_ru.to_string(),
                label_uz: line.label_uz.to_string(),
                value: self.fill(line.slot, request),
            })
            .collect();

        TransactionResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: request.id.to_string(),
            result: TransactionResult {
                transaction_id,
                status: STATUS_SUCCESS.to_string(),
                status_text: STATUS_TEXT_SUCCESS.to_string(),
                time,
                response,
            },
        }
    }

    fn fill(&self, slot: Slot, request: &TransactionRequest) -> Option<String> {
        match slot {
            Slot::Fixed(value) => value.map(str::to_string),
            Slot::Time => Some(self.clock.now().format(RECEIPT_TIME_FORMAT).to_string()),
            Slot::TransactionId => Some(self.now_millis().to_string()),
            Slot::ClientId => Some(request.params.fields.clientid.clone()),
        }
    }

    fn now_millis(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }
}

impl Receipts for ReceiptBuilder {
    fn build(&self, request: &TransactionRequest) -> TransactionResponse {
        ReceiptBuilder::build(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::{TransactionFields, TransactionParams};
    use crate::schema::validate_response;
    use crate::services::clock::FixedClock;
    use chrono::DateTime;
    use serde_json::Number;

    fn request(id: i64, clientid: &str) -> TransactionRequest {
        TransactionRequest {
            jsonrpc: "2.0".to_string(),
            method: "performTransaction".to_string(),
            token: String::new(),
            id: Number::from(id),
            params: TransactionParams {
                id: Number::from(1747317450780_i64),
                time: Number::from(1747317450801_i64),
                fields: TransactionFields {
                    clientid: clientid.to_string(),
                    amount: Number::from(500),
                },
                service_id: "11629".to_string(),
            },
        }
    }

    fn fixed_builder() -> ReceiptBuilder {
        let instant = DateTime::parse_from_rfc3339("2025-05-15T18:57:30.780+05:00").unwrap();
        ReceiptBuilder::new(Arc::new(FixedClock(instant)))
    }

    fn value_of<'a>(response: &'a TransactionResponse, key: &str) -> Option<&'a str> {
        response
            .result
            .response
            .iter()
            .find(|item| item.key == key)
            .and_then(|item| item.value.as_deref())
    }

    #[test]
    fn test_receipt_for_sample_request() {
        let response = fixed_builder().build(&request(126, "911924138"));

        assert_eq!(response.jsonrpc, "2.0");
        assert_eq!(response.id, "126");
        assert_eq!(response.result.status, "0");
        assert_eq!(response.result.status_text, "Проведен успешно");
        assert_eq!(response.result.time, 1747317450780);
        assert_eq!(response.result.transaction_id, "1747317450780");
        assert_eq!(response.result.response.len(), 16);

        assert_eq!(value_of(&response, "clientid"), Some("911924138"));
        assert_eq!(value_of(&response, "time"), Some("15.05.2025 18:57:30"));
        assert_eq!(value_of(&response, "transaction_id"), Some("1747317450780"));
        assert_eq!(value_of(&response, "agent_name"), Some("CONTINEO ASIA"));
        assert_eq!(value_of(&response, "agent_commission"), Some("0"));
    }

    #[test]
    fn test_key_sequence_is_invariant() {
        let builder = fixed_builder();
        let first = builder.build(&request(1, "900000001"));
        let second = builder.build(&request(-42, "+998 90 123 45 67"));

        let keys = |response: &TransactionResponse| {
            response
                .result
                .response
                .iter()
                .map(|item| item.key.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(keys(&first), keys(&second));
        let template_keys = RECEIPT_TEMPLATE
            .iter()
            .map(|line| line.key.to_string())
            .collect::<Vec<_>>();
        assert_eq!(keys(&first), template_keys);
        assert_eq!(second.id, "-42");
    }

    #[test]
    fn test_large_id_is_echoed_verbatim() {
        let mut large = request(126, "911924138");
        large.id = serde_json::from_str("99999999999999999999").unwrap();

        let response = fixed_builder().build(&large);
        assert_eq!(response.id, "99999999999999999999");
        validate_response(&response).unwrap();
    }

    #[test]
    fn test_unset_lines_are_null() {
        let response = fixed_builder().build(&request(126, "911924138"));

        for key in ["check_status", "limit", "max_amount"] {
            let item = response
                .result
                .response
                .iter()
                .find(|item| item.key == key)
                .unwrap();
            assert!(item.value.is_none(), "{key} should be null");
        }
    }

    #[test]
    fn test_only_templated_lines_vary() {
        let first = fixed_builder().build(&request(1, "111"));
        let second = fixed_builder().build(&request(2, "222"));

        for (a, b) in first.result.response.iter().zip(&second.result.response) {
            assert_eq!(a.label_ru, b.label_ru);
            assert_eq!(a.label_uz, b.label_uz);
            if a.key != "clientid" {
                assert_eq!(a.value, b.value, "{} changed", a.key);
            }
        }
    }

    #[test]
    fn test_receipt_passes_response_schema() {
        let response = fixed_builder().build(&request(126, "911924138"));
        validate_response(&response).unwrap();

        let body = serde_json::to_string(&response).unwrap();
        let parsed: TransactionResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, response);
        validate_response(&parsed).unwrap();
    }

    #[test]
    fn test_serialized_field_names() {
        let response = fixed_builder().build(&request(126, "911924138"));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["result"]["transactionId"], "1747317450780");
        assert_eq!(value["result"]["statusText"], "Проведен успешно");
        assert_eq!(value["result"]["response"][8]["key"], "check_status");
        assert!(value["result"]["response"][8]["value"].is_null());
        assert_eq!(value["result"]["response"][13]["labelUz"], "Oyiga to`ldirish cheklovi");
    }
}
