#![allow(dead_code)]

use paynet_service::config::{PaynetConfig, ReceiptConfig};
use paynet_service::startup::{Application, TRANSACTION_PATH};
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;

pub struct TestApp {
    pub http_address: String,
    pub http_port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = PaynetConfig {
            common: CoreConfig {
                port: 0, // Random port
                ..CoreConfig::default()
            },
            receipt: ReceiptConfig {
                utc_offset_minutes: Some(5 * 60),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let http_port = app.port();
        let http_address = format!("http://127.0.0.1:{}", http_port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", http_address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            http_address,
            http_port,
            client,
        }
    }

    pub async fn perform_transaction(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.http_address, TRANSACTION_PATH))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn sample_request() -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "performTransaction",
        "token": "",
        "id": 126,
        "params": {
            "id": 1747317450780_i64,
            "time": 1747317450801_i64,
            "fields": {
                "clientid": "911924138",
                "amount": 500
            },
            "service_id": "11629"
        }
    })
}

pub const RECEIPT_KEYS: [&str; 16] = [
    "agent_name",
    "agent_inn",
    "provider_name",
    "service_name",
    "time",
    "terminal_id",
    "transaction_id",
    "clientid",
    "check_status",
    "provider_id_new",
    "provider_name_real",
    "service_id_new",
    "service_name_real",
    "limit",
    "max_amount",
    "agent_commission",
];
