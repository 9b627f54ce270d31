use chrono::FixedOffset;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct PaynetConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub receipt: ReceiptConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceiptConfig {
    /// Fixed UTC offset for receipt timestamps. Host local time when unset.
    pub utc_offset_minutes: Option<i32>,
}

impl ReceiptConfig {
    pub fn utc_offset(&self) -> Result<Option<FixedOffset>, AppError> {
        self.utc_offset_minutes
            .map(|minutes| {
                minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "PAYNET_UTC_OFFSET_MINUTES out of range: {}",
                            minutes
                        ))
                    })
            })
            .transpose()
    }
}

impl PaynetConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let config = PaynetConfig {
            common,
            receipt: ReceiptConfig {
                utc_offset_minutes: parse_setting(
                    "PAYNET_UTC_OFFSET_MINUTES",
                    env::var("PAYNET_UTC_OFFSET_MINUTES").ok(),
                )?,
            },
        };

        // Surface a bad offset at startup rather than on the first request.
        config.receipt.utc_offset()?;

        Ok(config)
    }
}

fn parse_setting<T>(key: &str, raw: Option<String>) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, value, e))
        }),
    }
}
