use paynet_service::{config::PaynetConfig, Application};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PaynetConfig::load()?;

    init_tracing(
        "paynet-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    paynet_service::services::init_metrics()?;

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
