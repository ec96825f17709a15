use std::error::Error;

use tucredito::config::ServiceConfig;
use tucredito::service;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = ServiceConfig::from_env()?;
    simple_logger::SimpleLogger::new()
        .with_level(config.log_level)
        .init()?;

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    log::info!("loan-quote service listening on {}", config.bind);

    axum::serve(listener, service::router()).await?;
    Ok(())
}
