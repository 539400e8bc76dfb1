//! Storefront Application CLI

use std::{io, process};

use storefront_app::{
    cli, config::AppConfig, context::AppContext, errors::AppError, observability,
};
use tracing::error;

#[tokio::main]
pub async fn main() {
    let config = AppConfig::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = run(config).await {
        error!(%error, "command failed");
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    observability::init_subscriber(&config.logging)?;

    let context = AppContext::from_config(&config.store)?;
    let mut out = io::stdout().lock();

    cli::run(config.command, &context, &mut out).await
}
