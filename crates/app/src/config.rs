//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use storefront::{catalog::DEFAULT_CATALOG_PATH, prelude::IdentifierPolicy};

use crate::cli::Command;

/// Storefront CLI configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub struct AppConfig {
    /// Catalog and storage settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Catalog and storage settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Catalog location, a file path or an http(s) URL
    #[arg(long, env = "STOREFRONT_CATALOG", default_value = DEFAULT_CATALOG_PATH)]
    pub catalog: String,

    /// Directory holding the persisted cart and admin list
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    pub data_dir: PathBuf,

    /// Reject catalog records without an identifier
    #[arg(long, env = "STOREFRONT_REQUIRE_IDS", default_value_t = false)]
    pub require_ids: bool,
}

impl StoreConfig {
    /// Identifier policy selected by `--require-ids`.
    pub fn identifier_policy(&self) -> IdentifierPolicy {
        if self.require_ids {
            IdentifierPolicy::Require
        } else {
            IdentifierPolicy::DeriveFromName
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "STOREFRONT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "STOREFRONT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
