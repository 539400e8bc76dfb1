//! Browser logging

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Send `tracing` events to the browser console.
#[cfg(target_arch = "wasm32")]
pub fn init_subscriber() {
    let console = fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(tracing_web::MakeWebConsoleWriter::new());

    _ = tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(console)
        .try_init();
}

/// Send `tracing` events to stderr.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_subscriber() {
    let stderr = fmt::layer().with_writer(std::io::stderr);

    _ = tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(stderr)
        .try_init();
}
