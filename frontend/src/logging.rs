use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_web::MakeWebConsoleWriter;

/// Routes `tracing` events to the browser console.
pub fn init() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(level);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        tracing::warn!("tracing subscriber already installed");
    }
}
