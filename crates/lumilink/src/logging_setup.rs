use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system.
///
/// Defaults to `info`; `RUST_LOG` takes precedence for per-module filtering
/// (e.g. `RUST_LOG=lumilink_core::e131=trace`).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
