//! Logging initialization for the CLI
//!
//! Wires the `-v` count into a tracing-subscriber environment filter.
//! An explicit `RUST_LOG` always wins over the flag-derived level.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber from the verbosity level
pub fn init(verbosity: u8) -> Result<(), String> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("seqspec={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| err.to_string())
}
