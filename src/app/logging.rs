//! Logging initialization.
//!
//! Logs go to stderr so the run summary on stdout stays clean.

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

/// Map `-v` occurrences to a default filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing. `RUST_LOG` wins over `-v` when set.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_line_number(verbose >= 3)
        .try_init();

    debug!("disagg started with verbosity level: {verbose}");
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
