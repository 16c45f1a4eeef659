//! Installs the `tracing` subscriber for the binary.
//!
//! Events go to stderr so stdout carries only command output. `RUST_LOG`
//! takes precedence over the `--quiet`/`--verbose` defaults.
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "fiscode=error"
    } else if verbose {
        "fiscode=debug"
    } else {
        "fiscode=warn"
    }
}

/// Installs the global subscriber. Call once, before any command runs.
pub fn init(quiet: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
