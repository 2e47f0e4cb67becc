use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level.
///
/// Header events are logged at INFO, so `--log` raises the floor to INFO even
/// without `-v`.
fn default_directive(verbose: u8, log_events: bool) -> &'static str {
    if verbose >= 2 {
        "debug"
    } else if verbose == 1 || log_events {
        "info"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` overrides the level derived from `verbose`.
pub fn init(verbose: u8, log_events: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, log_events)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(verbose >= 2)
        .try_init();

    // A subscriber may already be installed (e.g. when embedded); keep it.
    if let Err(e) = installed {
        tracing::debug!(error = %e, "Keeping the existing tracing subscriber");
    }
}
