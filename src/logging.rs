//! Tracing initialization for the `fortindent` binary.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FORTINDENT_LOG";

static INIT: Once = Once::new();

/// Filter used when `FORTINDENT_LOG` is unset or invalid
#[must_use]
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "fortindent=debug"
    } else {
        "fortindent=warn"
    }
}

/// Initialize logging to stderr.
///
/// Reads `FORTINDENT_LOG` for per-module levels, e.g.
/// `FORTINDENT_LOG=fortindent::format=debug,fortindent::process=trace`.
/// `--debug` raises the fallback to `fortindent=debug`.
///
/// Calling it more than once is a no-op.
pub fn init_tracing(debug: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(debug),
            )
            .with(filter)
            .init();
    });
}
