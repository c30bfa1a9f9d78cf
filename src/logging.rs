use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FORMAT_VAR: &str = "FINLER_LOG_FORMAT";

/// Installs the global subscriber. `RUST_LOG` controls the filter (default
/// `info`); `FINLER_LOG_FORMAT=json` switches to structured output.
///
/// Logs go to stderr so `plan --json` output stays clean on stdout.
pub fn init_tracing() {
    let log_format = std::env::var(LOG_FORMAT_VAR).unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        let installed = registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init();
        report_existing_subscriber(installed);
    } else {
        let installed = registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init();
        report_existing_subscriber(installed);
    }
}

// A second call keeps the subscriber that is already installed.
fn report_existing_subscriber(installed: Result<(), TryInitError>) {
    if let Err(err) = installed {
        debug!(error = %err, "tracing subscriber already installed; keeping it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_keeps_the_installed_subscriber() {
        init_tracing();
        init_tracing();
        debug!("subscriber still usable after a repeated init");
    }
}
