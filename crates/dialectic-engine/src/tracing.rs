// Purpose: Tracing subscriber setup for the engine and its binaries

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter, Registry,
};

//-----------------------------------------------------------------------------
// Tracing Initialization
//-----------------------------------------------------------------------------

/// Initializes the global tracing subscriber.
///
/// # Arguments
///
/// * `log_level`: Filter directives used when `RUST_LOG` is unset. Defaults
///                to "info". Module directives such as
///                "dialectic_logic=debug,info" are accepted.
/// * `json_output`: Emit JSON lines instead of the human-readable format.
///
/// Logs go to stderr so that reports on stdout stay machine-readable.
pub fn init_tracing(log_level: Option<&str>, json_output: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.unwrap_or("info")))?;

    let subscriber = Registry::default().with(env_filter);

    if json_output {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_span_list(true);
        tracing::subscriber::set_global_default(subscriber.with(json_layer))?;
    } else {
        let fmt_layer = fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_level(true);
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer))?;
    }

    Ok(())
}

/// Route `debug` logs to the test harness's captured output. Safe to call
/// from every test; only the first call installs a subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

//-----------------------------------------------------------------------------
// Tests
//-----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
        let span = tracing::info_span!("test_span", request = 1);
        let _enter = span.enter();
        tracing::debug!("message inside a span");
    }

    #[test]
    fn test_second_global_init_fails() {
        init_test_tracing();
        assert!(init_tracing(Some("debug"), false).is_err());
    }
}
