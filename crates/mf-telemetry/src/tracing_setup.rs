//! Subscriber installation.

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

static TEST_INIT: Once = Once::new();

fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Install the global tracing subscriber.
///
/// Only one subscriber can be installed per process; a second call returns
/// `TelemetryError::SubscriberInit`.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = env_filter(config)?;

    if config.json_logs {
        // JSON output for containers/production
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    } else {
        // Pretty output for development
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json = config.json_logs,
        "Tracing initialized"
    );

    Ok(())
}

/// Install a test-writer subscriber once per process.
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_test_tracing() {
    TEST_INIT.call_once(|| {
        let config = TelemetryConfig::from_env();
        let filter = env_filter(&config).unwrap_or_else(|_| EnvFilter::new("info"));
        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
        tracing::debug!("still logging");
    }

    #[test]
    fn test_second_install_is_rejected() {
        init_test_tracing();

        let result = init_tracing(&TelemetryConfig::default());

        assert!(matches!(result, Err(TelemetryError::SubscriberInit(_))));
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let config = TelemetryConfig::default().with_log_level("mf_02=loud");

        assert!(matches!(
            init_tracing(&config),
            Err(TelemetryError::Config(_))
        ));
    }
}
