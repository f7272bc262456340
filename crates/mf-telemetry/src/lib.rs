//! # MF Telemetry
//!
//! Structured logging for the Merkle forest crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mf_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() -> Result<(), mf_telemetry::TelemetryError> {
//!     let config = TelemetryConfig::from_env();
//!     init_tracing(&config)?;
//!     // forest code logs through `tracing` from here on
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MF_SERVICE_NAME` | `merkle-forest` | Service name attached to the startup event |
//! | `MF_LOG_LEVEL` | `info` | Log filter directives (falls back to `RUST_LOG`) |
//! | `MF_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{init_test_tracing, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// A global subscriber is already installed, or installation failed.
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    /// The log filter directives did not parse.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
