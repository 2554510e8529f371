//! Structured logging facility
//!
//! Single initialization point for the tracing subscriber. Call
//! [`init`] once at application startup; later calls are no-ops.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// # Profiles
///
/// - **Development**: human-readable logs, `cadforge=debug` by default
/// - **Production**: JSON structured logs, `cadforge=info` by default
///
/// `RUST_LOG` overrides the default filter in both profiles.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("cadforge=debug")),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("cadforge=info")),
                )
                .init();
        }
    });
}
