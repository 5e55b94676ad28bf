//! Diagnostic logging for integrations.
//!
//! stdout belongs to the published document; every log line goes to
//! stderr, either human-readable or as JSON lines.
//!
//! The subscriber is built into an explicit [`LogHandle`] rather than
//! installed behind the caller's back. Binaries call
//! [`LogHandle::install`] once; tests wrap code in [`LogHandle::scoped`].
//!
//! ```ignore
//! use ti_core::logging::{LogConfig, LogHandle, LogLevel};
//!
//! let level = args.verbose.then_some(LogLevel::Debug);
//! let handle = LogHandle::new(&LogConfig::from_env(level, None));
//! handle.install().ok();
//! ```

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// A configured, not yet installed, tracing subscriber.
#[derive(Clone)]
pub struct LogHandle {
    dispatch: Dispatch,
}

impl LogHandle {
    /// Build a stderr subscriber for `config`.
    ///
    /// Malformed directives fall back to the plain level.
    pub fn new(config: &LogConfig) -> Self {
        let filter = EnvFilter::try_new(config.filter())
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
        let registry = tracing_subscriber::registry().with(filter);

        let dispatch = match config.format {
            LogFormat::Human => {
                let use_ansi = std::io::stderr().is_terminal();
                let fmt_layer = fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(use_ansi);

                if config.timestamps {
                    Dispatch::new(registry.with(fmt_layer))
                } else {
                    Dispatch::new(registry.with(fmt_layer.without_time()))
                }
            }
            LogFormat::Jsonl => {
                let json_layer = fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true);
                Dispatch::new(registry.with(json_layer))
            }
        };

        LogHandle { dispatch }
    }

    /// Make this the process-wide subscriber.
    pub fn install(self) -> Result<(), SetGlobalDefaultError> {
        tracing::dispatcher::set_global_default(self.dispatch)
    }

    /// Run `f` with this subscriber active on the current thread only.
    pub fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle").finish_non_exhaustive()
    }
}

/// Generate a unique run ID for this invocation.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    // Shorten to first 12 hex chars for readability
    format!("run-{}", &uuid.simple().to_string()[..12])
}
