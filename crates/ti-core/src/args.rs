//! Command-line and environment arguments shared by every integration.
//!
//! Integrations describe their own options as a `clap::Args` struct; it is
//! flattened next to [`DefaultArgs`] so every integration understands the
//! same `--verbose`, `--pretty` and data-selection flags.
//!
//! ```ignore
//! #[derive(clap::Args, Debug, Clone)]
//! struct RedisArgs {
//!     #[arg(long, env = "HOSTNAME", default_value = "localhost")]
//!     hostname: String,
//! }
//!
//! let (integration, redis_args) = Integration::new::<RedisArgs>("redis", "1.0.0")?;
//! ```

use clap::{Args, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;

use crate::error::Result;

/// Environment variables [`DefaultArgs`] falls back to when a flag is absent.
pub const DEFAULT_ARGS_ENV: [&str; 2] = ["VERBOSE", "PRETTY"];

/// Flags every integration accepts.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultArgs {
    /// Print more information to logs
    #[arg(short, long, env = "VERBOSE")]
    pub verbose: bool,

    /// Print pretty formatted JSON
    #[arg(short, long, env = "PRETTY")]
    pub pretty: bool,

    /// Publish all kinds of data (inventory, metrics and events)
    #[arg(long)]
    pub all: bool,

    /// Publish metrics data
    #[arg(long)]
    pub metrics: bool,

    /// Publish inventory data
    #[arg(long)]
    pub inventory: bool,

    /// Publish events data
    #[arg(long)]
    pub events: bool,
}

impl DefaultArgs {
    /// True when `--all` is set or no data selector is given at all.
    pub fn all(&self) -> bool {
        self.all || !(self.metrics || self.inventory || self.events)
    }

    pub fn has_metrics(&self) -> bool {
        self.all() || self.metrics
    }

    pub fn has_inventory(&self) -> bool {
        self.all() || self.inventory
    }

    pub fn has_events(&self) -> bool {
        self.all() || self.events
    }
}

/// Placeholder for integrations without options of their own.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct NoArgs {}

/// Full argument set: shared flags plus the integration's own `A`.
#[derive(Parser, Debug, Clone)]
pub struct IntegrationArgs<A: Args> {
    #[command(flatten)]
    pub defaults: DefaultArgs,

    #[command(flatten)]
    pub extra: A,
}

impl<A: Args> IntegrationArgs<A> {
    /// Parse `args` (first item is the program name) for integration `name`.
    pub fn parse_for<I, T>(name: &str, version: &str, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = Self::command()
            .name(name.to_string())
            .version(version.to_string());
        let matches = command.try_get_matches_from_mut(args)?;
        Ok(Self::from_arg_matches(&matches)?)
    }
}

/// Keep the host's `VERBOSE`/`PRETTY` out of default-value assertions.
#[cfg(test)]
pub(crate) fn clear_flag_env() {
    for var in DEFAULT_ARGS_ENV {
        std::env::remove_var(var);
    }
}
