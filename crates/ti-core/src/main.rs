//! Host facts - sample integration built on ti-core.
//!
//! Publishes:
//! - Inventory: operating system, architecture and hostname
//! - Metrics: one `HostSample` with load averages and the context switch rate
//! - Events: a notification when the 1-minute load exceeds the CPU count

use clap::Args;
use std::ffi::OsString;
use std::io::IsTerminal;
use ti_core::logging::{LogConfig, LogHandle, LogLevel};
use ti_core::{
    format_error_human, Error, ExitCode, Integration, IntegrationArgs, Result, SourceType,
};

const INTEGRATION_NAME: &str = "com.example.host-facts";

/// Host facts options
#[derive(Args, Debug, Clone)]
struct HostFactsArgs {
    /// Environment label attached to every sample
    #[arg(long, env = "HOST_FACTS_ENVIRONMENT", default_value = "production")]
    environment: String,
}

fn main() {
    let exit_code = match run() {
        Ok(()) => ExitCode::Clean,
        // clap renders help, version and usage errors itself
        Err(Error::Args(e)) => e.exit(),
        Err(e) => {
            eprintln!("{}", format_error_human(&e, std::io::stderr().is_terminal()));
            ExitCode::from(&e)
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run() -> Result<()> {
    let argv: Vec<OsString> = std::env::args_os().collect();
    let version = env!("CARGO_PKG_VERSION");

    // Logging has to be up before the cache is opened and checked.
    let early =
        IntegrationArgs::<HostFactsArgs>::parse_for(INTEGRATION_NAME, version, argv.clone())?;
    let log_config = LogConfig::from_env(early.defaults.verbose.then_some(LogLevel::Debug), None);
    if let Err(e) = LogHandle::new(&log_config).install() {
        eprintln!("logging already initialized: {}", e);
    }

    let (mut integration, args) = Integration::builder(INTEGRATION_NAME, version)
        .args_from(argv)
        .build::<HostFactsArgs>()?;
    tracing::debug!(run_id = %integration.run_id(), "collecting host facts");

    let hostname = read_hostname();

    if integration.args().has_inventory() {
        integration.set_item("host", "os", std::env::consts::OS);
        integration.set_item("host", "arch", std::env::consts::ARCH);
        integration.set_item("host", "hostname", hostname.clone());
        integration.set_item("host", "environment", args.environment.clone());
    }

    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let load = read_loadavg();

    if integration.args().has_metrics() {
        let mut sample = integration.new_metric_set("HostSample");
        sample.set_attribute("hostname", hostname.as_str())?;
        sample.set_attribute("environment", args.environment.as_str())?;
        sample.set_metric("cpuCount", cpus as f64, SourceType::Gauge)?;

        if let Some([one, five, fifteen]) = load {
            sample.set_metric("loadAverageOneMinute", one, SourceType::Gauge)?;
            sample.set_metric("loadAverageFiveMinute", five, SourceType::Gauge)?;
            sample.set_metric("loadAverageFifteenMinute", fifteen, SourceType::Gauge)?;
        }

        if let Some(switches) = read_context_switches() {
            // Counter resets after reboot; the next run recovers.
            if let Err(e) = sample.set_metric("contextSwitchesPerSecond", switches, SourceType::Rate)
            {
                tracing::warn!(error = %e, "context switch rate skipped");
            }
        }
    }

    if integration.args().has_events() {
        if let Some([one, _, _]) = load {
            if one > cpus as f64 {
                integration.add_notification_event(format!(
                    "load average {:.2} exceeds {} CPUs on {}",
                    one, cpus, hostname
                ))?;
            }
        }
    }

    integration.publish()
}

fn read_hostname() -> String {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("HOSTNAME").ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 1, 5 and 15 minute load averages from /proc/loadavg.
fn read_loadavg() -> Option<[f64; 3]> {
    let content = std::fs::read_to_string("/proc/loadavg").ok()?;
    parse_loadavg(&content)
}

fn parse_loadavg(content: &str) -> Option<[f64; 3]> {
    let mut fields = content.split_whitespace().map(|f| f.parse::<f64>().ok());
    Some([fields.next()??, fields.next()??, fields.next()??])
}

/// Total context switches since boot from /proc/stat.
fn read_context_switches() -> Option<f64> {
    let content = std::fs::read_to_string("/proc/stat").ok()?;
    parse_context_switches(&content)
}

fn parse_context_switches(content: &str) -> Option<f64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("ctxt "))
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loadavg() {
        assert_eq!(
            parse_loadavg("0.52 0.58 0.59 1/977 12345\n"),
            Some([0.52, 0.58, 0.59])
        );
        assert_eq!(parse_loadavg("garbage"), None);
        assert_eq!(parse_loadavg("1.0 2.0"), None);
    }

    #[test]
    fn test_parse_context_switches() {
        let stat = "cpu  1 2 3 4\nintr 99\nctxt 123456789\nbtime 1700000000\n";
        assert_eq!(parse_context_switches(stat), Some(123456789.0));
        assert_eq!(parse_context_switches("cpu 1 2 3\n"), None);
    }
}
