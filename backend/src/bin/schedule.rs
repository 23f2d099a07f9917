//! Atlas scheduler command line front end.
//!
//! Picks the next target from the targets given on the command line and
//! prints the decision as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin atlas-schedule -- M31 M42 "Trapezium=05:35:16.3,-05:23:23"
//!
//! # Replay a decision for a given instant with the corrected policy
//! cargo run --bin atlas-schedule -- --now 2026-01-15T00:00:00Z \
//!   --policy observable_only M31 M42 M13
//! ```
//!
//! # Options
//!
//! - `--config PATH`: configuration file (default: `ATLAS_SCHEDULER_CONFIG`, then `scheduler.toml`)
//! - `--policy soonest_peak|observable_only`: override the selection policy
//! - `--now RFC3339`: start of the lookahead window (default: current time)
//! - `--until RFC3339`: end of the observing session
//!
//! # Exit Status
//!
//! `0` on success, `2` when the target queue itself is unusable (empty list,
//! unknown name, bad coordinates), `1` for any other failure.
//!
//! # Environment Variables
//!
//! - `ATLAS_SCHEDULER_CONFIG`: configuration file path
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use atlas_scheduler::config::SchedulerConfig;
use atlas_scheduler::models::{NightWindow, ScheduleResult, TargetSample, TargetSpec};
use atlas_scheduler::scheduler::{Scheduler, SelectionPolicy};
use atlas_scheduler::SchedulerError;

/// Exit status for queue problems the caller can fix by editing the queue.
const EXIT_BAD_QUEUE: i32 = 2;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    policy: Option<SelectionPolicy>,
    now: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    targets: Vec<TargetSpec>,
}

fn parse_time(flag: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("{} expects an RFC 3339 timestamp, got '{}'", flag, value))
}

fn parse_policy(value: &str) -> Result<SelectionPolicy> {
    match value {
        "soonest_peak" => Ok(SelectionPolicy::SoonestPeak),
        "observable_only" => Ok(SelectionPolicy::ObservableOnly),
        other => bail!("unknown policy '{}'", other),
    }
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    let mut raw = raw.into_iter();

    while let Some(arg) = raw.next() {
        let mut value = |flag: &str| raw.next().ok_or_else(|| anyhow!("{} needs a value", flag));
        match arg.as_str() {
            "--config" => args.config = Some(value("--config")?),
            "--policy" => args.policy = Some(parse_policy(&value("--policy")?)?),
            "--now" => args.now = Some(parse_time("--now", &value("--now")?)?),
            "--until" => args.until = Some(parse_time("--until", &value("--until")?)?),
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            target => args.targets.push(
                target
                    .parse::<TargetSpec>()
                    .with_context(|| format!("invalid target '{}'", target))?,
            ),
        }
    }

    if args.targets.is_empty() {
        bail!("usage: atlas-schedule [--config PATH] [--policy P] [--now T] [--until T] TARGET...");
    }
    Ok(args)
}

/// Dedicated exit status for errors caused by the queue contents.
fn exit_code(err: &SchedulerError) -> Option<i32> {
    err.is_input_error().then_some(EXIT_BAD_QUEUE)
}

#[derive(Serialize)]
struct Output<'a> {
    primary_target: &'a str,
    /// Seconds until the optimal observation, -1 when not observable tonight
    wait: i64,
    night: &'a NightWindow,
    samples: &'a [TargetSample],
}

impl<'a> From<&'a ScheduleResult> for Output<'a> {
    fn from(result: &'a ScheduleResult) -> Self {
        Self {
            primary_target: &result.primary_target,
            wait: result.wait.as_legacy_seconds(),
            night: &result.night,
            samples: &result.samples,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = parse_args(env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => SchedulerConfig::from_file(path),
        None => SchedulerConfig::from_default_location(),
    }
    .context("Failed to load scheduler configuration")?;

    let mut scheduler = Scheduler::from_config(&config).context("Invalid scheduler configuration")?;
    if let Some(policy) = args.policy {
        scheduler.settings_mut().policy = policy;
    }

    let now = args.now.unwrap_or_else(Utc::now);
    info!(
        "Scheduling {} target(s) from {} at {}",
        args.targets.len(),
        scheduler.settings().site.name.as_deref().unwrap_or("unnamed site"),
        now
    );

    let result = match scheduler.schedule_until(&args.targets, now, args.until) {
        Ok(result) => result,
        Err(e) => {
            if let Some(code) = exit_code(&e) {
                error!("Rejected target queue: {}", e);
                std::process::exit(code);
            }
            return Err(e).context("Scheduling failed");
        }
    };

    println!("{}", serde_json::to_string_pretty(&Output::from(&result))?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_full() {
        let args = parse_args(strings(&[
            "--config",
            "site.toml",
            "--policy",
            "observable_only",
            "--now",
            "2026-01-15T00:00:00Z",
            "M31",
            "Trapezium=05:35:16.3,-05:23:23",
        ]))
        .unwrap();

        assert_eq!(args.config.as_deref(), Some("site.toml"));
        assert_eq!(args.policy, Some(SelectionPolicy::ObservableOnly));
        assert_eq!(args.now.unwrap().to_rfc3339(), "2026-01-15T00:00:00+00:00");
        assert!(args.until.is_none());
        assert_eq!(args.targets.len(), 2);
        assert_eq!(args.targets[1].identifier(), "Trapezium");
    }

    #[test]
    fn test_exit_code_separates_queue_errors() {
        assert_eq!(exit_code(&SchedulerError::EmptyTargetList), Some(EXIT_BAD_QUEUE));
        assert_eq!(
            exit_code(&SchedulerError::resolution("Planet Nine", "not in local catalog")),
            Some(EXIT_BAD_QUEUE)
        );
        assert_eq!(exit_code(&SchedulerError::Configuration("bad".into())), None);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(strings(&[])).is_err());
        assert!(parse_args(strings(&["--policy", "random", "M31"])).is_err());
        assert!(parse_args(strings(&["--now", "yesterday", "M31"])).is_err());
        assert!(parse_args(strings(&["--verbose", "M31"])).is_err());
        assert!(parse_args(strings(&["M31", "--config"])).is_err());
    }
}
