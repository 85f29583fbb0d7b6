//! Command-line argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

/// Driftwatch check - alerts when a metric drifts from its prediction.
///
/// The check asks the engine to forecast what each metric should
/// currently be from repeating historical periods, compares the smoothed
/// live measurement against the forecast, and alerts when the gap
/// exceeds the configured multiple of the historical standard deviation.
#[derive(Parser, Debug, Clone)]
#[command(name = "drift-check")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Host whose perfdata to query.
    #[arg(short = 'H', long)]
    pub host: String,

    /// Perfdata root directory.
    #[arg(long, env = "DRIFTWATCH_PERFDATA", default_value = "/var/perfdata")]
    pub path: PathBuf,

    /// Service whose descriptor to read.
    #[arg(long, default_value = "Interface_1")]
    pub service: String,

    /// Logical metric name to check (repeatable).
    #[arg(long = "metric", default_value = "out")]
    pub metrics: Vec<String>,

    /// Consolidation function for raw series extraction (avg, min, max).
    #[arg(long, default_value = "avg")]
    pub consolidation: String,

    /// Sigma multiples of deviation before WARNING - higher is less
    /// sensitive.
    #[arg(short = 'w', long, default_value_t = 1.0)]
    pub warn: f64,

    /// Sigma multiples of deviation before CRITICAL - higher is less
    /// sensitive.
    #[arg(short = 'c', long, default_value_t = 2.0)]
    pub crit: f64,

    /// Sample time in engine time format (e.g. `now`, an epoch).
    #[arg(long, default_value = "now")]
    pub sample_time: String,

    /// Query span start, relative to the sample time.
    #[arg(long, default_value = "end-6w")]
    pub lookback: String,

    /// Number of historical periods to sample (negative looks backward).
    #[arg(long, default_value_t = -5, allow_hyphen_values = true)]
    pub sample_count: i32,

    /// Seconds between historical periods.
    #[arg(long, default_value_t = 604_800)]
    pub sample_interval: u32,

    /// Size of the sample window in seconds.
    #[arg(long, default_value_t = 1800)]
    pub sample_window: u32,

    /// Engine program to invoke.
    #[arg(long, env = "DRIFTWATCH_ENGINE", default_value = "rrdtool")]
    pub engine: PathBuf,

    /// Scratch graph artifact path. Defaults under the system temp
    /// directory; the file is a side effect of the engine's invocation
    /// mode and is never read back.
    #[arg(long)]
    pub scratch_file: Option<PathBuf>,

    /// Also report the smoothed, predicted and sigma values.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The scratch artifact path, derived from the host name when not
    /// given explicitly.
    #[must_use]
    pub fn scratch_file(&self) -> PathBuf {
        self.scratch_file.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("driftwatch-{}.png", self.host))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // Test that the CLI can be constructed and help works
    #[test]
    fn cli_help_does_not_panic() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_minimal_invocation_uses_defaults() {
        let cli = Cli::parse_from(["drift-check", "-H", "host1"]);
        assert_eq!(cli.host, "host1");
        assert_eq!(cli.service, "Interface_1");
        assert_eq!(cli.metrics, vec!["out"]);
        assert_eq!(cli.consolidation, "avg");
        assert!((cli.warn - 1.0).abs() < f64::EPSILON);
        assert!((cli.crit - 2.0).abs() < f64::EPSILON);
        assert_eq!(cli.sample_time, "now");
        assert_eq!(cli.lookback, "end-6w");
        assert_eq!(cli.sample_count, -5);
        assert_eq!(cli.sample_interval, 604_800);
        assert_eq!(cli.sample_window, 1800);
        assert_eq!(cli.engine, PathBuf::from("rrdtool"));
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_repeated_metrics() {
        let cli = Cli::parse_from([
            "drift-check",
            "-H",
            "host1",
            "--metric",
            "out",
            "--metric",
            "in",
        ]);
        assert_eq!(cli.metrics, vec!["out", "in"]);
    }

    #[test]
    fn parse_thresholds_short_flags() {
        let cli = Cli::parse_from(["drift-check", "-H", "host1", "-w", "2", "-c", "3"]);
        assert!((cli.warn - 2.0).abs() < f64::EPSILON);
        assert!((cli.crit - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_negative_sample_count() {
        let cli = Cli::parse_from(["drift-check", "-H", "host1", "--sample-count", "-8"]);
        assert_eq!(cli.sample_count, -8);
    }

    #[test]
    fn parse_engine_and_scratch_overrides() {
        let cli = Cli::parse_from([
            "drift-check",
            "-H",
            "host1",
            "--engine",
            "/opt/rrdtool/bin/rrdtool",
            "--scratch-file",
            "/tmp/custom.png",
        ]);
        assert_eq!(cli.engine, PathBuf::from("/opt/rrdtool/bin/rrdtool"));
        assert_eq!(cli.scratch_file(), PathBuf::from("/tmp/custom.png"));
    }

    #[test]
    fn scratch_file_defaults_under_temp_dir() {
        let cli = Cli::parse_from(["drift-check", "-H", "host1"]);
        let scratch = cli.scratch_file();
        assert!(scratch.starts_with(std::env::temp_dir()));
        assert!(
            scratch
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains("host1"))
        );
    }

    #[test]
    fn parse_verbose_flag() {
        let cli = Cli::parse_from(["drift-check", "-H", "host1", "-v"]);
        assert!(cli.verbose);
    }
}
