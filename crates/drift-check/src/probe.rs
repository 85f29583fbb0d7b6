//! Per-metric chain registration and batch execution.
//!
//! For every requested metric the probe registers the full calculation
//! chain - raw series, optional aggregate, smoothing, prediction pair,
//! deviation score - in one job, runs the job once, and folds the reduced
//! mapping back into per-metric reports. The deviation score compares the
//! SMOOTHED measurement against the prediction so a transient drop or
//! glitch does not trip the thresholds.

use crate::cli::Cli;
use crate::error::CheckError;
use drift_perfdata::MetricCatalog;
use drift_rrd::{Consolidation, Engine, QueryJob, ResultMapping};
use std::path::PathBuf;

/// Probe parameters, decoupled from argument parsing.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Logical metric names to check.
    pub metrics: Vec<String>,
    /// Consolidation function for raw series extraction.
    pub consolidation: String,
    /// Query span start, relative to the sample time.
    pub lookback: String,
    /// Query span end (the sample time).
    pub sample_time: String,
    /// Number of historical periods (negative looks backward).
    pub sample_count: i32,
    /// Seconds between historical periods.
    pub sample_interval: u32,
    /// Sample window width in seconds.
    pub sample_window: u32,
    /// Scratch graph artifact path.
    pub scratch_file: PathBuf,
    /// Also request the smoothed, predicted and sigma values.
    pub verbose: bool,
}

impl ProbeConfig {
    /// Builds a probe configuration from parsed arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            metrics: cli.metrics.clone(),
            consolidation: cli.consolidation.clone(),
            lookback: cli.lookback.clone(),
            sample_time: cli.sample_time.clone(),
            sample_count: cli.sample_count,
            sample_interval: cli.sample_interval,
            sample_window: cli.sample_window,
            scratch_file: cli.scratch_file(),
            verbose: cli.verbose,
        }
    }
}

/// Reduced results for one metric. `None` values mean the engine did not
/// produce the token - a warm-up gap for that series, not a check
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReport {
    /// Logical metric name.
    pub metric: String,
    /// Deviation score in sigma units.
    pub score: Option<f64>,
    /// Smoothed current measurement (verbose only).
    pub smoothed: Option<f64>,
    /// Predicted value (verbose only).
    pub predicted: Option<f64>,
    /// Historical standard deviation (verbose only).
    pub sigma: Option<f64>,
}

/// Output tokens registered for one metric.
#[derive(Debug)]
struct MetricTokens {
    metric: String,
    score: String,
    smoothed: Option<String>,
    predicted: Option<String>,
    sigma: Option<String>,
}

/// Runs the probe: one batch job over all requested metrics.
pub fn run(
    catalog: &MetricCatalog,
    engine: &Engine,
    config: &ProbeConfig,
) -> Result<Vec<MetricReport>, CheckError> {
    let (job, tokens) = build_job(catalog, config)?;
    let results = engine.run(job)?;
    Ok(collect_reports(tokens, &results))
}

/// Registers every metric's calculation chain into a fresh job.
fn build_job(
    catalog: &MetricCatalog,
    config: &ProbeConfig,
) -> Result<(QueryJob, Vec<MetricTokens>), CheckError> {
    // Rejecting a bad consolidation here keeps the failure ahead of any
    // engine work.
    let consolidation: Consolidation = config.consolidation.parse()?;
    let selected = catalog.select(config.metrics.iter().map(String::as_str))?;

    let mut job = QueryJob::new(&config.scratch_file)
        .with_span(&config.lookback, &config.sample_time);
    let mut tokens = Vec::new();

    for (metric, series) in &selected {
        let working = if let [single] = series.as_slice() {
            job.define_series(
                &single.location.rrd_file,
                single.location.ds_index,
                metric,
                consolidation,
            )?
        } else {
            // Several physical series share this logical name; sum them.
            let mut parts = Vec::with_capacity(series.len());
            for (position, entry) in series.iter().enumerate() {
                parts.push(job.define_series(
                    &entry.location.rrd_file,
                    entry.location.ds_index,
                    &format!("{metric}{}", position + 1),
                    consolidation,
                )?);
            }
            job.define_aggregate(&format!("ds{metric}_aggr"), &parts)?
        };

        let smooth = job.define_smooth(&working, config.sample_window)?;
        let (pred, sigma) = job.define_prediction(
            &working,
            config.sample_interval,
            config.sample_count,
            config.sample_window,
        )?;
        let score = job.define_deviation(&smooth, &pred, &sigma)?;

        let score_token = job.request_output(&score)?;
        let (smoothed, predicted, sigma_token) = if config.verbose {
            (
                Some(job.request_output(&smooth)?),
                Some(job.request_output(&pred)?),
                Some(job.request_output(&sigma)?),
            )
        } else {
            (None, None, None)
        };

        tokens.push(MetricTokens {
            metric: metric.clone(),
            score: score_token,
            smoothed,
            predicted,
            sigma: sigma_token,
        });
    }

    Ok((job, tokens))
}

/// Folds the reduced mapping back into per-metric reports.
fn collect_reports(tokens: Vec<MetricTokens>, results: &ResultMapping) -> Vec<MetricReport> {
    tokens
        .into_iter()
        .map(|t| {
            let score = results.get(&t.score).copied();
            if score.is_none() {
                tracing::warn!(
                    metric = %t.metric,
                    token = %t.score,
                    "deviation score missing from engine output; metric temporarily unavailable"
                );
            }
            let lookup = |key: Option<String>| key.and_then(|k| results.get(&k).copied());
            MetricReport {
                metric: t.metric,
                score,
                smoothed: lookup(t.smoothed),
                predicted: lookup(t.predicted),
                sigma: lookup(t.sigma),
            }
        })
        .collect()
}
