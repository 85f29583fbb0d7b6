//! Threshold evaluation and check output rendering.
//!
//! The deviation score is already scale-normalized (sigma units), so the
//! warning and critical thresholds apply uniformly to every metric. The
//! smoothed, predicted and sigma values are informational only.

use crate::probe::MetricReport;
use crate::status::CheckStatus;
use std::fmt::Write as _;

/// Evaluated outcome of one check invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Combined status over all metrics.
    pub status: CheckStatus,
    /// Human-readable summary fragment per metric.
    pub summary: String,
    /// Performance data in `label=value;warn;crit;min;` form.
    pub perfdata: String,
}

impl CheckReport {
    /// The single plugin output line the monitoring framework consumes.
    #[must_use]
    pub fn plugin_line(&self) -> String {
        format!("DRIFT {} - {} | {}", self.status, self.summary, self.perfdata)
    }
}

/// Status of a single metric's deviation score.
fn metric_status(score: Option<f64>, warn: f64, crit: f64) -> CheckStatus {
    match score {
        // A missing or non-finite score is a warm-up gap, not a breach.
        None => CheckStatus::Unknown,
        Some(s) if s.is_nan() => CheckStatus::Unknown,
        Some(s) if s >= crit => CheckStatus::Critical,
        Some(s) if s >= warn => CheckStatus::Warning,
        Some(_) => CheckStatus::Ok,
    }
}

/// Combines per-metric reports into the final check result.
#[must_use]
pub fn evaluate(reports: &[MetricReport], warn: f64, crit: f64) -> CheckReport {
    let mut status = CheckStatus::Ok;
    let mut fragments = Vec::with_capacity(reports.len());
    let mut perfdata = String::new();

    for report in reports {
        let metric_state = metric_status(report.score, warn, crit);
        status = status.worst(metric_state);

        match report.score {
            Some(score) if !score.is_nan() => {
                fragments.push(format!("{} deviates {:.2} sigma", report.metric, score));
                let _ = write!(
                    perfdata,
                    "{}_diff={:.2};{};{};0; ",
                    report.metric, score, warn, crit
                );
            }
            _ => {
                fragments.push(format!("{} has no data", report.metric));
                let _ = write!(perfdata, "{}_diff=U;{};{};0; ", report.metric, warn, crit);
            }
        }

        for (suffix, value) in [
            ("smooth", report.smoothed),
            ("pred", report.predicted),
            ("sigma", report.sigma),
        ] {
            if let Some(value) = value {
                let _ = write!(perfdata, "{}_{}={:.2} ", report.metric, suffix, value);
            }
        }
    }

    CheckReport {
        status,
        summary: fragments.join(", "),
        perfdata: perfdata.trim_end().to_string(),
    }
}
