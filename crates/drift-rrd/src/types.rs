//! Core types shared across the query builder and runner.

use crate::error::QueryError;
use std::fmt;
use std::str::FromStr;

/// Consolidation function applied when an archived series is down-sampled
/// to the query resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Consolidation {
    /// Arithmetic mean of the primary data points in each step.
    #[default]
    Average,
    /// Smallest primary data point in each step.
    Minimum,
    /// Largest primary data point in each step.
    Maximum,
}

impl Consolidation {
    /// Short form used in generated step names (e.g. `dsout_avg`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Average => "avg",
            Self::Minimum => "min",
            Self::Maximum => "max",
        }
    }

    /// Spelling the engine expects in a `DEF` directive.
    #[must_use]
    pub const fn as_engine_str(&self) -> &'static str {
        match self {
            Self::Average => "AVERAGE",
            Self::Minimum => "MINIMUM",
            Self::Maximum => "MAXIMUM",
        }
    }
}

impl fmt::Display for Consolidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Consolidation {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(Self::Average),
            "min" => Ok(Self::Minimum),
            "max" => Ok(Self::Maximum),
            other => Err(QueryError::UnknownConsolidation {
                value: other.to_string(),
            }),
        }
    }
}

/// The kind of calculation a named step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Raw series extraction (`DEF`).
    RawSeries,
    /// Left-associative sum over prior steps (`CDEF`).
    Aggregate,
    /// Moving-window trend smoothing (`CDEF` with `TRENDNAN`).
    Smooth,
    /// Statistical forecast of the expected value (`CDEF` with `PREDICT`).
    Predicted,
    /// Historical standard deviation of the forecast (`PREDICTSIGMA`).
    PredictedSigma,
    /// Scale-normalized anomaly score (guarded division `CDEF`).
    DeviationScore,
    /// Most-recent-value reduction of a series (`VDEF` with `LAST`).
    CurrentValue,
    /// Request to emit one parseable output line (`PRINT`).
    PrintRequest,
}

/// Name of a registered calculation step.
///
/// Values are only handed out by [`crate::QueryJob`] registration calls,
/// so any `StepName` in scope is guaranteed to refer to a step registered
/// earlier in some job. Expressions therefore cannot reference forward.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepName(String);

impl StepName {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The generated name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
