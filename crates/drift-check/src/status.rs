//! Check result states and their monitoring-framework exit codes.

use std::fmt;

/// Outcome of a check, in the monitoring framework's vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CheckStatus {
    /// Everything within thresholds.
    #[default]
    Ok,
    /// Deviation at or above the warning threshold.
    Warning,
    /// Deviation at or above the critical threshold.
    Critical,
    /// The check could not produce a result.
    Unknown,
}

impl CheckStatus {
    /// Status label as the framework prints it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Process exit code the framework maps this status to.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    /// Alerting urgency used to combine per-metric statuses. A confirmed
    /// threshold breach outranks a warm-up gap on another metric.
    const fn rank(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Unknown => 1,
            Self::Warning => 2,
            Self::Critical => 3,
        }
    }

    /// The more urgent of two statuses.
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        if other.rank() > self.rank() { other } else { self }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
