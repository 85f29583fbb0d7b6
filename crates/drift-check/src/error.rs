//! Check-level error type.

use drift_perfdata::PerfdataError;
use drift_rrd::QueryError;
use std::fmt;

/// Errors that abort the whole check. Every variant maps to an UNKNOWN
/// check result - never silently to OK.
#[derive(Debug)]
pub enum CheckError {
    /// The perfdata descriptor could not be located, read or parsed, or
    /// a requested metric is not declared in it.
    Perfdata(PerfdataError),
    /// Query construction, engine invocation or output reduction failed.
    Query(QueryError),
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Perfdata(e) => write!(f, "perfdata error: {e}"),
            Self::Query(e) => write!(f, "query error: {e}"),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Perfdata(e) => Some(e),
            Self::Query(e) => Some(e),
        }
    }
}

impl From<PerfdataError> for CheckError {
    fn from(err: PerfdataError) -> Self {
        Self::Perfdata(err)
    }
}

impl From<QueryError> for CheckError {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}
