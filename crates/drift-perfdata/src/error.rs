//! Error types for perfdata descriptor handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for perfdata operations.
pub type Result<T> = std::result::Result<T, PerfdataError>;

/// Errors that can occur while locating or reading a perfdata descriptor.
#[derive(Debug, Error)]
pub enum PerfdataError {
    /// The descriptor file could not be read.
    #[error("cannot read descriptor {path}: {source}")]
    Io {
        /// Path of the descriptor file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The descriptor file is not valid descriptor XML.
    #[error("cannot parse descriptor {path}: {message}")]
    Parse {
        /// Path of the descriptor file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// The descriptor parsed but declares no data sources.
    #[error("descriptor {path} declares no data sources")]
    EmptyDescriptor {
        /// Path of the descriptor file.
        path: PathBuf,
    },

    /// A requested metric name is not present in the catalog.
    #[error("metric not found in descriptor: {name}")]
    MetricNotFound {
        /// The requested metric name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_io() {
        let err = PerfdataError::Io {
            path: PathBuf::from("/perf/host/Interface_1.xml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            err.to_string(),
            "cannot read descriptor /perf/host/Interface_1.xml: missing"
        );
    }

    #[test]
    fn error_display_parse() {
        let err = PerfdataError::Parse {
            path: PathBuf::from("/perf/host/Interface_1.xml"),
            message: "unexpected end of input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot parse descriptor /perf/host/Interface_1.xml: unexpected end of input"
        );
    }

    #[test]
    fn error_display_empty_descriptor() {
        let err = PerfdataError::EmptyDescriptor {
            path: PathBuf::from("/perf/host/Interface_1.xml"),
        };
        assert_eq!(
            err.to_string(),
            "descriptor /perf/host/Interface_1.xml declares no data sources"
        );
    }

    #[test]
    fn error_display_metric_not_found() {
        let err = PerfdataError::MetricNotFound {
            name: "out".to_string(),
        };
        assert_eq!(err.to_string(), "metric not found in descriptor: out");
    }
}
