//! Error types for query construction and execution.

use thiserror::Error;

/// Result type alias for RRD query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors that can occur while building or running a query job.
///
/// Build-time errors (`UnknownConsolidation`, `EmptyAggregate`,
/// `AlreadyDefined`, `UnknownReference`) fail before any subprocess is
/// spawned. Execution-time errors (`EngineSpawn`, `EngineExit`) fail the
/// whole batch: the steps of a job are interdependent, so partial results
/// are meaningless. `MalformedNumber` fails reduction of an otherwise
/// successful run because it signals an engine output-format mismatch.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A consolidation function other than avg/min/max was requested.
    #[error("unknown consolidation function: {value}")]
    UnknownConsolidation {
        /// The unrecognized input.
        value: String,
    },

    /// An aggregate was requested over zero input steps.
    #[error("aggregate '{name}' has no inputs")]
    EmptyAggregate {
        /// The name the aggregate would have been registered under.
        name: String,
    },

    /// A step with this name is already registered in the job.
    #[error("step already defined: {name}")]
    AlreadyDefined {
        /// The colliding step name.
        name: String,
    },

    /// An expression referenced a step name not registered in the job.
    #[error("unknown step reference: {name}")]
    UnknownReference {
        /// The unresolved step name.
        name: String,
    },

    /// The engine subprocess could not be started.
    #[error("failed to launch engine: {command}: {source}")]
    EngineSpawn {
        /// The command that was attempted.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The engine subprocess exited with a non-zero status.
    #[error("engine command '{command}' exited with code {exit_code}: {stderr}")]
    EngineExit {
        /// The command that was executed.
        command: String,
        /// Exit code reported by the subprocess (-1 if killed by signal).
        exit_code: i32,
        /// Captured standard error output.
        stderr: String,
    },

    /// A result line matched the output pattern but its value segment
    /// could not be parsed as a float.
    #[error("malformed number for token {token}: {value}")]
    MalformedNumber {
        /// The output token the line was keyed under.
        token: String,
        /// The unparseable value segment.
        value: String,
    },
}

impl QueryError {
    /// Returns `true` if this error was raised while building the job,
    /// before any subprocess was spawned.
    #[must_use]
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownConsolidation { .. }
                | Self::EmptyAggregate { .. }
                | Self::AlreadyDefined { .. }
                | Self::UnknownReference { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_consolidation() {
        let err = QueryError::UnknownConsolidation {
            value: "median".to_string(),
        };
        assert_eq!(err.to_string(), "unknown consolidation function: median");
    }

    #[test]
    fn error_display_empty_aggregate() {
        let err = QueryError::EmptyAggregate {
            name: "dsout_aggr".to_string(),
        };
        assert_eq!(err.to_string(), "aggregate 'dsout_aggr' has no inputs");
    }

    #[test]
    fn error_display_already_defined() {
        let err = QueryError::AlreadyDefined {
            name: "dsout_avg".to_string(),
        };
        assert_eq!(err.to_string(), "step already defined: dsout_avg");
    }

    #[test]
    fn error_display_unknown_reference() {
        let err = QueryError::UnknownReference {
            name: "dsmissing_avg".to_string(),
        };
        assert_eq!(err.to_string(), "unknown step reference: dsmissing_avg");
    }

    #[test]
    fn error_display_engine_exit() {
        let err = QueryError::EngineExit {
            command: "rrdtool graph /tmp/scratch".to_string(),
            exit_code: 1,
            stderr: "ERROR: opening rrd".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "engine command 'rrdtool graph /tmp/scratch' exited with code 1: ERROR: opening rrd"
        );
    }

    #[test]
    fn error_display_malformed_number() {
        let err = QueryError::MalformedNumber {
            token: "out_avg_diff".to_string(),
            value: "NOTANUMBER".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed number for token out_avg_diff: NOTANUMBER"
        );
    }

    #[test]
    fn engine_spawn_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = QueryError::EngineSpawn {
            command: "rrdtool graph".to_string(),
            source: io_err,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn build_error_classification() {
        assert!(
            QueryError::UnknownConsolidation {
                value: "x".to_string()
            }
            .is_build_error()
        );
        assert!(
            QueryError::AlreadyDefined {
                name: "x".to_string()
            }
            .is_build_error()
        );
        assert!(
            !QueryError::EngineExit {
                command: "rrdtool".to_string(),
                exit_code: 1,
                stderr: String::new(),
            }
            .is_build_error()
        );
        assert!(
            !QueryError::MalformedNumber {
                token: "t".to_string(),
                value: "v".to_string(),
            }
            .is_build_error()
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryError>();
    }
}
