//! Predictive deviation check plugin for RRD-backed monitoring.
//!
//! The check reads the perfdata descriptor for a (host, service) pair,
//! asks the engine to forecast what each requested metric should
//! currently be from repeating historical periods, and compares the
//! smoothed live measurement against the forecast. A deviation beyond
//! the configured sigma multiples raises WARNING or CRITICAL; engine or
//! descriptor failures surface as UNKNOWN, never as a silent OK.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod error;
pub mod probe;
pub mod report;
pub mod status;

pub use cli::Cli;
pub use error::CheckError;
pub use probe::{MetricReport, ProbeConfig};
pub use report::{evaluate, CheckReport};
pub use status::CheckStatus;
