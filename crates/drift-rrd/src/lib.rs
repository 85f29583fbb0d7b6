//! RRD query construction and result reduction for Driftwatch checks.
//!
//! `drift-rrd` assembles chains of dependent calculation steps (raw
//! series extraction, aggregation, smoothing, statistical prediction,
//! deviation scoring) into one batch job in the engine's stack-based
//! expression language, runs the whole batch as a single `rrdtool graph`
//! subprocess invocation, and reduces its textual output back into typed
//! numeric results keyed by logical metric name.
//!
//! # Building a job
//!
//! ```
//! use drift_rrd::{Consolidation, QueryJob};
//! use std::path::Path;
//!
//! let mut job = QueryJob::new("/tmp/drift-scratch");
//! let series = job.define_series(
//!     Path::new("/perf/host/Interface_1_out.rrd"),
//!     1,
//!     "out",
//!     Consolidation::Average,
//! )?;
//! let smooth = job.define_smooth(&series, 1800)?;
//! let (pred, sigma) = job.define_prediction(&series, 604_800, -5, 1800)?;
//! let score = job.define_deviation(&smooth, &pred, &sigma)?;
//! let token = job.request_output(&score)?;
//! assert_eq!(token, "out_avg_smooth_diff");
//! # Ok::<(), drift_rrd::QueryError>(())
//! ```
//!
//! # Running it
//!
//! ```no_run
//! use drift_rrd::{Engine, QueryJob};
//!
//! # let job = QueryJob::new("/tmp/drift-scratch");
//! let results = Engine::new().run(job)?;
//! if let Some(score) = results.get("out_avg_smooth_diff") {
//!     println!("deviation: {score} sigma");
//! }
//! # Ok::<(), drift_rrd::QueryError>(())
//! ```
//!
//! Step names are pure functions of their inputs (metric name plus a
//! fixed operation suffix), so the reducer knows what to look for without
//! a side-channel registry. Duplicate names and references to unknown
//! steps are rejected at registration time, before any subprocess is
//! spawned.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod expr;
pub mod job;
pub mod reduce;
pub mod runner;
pub mod types;

pub use error::{QueryError, Result};
pub use expr::{RpnExpr, RpnOp};
pub use job::{NamedStep, QueryJob, PRINT_FORMAT};
pub use reduce::{
    discard_frame, reduce_lines, reduce_output, ResultMapping, LEADING_NON_DATA_LINES,
    TRAILING_NON_DATA_LINES,
};
pub use runner::{Engine, DEFAULT_PROGRAM};
pub use types::{Consolidation, StepKind, StepName};
