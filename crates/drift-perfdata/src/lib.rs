//! Perfdata descriptor parsing and metric catalogs for Driftwatch checks.
//!
//! Monitoring services record where each performance data series is
//! archived in a per-(host, service) XML descriptor. This crate reads
//! that descriptor and exposes it as an ordered [`MetricCatalog`] mapping
//! logical metric names to physical series locations (archive file path
//! plus data-source slot), which the check hands to the query builder.
//!
//! ```
//! use drift_perfdata::MetricCatalog;
//! use std::path::Path;
//!
//! let xml = r"
//!     <NAGIOS>
//!       <DATASOURCE>
//!         <RRDFILE>/perf/host1/Interface_1_out.rrd</RRDFILE>
//!         <DS>1</DS>
//!         <NAME>out</NAME>
//!       </DATASOURCE>
//!     </NAGIOS>";
//!
//! let catalog = MetricCatalog::from_xml_str(xml, Path::new("<inline>"))?;
//! let out = catalog.find_all("out");
//! assert_eq!(out.len(), 1);
//! assert_eq!(out[0].location.ds_index, 1);
//! # Ok::<(), drift_perfdata::PerfdataError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod descriptor;
pub mod error;

pub use catalog::{descriptor_path, MetricCatalog, MetricSeries, SeriesLocation};
pub use descriptor::{Datasource, Descriptor};
pub use error::{PerfdataError, Result};
