//! Raw XML shapes of the perfdata descriptor file.
//!
//! One descriptor exists per (host, service) and declares, for every
//! performance data series the service produces, where it is stored and
//! which data-source slot inside the archive it occupies:
//!
//! ```xml
//! <NAGIOS>
//!   <DATASOURCE>
//!     <TEMPLATE>check_mk-lnx_if</TEMPLATE>
//!     <RRDFILE>/perf/host1/Interface_1_out.rrd</RRDFILE>
//!     <RRD_STORAGE_TYPE>SINGLE</RRD_STORAGE_TYPE>
//!     <DS>1</DS>
//!     <NAME>out</NAME>
//!     <LABEL>out</LABEL>
//!     <UNIT>B/s</UNIT>
//!   </DATASOURCE>
//! </NAGIOS>
//! ```
//!
//! Only the fields the check consumes are modeled; everything else in the
//! document is ignored.

use serde::Deserialize;
use std::path::PathBuf;

/// Root element of a perfdata descriptor document.
#[derive(Debug, Clone, Deserialize)]
pub struct Descriptor {
    /// Declared data sources, in document order.
    #[serde(rename = "DATASOURCE", default)]
    pub datasources: Vec<Datasource>,
}

/// One declared performance data series.
#[derive(Debug, Clone, Deserialize)]
pub struct Datasource {
    /// Logical metric name. Several data sources may share one name
    /// (e.g. the same counter across interfaces), in which case the
    /// check aggregates them.
    #[serde(rename = "NAME")]
    pub name: String,

    /// Path of the archive file holding the series.
    #[serde(rename = "RRDFILE")]
    pub rrd_file: PathBuf,

    /// Data-source slot inside the archive.
    #[serde(rename = "DS")]
    pub ds_index: u32,

    /// Display label, if distinct from the name.
    #[serde(rename = "LABEL", default)]
    pub label: Option<String>,

    /// Unit hint for presentation.
    #[serde(rename = "UNIT", default)]
    pub unit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r"
        <NAGIOS>
          <DATASOURCE>
            <TEMPLATE>check_mk-lnx_if</TEMPLATE>
            <RRDFILE>/perf/host1/Interface_1_out.rrd</RRDFILE>
            <RRD_STORAGE_TYPE>SINGLE</RRD_STORAGE_TYPE>
            <DS>1</DS>
            <NAME>out</NAME>
            <LABEL>out</LABEL>
            <UNIT>B/s</UNIT>
          </DATASOURCE>
          <NAGIOS_AUTH_HOSTNAME>host1</NAGIOS_AUTH_HOSTNAME>
        </NAGIOS>";

    #[test]
    fn parses_single_datasource() {
        let descriptor: Descriptor = quick_xml::de::from_str(SINGLE).expect("parse");
        assert_eq!(descriptor.datasources.len(), 1);
        let ds = &descriptor.datasources[0];
        assert_eq!(ds.name, "out");
        assert_eq!(ds.rrd_file, PathBuf::from("/perf/host1/Interface_1_out.rrd"));
        assert_eq!(ds.ds_index, 1);
        assert_eq!(ds.label.as_deref(), Some("out"));
        assert_eq!(ds.unit.as_deref(), Some("B/s"));
    }

    #[test]
    fn preserves_document_order() {
        let xml = r"
            <NAGIOS>
              <DATASOURCE>
                <RRDFILE>/perf/h/a.rrd</RRDFILE>
                <DS>3</DS>
                <NAME>in</NAME>
              </DATASOURCE>
              <DATASOURCE>
                <RRDFILE>/perf/h/b.rrd</RRDFILE>
                <DS>4</DS>
                <NAME>out</NAME>
              </DATASOURCE>
            </NAGIOS>";
        let descriptor: Descriptor = quick_xml::de::from_str(xml).expect("parse");
        let names: Vec<&str> = descriptor
            .datasources
            .iter()
            .map(|ds| ds.name.as_str())
            .collect();
        assert_eq!(names, vec!["in", "out"]);
    }

    #[test]
    fn optional_fields_default_to_none() {
        let xml = r"
            <NAGIOS>
              <DATASOURCE>
                <RRDFILE>/perf/h/a.rrd</RRDFILE>
                <DS>0</DS>
                <NAME>load</NAME>
              </DATASOURCE>
            </NAGIOS>";
        let descriptor: Descriptor = quick_xml::de::from_str(xml).expect("parse");
        let ds = &descriptor.datasources[0];
        assert!(ds.label.is_none());
        assert!(ds.unit.is_none());
    }

    #[test]
    fn missing_datasources_is_an_empty_list() {
        let descriptor: Descriptor =
            quick_xml::de::from_str("<NAGIOS></NAGIOS>").expect("parse");
        assert!(descriptor.datasources.is_empty());
    }

    #[test]
    fn garbage_fails_to_parse() {
        assert!(quick_xml::de::from_str::<Descriptor>("not xml at all").is_err());
    }
}
