//! Ordered catalog of metric series declared by a descriptor.

use crate::descriptor::Descriptor;
use crate::error::{PerfdataError, Result};
use std::path::{Path, PathBuf};

/// Physical location of one series: archive file plus data-source slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesLocation {
    /// Path of the archive file.
    pub rrd_file: PathBuf,
    /// Data-source slot inside the archive.
    pub ds_index: u32,
}

/// One catalog entry: a logical metric name and where its data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSeries {
    /// Logical metric name.
    pub name: String,
    /// Physical series location.
    pub location: SeriesLocation,
}

/// Ordered mapping from logical metric names to series locations.
///
/// Several entries may share one logical name when a service exposes the
/// same counter across multiple sub-series; callers aggregate those.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    entries: Vec<MetricSeries>,
}

impl MetricCatalog {
    /// Loads and parses the descriptor at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PerfdataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_xml_str(&text, path)?;
        tracing::debug!(
            path = %path.display(),
            series = catalog.len(),
            "loaded perfdata descriptor"
        );
        Ok(catalog)
    }

    /// Parses descriptor XML; `origin` is used in diagnostics only.
    pub fn from_xml_str(xml: &str, origin: &Path) -> Result<Self> {
        let descriptor: Descriptor =
            quick_xml::de::from_str(xml).map_err(|e| PerfdataError::Parse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
        if descriptor.datasources.is_empty() {
            return Err(PerfdataError::EmptyDescriptor {
                path: origin.to_path_buf(),
            });
        }

        let entries = descriptor
            .datasources
            .into_iter()
            .map(|ds| MetricSeries {
                name: ds.name,
                location: SeriesLocation {
                    rrd_file: ds.rrd_file,
                    ds_index: ds.ds_index,
                },
            })
            .collect();
        Ok(Self { entries })
    }

    /// All series whose logical name equals `name`, in document order.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&MetricSeries> {
        self.entries
            .iter()
            .filter(|entry| entry.name == name)
            .collect()
    }

    /// Resolves each requested name to its series, preserving request
    /// order. Fails fast with [`PerfdataError::MetricNotFound`] on the
    /// first name the descriptor does not declare, before any engine
    /// work happens.
    pub fn select<'a, I>(&self, names: I) -> Result<Vec<(String, Vec<&MetricSeries>)>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selected = Vec::new();
        for name in names {
            let series = self.find_all(name);
            if series.is_empty() {
                return Err(PerfdataError::MetricNotFound {
                    name: name.to_string(),
                });
            }
            selected.push((name.to_string(), series));
        }
        Ok(selected)
    }

    /// All entries, in document order.
    #[must_use]
    pub fn entries(&self) -> &[MetricSeries] {
        &self.entries
    }

    /// Number of declared series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog declares no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Location of the descriptor for a (host, service) pair under the
/// perfdata root: `<root>/<host>/<service>.xml`. Characters the perfdata
/// writer does not allow in file names are replaced with underscores.
#[must_use]
pub fn descriptor_path(perfdata_root: &Path, host: &str, service: &str) -> PathBuf {
    perfdata_root
        .join(sanitize_component(host))
        .join(format!("{}.xml", sanitize_component(service)))
}

fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
