//! Index document types
//!
//! The written index is a JSON array with one single-key object per scan:
//!
//! ```text
//! [
//!     { "<scan name>": { "flesh": "<path>", "experiments": [ { "data": "<path>", "parameters": <value|null> } ] } }
//! ]
//! ```
//!
//! [`ScanRecord`] keeps the scan name as a field and (de)serializes it as
//! that single map key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::IndexerError;

/// One experiment file and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentEntry {
    /// Absolute path of the experiment file
    pub data: PathBuf,
    /// Parsed sidecar, `null` when none could be loaded
    pub parameters: Option<Value>,
}

/// Everything indexed for one scan directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    /// Base name of the scan directory
    pub name: String,
    /// Absolute path of the flesh image
    pub flesh: PathBuf,
    /// Experiment entries in listing order
    pub experiments: Vec<ExperimentEntry>,
}

impl ScanRecord {
    /// Number of experiments with a loaded sidecar.
    pub fn parameterized_count(&self) -> usize {
        self.experiments
            .iter()
            .filter(|e| e.parameters.is_some())
            .count()
    }
}

#[derive(Serialize)]
struct ScanBodyRef<'a> {
    flesh: &'a Path,
    experiments: &'a [ExperimentEntry],
}

#[derive(Deserialize)]
struct ScanBody {
    flesh: PathBuf,
    experiments: Vec<ExperimentEntry>,
}

impl Serialize for ScanRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.name,
            &ScanBodyRef {
                flesh: &self.flesh,
                experiments: &self.experiments,
            },
        )?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScanRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, ScanBody>::deserialize(deserializer)?;
        let len = map.len();
        let mut entries = map.into_iter();
        match (entries.next(), entries.next()) {
            (Some((name, body)), None) => Ok(Self {
                name,
                flesh: body.flesh,
                experiments: body.experiments,
            }),
            _ => Err(de::Error::invalid_length(len, &"exactly one scan name")),
        }
    }
}

/// The whole index: one record per scan directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexDocument {
    pub scans: Vec<ScanRecord>,
}

impl IndexDocument {
    pub fn new(scans: Vec<ScanRecord>) -> Self {
        Self { scans }
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// Scan names in document order.
    pub fn scan_names(&self) -> impl Iterator<Item = &str> {
        self.scans.iter().map(|s| s.name.as_str())
    }

    /// Total experiments across all scans.
    pub fn experiment_count(&self) -> usize {
        self.scans.iter().map(|s| s.experiments.len()).sum()
    }

    /// Serializes with `indent` spaces per level and no trailing newline.
    pub fn to_json_vec(&self, indent: usize) -> Result<Vec<u8>, IndexerError> {
        let indent = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Same as [`to_json_vec`](Self::to_json_vec), as a `String`.
    pub fn to_json_string(&self, indent: usize) -> Result<String, IndexerError> {
        let bytes = self.to_json_vec(indent)?;
        String::from_utf8(bytes)
            .map_err(|e| IndexerError::Serialize(serde::ser::Error::custom(e)))
    }

    /// Writes the document to `path`, replacing any existing file.
    ///
    /// The write is a plain overwrite, not an atomic rename.
    pub fn write_to(&self, path: &Path, indent: usize) -> Result<(), IndexerError> {
        let bytes = self.to_json_vec(indent)?;
        std::fs::write(path, bytes).map_err(|e| IndexerError::io(path, e))
    }

    /// Parses a previously written index.
    pub fn from_json_str(s: &str) -> Result<Self, IndexerError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Counts reported after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    /// Absolute root directory
    pub root: PathBuf,
    /// Where the index was written; `None` for dry runs
    pub output: Option<PathBuf>,
    /// Scans present in the document
    pub scans_indexed: usize,
    /// Scan directories left out because they had no flesh file
    pub scans_skipped: Vec<String>,
    /// Experiments across all scans
    pub experiments: usize,
    /// Experiments whose sidecar was loaded
    pub experiments_with_parameters: usize,
}
