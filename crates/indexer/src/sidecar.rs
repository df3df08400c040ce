//! Sidecar parameter loading
//!
//! An experiment file `name.tif` may come with `name.json` next to it. The
//! sidecar is parsed as an arbitrary JSON value and attached verbatim. Every
//! way of not getting a value is reported as [`SidecarOutcome::Absent`] with
//! a reason; nothing here returns an error.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

/// Why no parameters were attached to an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentReason {
    /// The data file name does not end in `.tif`, so no sidecar name can be derived
    NotTif,
    /// The derived sidecar does not exist
    NotFound,
    /// The sidecar exists but could not be read
    Unreadable,
    /// The sidecar exceeds the configured size limit
    TooLarge,
    /// The sidecar is not valid JSON
    Malformed,
}

impl fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotTif => write!(f, "not a .tif file"),
            Self::NotFound => write!(f, "no sidecar"),
            Self::Unreadable => write!(f, "sidecar unreadable"),
            Self::TooLarge => write!(f, "sidecar too large"),
            Self::Malformed => write!(f, "sidecar is not valid JSON"),
        }
    }
}

/// Result of looking up the parameters of one experiment file.
#[derive(Debug, Clone, PartialEq)]
pub enum SidecarOutcome {
    /// Parsed sidecar contents
    Loaded(Value),
    /// No parameters available
    Absent(AbsentReason),
}

impl SidecarOutcome {
    /// Returns `true` when a sidecar was parsed.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The parsed value, or `None` for every absent case.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Absent(_) => None,
        }
    }
}

/// Derives the sidecar path by replacing a trailing `.tif` with `.json`.
///
/// Returns `None` when the file name does not end in `.tif` or is not valid
/// UTF-8. The suffix match is case-sensitive.
pub fn sidecar_path(data_path: &Path) -> Option<PathBuf> {
    let name = data_path.file_name()?.to_str()?;
    let stem = name.strip_suffix(".tif")?;
    Some(data_path.with_file_name(format!("{stem}.json")))
}

/// Loads the parameters belonging to `data_path`.
///
/// Sidecars larger than `max_size` bytes are not read.
pub fn load_parameters(data_path: &Path, max_size: usize) -> SidecarOutcome {
    let Some(path) = sidecar_path(data_path) else {
        debug!(data = %data_path.display(), "no sidecar name for non-.tif entry");
        return SidecarOutcome::Absent(AbsentReason::NotTif);
    };

    let metadata = match std::fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(sidecar = %path.display(), "no sidecar found");
            return SidecarOutcome::Absent(AbsentReason::NotFound);
        }
        Err(e) => {
            warn!(sidecar = %path.display(), error = %e, "failed to read sidecar metadata");
            return SidecarOutcome::Absent(AbsentReason::Unreadable);
        }
    };

    if metadata.is_dir() {
        warn!(sidecar = %path.display(), "sidecar path is a directory");
        return SidecarOutcome::Absent(AbsentReason::Unreadable);
    }

    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if size > max_size {
        warn!(
            sidecar = %path.display(),
            size,
            max = max_size,
            "sidecar too large, ignoring"
        );
        return SidecarOutcome::Absent(AbsentReason::TooLarge);
    }

    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) => {
            warn!(sidecar = %path.display(), error = %e, "failed to read sidecar");
            return SidecarOutcome::Absent(AbsentReason::Unreadable);
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => SidecarOutcome::Loaded(value),
        Err(e) => {
            warn!(sidecar = %path.display(), error = %e, "sidecar is not valid JSON, ignoring");
            SidecarOutcome::Absent(AbsentReason::Malformed)
        }
    }
}
