//! Per-scan indexing
//!
//! Turns one scan directory into a [`ScanRecord`]: pick the flesh image,
//! drop anything JSON, attach sidecar parameters to the rest.

use std::path::Path;

use tracing::debug;

use crate::config::IndexerConfig;
use crate::enumerate::list_entries;
use crate::error::IndexerError;
use crate::sidecar::load_parameters;
use crate::types::{ExperimentEntry, ScanRecord};

/// Entries whose path contains this are never experiments.
pub const JSON_MARKER: &str = ".json";

/// Builds the record for one scan directory.
///
/// Matching is substring-based on the full entry path: the first entry
/// containing `config.flesh_pattern` becomes the flesh file and only that
/// entry is removed; every remaining entry containing [`JSON_MARKER`] is
/// dropped, sidecar or not. Subdirectories are listed like files.
///
/// # Errors
///
/// - [`IndexerError::Io`] when the directory cannot be listed
/// - [`IndexerError::MissingFlesh`] when no entry matches the flesh pattern
pub fn index_scan_dir(scan_dir: &Path, config: &IndexerConfig) -> Result<ScanRecord, IndexerError> {
    let mut entries = list_entries(scan_dir, config.sort_entries)?;

    let flesh_pos = entries
        .iter()
        .position(|path| path_contains(path, &config.flesh_pattern))
        .ok_or_else(|| IndexerError::MissingFlesh {
            scan: scan_dir.display().to_string(),
            pattern: config.flesh_pattern.clone(),
        })?;
    let flesh = entries.remove(flesh_pos);

    let experiments: Vec<ExperimentEntry> = entries
        .into_iter()
        .filter(|path| !path_contains(path, JSON_MARKER))
        .map(|data| {
            let parameters = load_parameters(&data, config.max_sidecar_size).into_value();
            ExperimentEntry { data, parameters }
        })
        .collect();

    let name = scan_name(scan_dir);
    debug!(
        scan = %name,
        flesh = %flesh.display(),
        experiments = experiments.len(),
        "indexed scan directory"
    );

    Ok(ScanRecord {
        name,
        flesh,
        experiments,
    })
}

/// Base name of the scan directory, used as the record key.
pub fn scan_name(scan_dir: &Path) -> String {
    scan_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| scan_dir.display().to_string())
}

fn path_contains(path: &Path, needle: &str) -> bool {
    path.to_string_lossy().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn sorted_config() -> IndexerConfig {
        IndexerConfig {
            sort_entries: true,
            ..IndexerConfig::default()
        }
    }

    fn scan_dir(root: &TempDir, name: &str, files: &[(&str, &str)]) -> std::path::PathBuf {
        let dir = root.path().join(name);
        fs::create_dir(&dir).unwrap();
        for (file, content) in files {
            fs::write(dir.join(file), content).unwrap();
        }
        dir
    }

    #[test]
    fn attaches_sidecar_parameters() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(
            &root,
            "scan_01",
            &[("flesh.tif", ""), ("a.tif", ""), ("a.json", r#"{"k":1}"#)],
        );

        let record = index_scan_dir(&dir, &sorted_config()).unwrap();
        assert_eq!(record.name, "scan_01");
        assert_eq!(record.flesh, dir.join("flesh.tif"));
        assert_eq!(
            record.experiments,
            vec![ExperimentEntry {
                data: dir.join("a.tif"),
                parameters: Some(json!({"k": 1})),
            }]
        );
    }

    #[test]
    fn experiment_without_sidecar_has_null_parameters() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(&root, "scan_02", &[("flesh.tif", ""), ("b.tif", "")]);

        let record = index_scan_dir(&dir, &sorted_config()).unwrap();
        assert_eq!(record.experiments.len(), 1);
        assert_eq!(record.experiments[0].data, dir.join("b.tif"));
        assert_eq!(record.experiments[0].parameters, None);
    }

    #[test]
    fn standalone_json_is_never_an_experiment() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(
            &root,
            "scan_03",
            &[("flesh.tif", ""), ("notes.json", r#"{"note": true}"#)],
        );

        let record = index_scan_dir(&dir, &sorted_config()).unwrap();
        assert!(record.experiments.is_empty());
    }

    #[test]
    fn entries_containing_json_anywhere_are_dropped() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(
            &root,
            "scan_04",
            &[("flesh.tif", ""), ("export.json.tif", ""), ("c.tif", "")],
        );

        let record = index_scan_dir(&dir, &sorted_config()).unwrap();
        let data: Vec<_> = record.experiments.iter().map(|e| e.data.clone()).collect();
        assert_eq!(data, vec![dir.join("c.tif")]);
    }

    #[test]
    fn missing_flesh_is_an_error() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(&root, "scan_05", &[("a.tif", "")]);

        let err = index_scan_dir(&dir, &sorted_config()).unwrap_err();
        assert!(matches!(err, IndexerError::MissingFlesh { ref scan, .. } if scan.contains("scan_05")));
    }

    #[test]
    fn only_first_flesh_match_is_removed() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(
            &root,
            "scan_06",
            &[("flesh.tif", ""), ("flesh.tif.bak", "")],
        );

        let record = index_scan_dir(&dir, &sorted_config()).unwrap();
        assert_eq!(record.flesh, dir.join("flesh.tif"));
        assert_eq!(record.experiments.len(), 1);
        assert_eq!(record.experiments[0].data, dir.join("flesh.tif.bak"));
        assert_eq!(record.experiments[0].parameters, None);
    }

    #[test]
    fn flesh_match_is_substring_based() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(&root, "scan_07", &[("left_flesh.tif", ""), ("x.tif", "")]);

        let record = index_scan_dir(&dir, &sorted_config()).unwrap();
        assert_eq!(record.flesh, dir.join("left_flesh.tif"));
    }

    #[test]
    fn flesh_sidecar_is_not_attached_anywhere() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(
            &root,
            "scan_08",
            &[("flesh.tif", ""), ("flesh.json", r#"{"voxel": 0.5}"#)],
        );

        let record = index_scan_dir(&dir, &sorted_config()).unwrap();
        assert!(record.experiments.is_empty());
    }

    #[test]
    fn subdirectory_is_listed_as_experiment() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(&root, "scan_09", &[("flesh.tif", "")]);
        fs::create_dir(dir.join("raw")).unwrap();

        let record = index_scan_dir(&dir, &sorted_config()).unwrap();
        assert_eq!(
            record.experiments,
            vec![ExperimentEntry {
                data: dir.join("raw"),
                parameters: None,
            }]
        );
    }

    #[test]
    fn custom_flesh_pattern() {
        let root = TempDir::new().unwrap();
        let dir = scan_dir(&root, "scan_10", &[("bone.tif", ""), ("flesh.tif", "")]);
        let config = IndexerConfig {
            flesh_pattern: "bone.tif".to_owned(),
            ..sorted_config()
        };

        let record = index_scan_dir(&dir, &config).unwrap();
        assert_eq!(record.flesh, dir.join("bone.tif"));
        assert_eq!(record.experiments[0].data, dir.join("flesh.tif"));
    }

    #[test]
    fn scan_name_is_base_name() {
        assert_eq!(scan_name(Path::new("/data/root/scan_11")), "scan_11");
        assert_eq!(scan_name(Path::new("/")), "/");
    }
}
