//! scandex indexer: turns a directory of scans into a JSON index.
//!
//! # Module Structure
//!
//! - [`error`]: domain error type (`IndexerError`)
//! - [`config`]: indexer settings (`IndexerConfig`, builder)
//! - [`enumerate`]: one-level directory listing (`list_scan_dirs`, `list_entries`)
//! - [`sidecar`]: `.json` sidecar lookup (`load_parameters`, `SidecarOutcome`)
//! - [`scan`]: per-scan record building (`index_scan_dir`)
//! - [`types`]: document model (`ExperimentEntry`, `ScanRecord`, `IndexDocument`, `IndexSummary`)
//! - [`indexer`]: orchestrator (`Indexer`)
//!
//! # Architecture
//!
//! ```text
//! root --> list_scan_dirs --> index_scan_dir --+--> flesh file
//!                                              |
//!                                              +--> experiments --> load_parameters
//!                                              |
//!                                         ScanRecord
//!                                              |
//!                                        IndexDocument --> <root>/index.json
//! ```

pub mod config;
pub mod enumerate;
pub mod error;
pub mod indexer;
pub mod scan;
pub mod sidecar;
pub mod types;

// --- Public API Re-exports ---

pub use config::{IndexerConfig, IndexerConfigBuilder};
pub use error::IndexerError;
pub use indexer::Indexer;
pub use scan::index_scan_dir;
pub use sidecar::{AbsentReason, SidecarOutcome, load_parameters};
pub use types::{ExperimentEntry, IndexDocument, IndexSummary, ScanRecord};
