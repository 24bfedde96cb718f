//! Collects per-title outcomes into the result table
//!
//! Outcomes arrive in completion order. A successful record is appended as a
//! whole row; a failure is logged and contributes nothing, so the columns stay
//! aligned no matter which titles fail.

#![allow(clippy::uninlined_format_args)]

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::{ListingReference, ResultTable};
use crate::infrastructure::extraction_error::ExtractionResult;
use crate::infrastructure::paths::{self, OutputError};

/// Counts of a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl AggregationReport {
    pub const fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Debug, Default)]
pub struct Aggregator {
    table: ResultTable,
    report: AggregationReport,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, reference: &ListingReference, outcome: ExtractionResult) {
        match outcome {
            Ok(record) => {
                debug!("✅ {} ({})", record, reference);
                self.table.push(record);
                self.report.succeeded += 1;
            }
            Err(e) => {
                warn!("Skipping {} [{}]: {}", reference, e.kind(), e);
                self.report.failed += 1;
            }
        }
    }

    pub const fn report(&self) -> AggregationReport {
        self.report
    }

    pub const fn table(&self) -> &ResultTable {
        &self.table
    }

    /// Writes the table to `<out_dir>/<sanitized term>.csv` and returns the path.
    ///
    /// `out_dir` is created when missing.
    pub fn persist(&self, out_dir: &Path, term: &str) -> Result<PathBuf, OutputError> {
        if self.table.is_empty() {
            warn!("No titles extracted for '{}'; writing header only", term);
        }

        std::fs::create_dir_all(out_dir).map_err(|source| OutputError::CreateDirectory {
            path: out_dir.to_path_buf(),
            source,
        })?;
        let path = paths::output_path(out_dir, term);
        paths::write_table(&self.table, &path)?;

        info!(
            "Aggregated {} of {} titles into {:?}",
            self.report.succeeded,
            self.report.total(),
            path
        );
        Ok(path)
    }
}
