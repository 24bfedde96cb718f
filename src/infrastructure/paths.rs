//! Working directories and output file naming

#![allow(clippy::uninlined_format_args)]

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ResultTable;
use crate::infrastructure::config::PathsConfig;

const FALLBACK_STEM: &str = "search";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create directory {path:?}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode CSV for {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Creates the output and logs directories when they are missing
pub fn ensure_directories(paths: &PathsConfig) -> Result<(), OutputError> {
    for dir in [&paths.out_dir, &paths.logs_dir] {
        std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;
        debug!("Directory ready: {:?}", dir);
    }
    Ok(())
}

/// Turns a user-supplied search term into a safe file stem.
///
/// Whitespace runs become a single `_`, anything outside ASCII
/// alphanumerics and `-_.` is dropped, and leading or trailing `_`/`.`
/// are trimmed. An empty result falls back to `search`.
pub fn sanitize_file_stem(term: &str) -> String {
    let mut stem = String::with_capacity(term.len());
    let mut in_whitespace = false;

    for c in term.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            stem.push(c);
        }
    }

    let trimmed = stem.trim_matches(|c| c == '_' || c == '.');
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<out_dir>/<sanitized term>.csv`
pub fn output_path(out_dir: &Path, term: &str) -> PathBuf {
    out_dir.join(format!("{}.csv", sanitize_file_stem(term)))
}

/// Writes the table to `path`, replacing any previous file
pub fn write_table(table: &ResultTable, path: &Path) -> Result<(), OutputError> {
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    table
        .write_csv(BufWriter::new(file))
        .map_err(|source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    info!("💾 Wrote {} rows to {:?}", table.len(), path);
    Ok(())
}
