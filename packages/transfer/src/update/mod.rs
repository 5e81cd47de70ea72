//! Bulk updates from a workbook or a flat JSON map.
//!
//! A source file is first reduced to a list of [`Assignment`]s (a raw path
//! string and the value to store there). [`update`] then filters them
//! through the scope and upserts what is left.

use std::path::Path;

use zktool_tree_store::TreeClient;

use crate::upsert::{apply, WritePolicy};
use crate::{Report, Scope, TransferError};

mod flat;
mod tabular;

pub use flat::{flat_source_from_str, read_flat};
pub use tabular::{
    read_workbook, tabular_source, Columns, DEFAULT_PARAM_COLUMN, DEFAULT_PATH_COLUMN,
    DEFAULT_SHEET, DEFAULT_VALUE_COLUMN,
};

/// A value to store at a path, as read from the source.
///
/// `path` is not validated yet; that happens in [`update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub path: String,
    pub value: String,
}

impl Assignment {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Assignment {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// Everything read from an update source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateSource {
    pub assignments: Vec<Assignment>,
    /// Descriptions of source rows that could not yield an assignment.
    pub rejected: Vec<String>,
}

impl UpdateSource {
    /// Read `path` according to `format`.
    pub fn load(
        path: &Path,
        format: SourceFormat,
        columns: &Columns,
    ) -> Result<Self, TransferError> {
        let source = match format {
            SourceFormat::Workbook => read_workbook(path, columns)?,
            SourceFormat::Json => read_flat(path)?,
        };
        log::info!(
            "read {} assignments from {} ({} rows rejected)",
            source.assignments.len(),
            path.display(),
            source.rejected.len()
        );
        Ok(source)
    }
}

/// The kinds of update source, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    /// A spreadsheet: `.xlsx`, `.xlsm`, `.xls` or `.ods`.
    Workbook,
    /// A JSON object of path to string value.
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, TransferError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xls" | "ods") => Ok(SourceFormat::Workbook),
            Some("json") => Ok(SourceFormat::Json),
            _ => Err(TransferError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Upsert every assignment whose path is valid and in scope.
///
/// Rejected source rows, invalid paths and out-of-scope paths are counted
/// as skipped. Store failures are recorded and do not stop the batch.
pub fn update<C: TreeClient + ?Sized>(
    client: &mut C,
    source: &UpdateSource,
    scope: &Scope,
    policy: WritePolicy,
    report: &mut Report,
) {
    log::info!(
        "updating {} assignments under {} ({})",
        source.assignments.len(),
        scope.root(),
        policy
    );

    for rejected in &source.rejected {
        report.skip(rejected, "unusable source row");
    }

    for assignment in &source.assignments {
        match scope.admit(&assignment.path) {
            Ok(Some(path)) => apply(client, path, assignment.value.clone(), policy, report),
            Ok(None) => report.skip(&assignment.path, "outside the configuration prefix"),
            Err(e) => {
                log::warn!("skipping {:?}: {}", assignment.path, e);
                report.skip(&assignment.path, "invalid node path");
            }
        }
    }
}
