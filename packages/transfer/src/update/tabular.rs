//! Workbook sources.
//!
//! The first row of the sheet names the columns. Each later row supplies a
//! base path, a parameter name and a value; the target path is
//! `base/parameter`.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::{Assignment, UpdateSource};
use crate::TransferError;

pub const DEFAULT_SHEET: &str = "Sheet1";
pub const DEFAULT_PATH_COLUMN: &str = "路径";
pub const DEFAULT_PARAM_COLUMN: &str = "参数";
pub const DEFAULT_VALUE_COLUMN: &str = "华为云压测环境";

/// Where to find the data in a workbook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Columns {
    pub sheet: String,
    /// Header of the column holding the base path.
    pub base_path: String,
    /// Header of the column holding the parameter (leaf node) name.
    pub parameter: String,
    /// Header of the column holding the value to write.
    pub value: String,
}

impl Default for Columns {
    fn default() -> Self {
        Columns {
            sheet: DEFAULT_SHEET.to_string(),
            base_path: DEFAULT_PATH_COLUMN.to_string(),
            parameter: DEFAULT_PARAM_COLUMN.to_string(),
            value: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

pub fn read_workbook(path: &Path, columns: &Columns) -> Result<UpdateSource, TransferError> {
    let workbook_error = |message: String| TransferError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let range = workbook
        .worksheet_range(&columns.sheet)
        .map_err(|e| workbook_error(format!("sheet {:?}: {}", columns.sheet, e)))?;

    let rows: Vec<Vec<String>> = range.rows().map(row_cells).collect();
    tabular_source(&rows, columns)
}

// Trailing empty cells are dropped so that a row which stops early reads
// as short.
fn row_cells(row: &[Data]) -> Vec<String> {
    let used = row
        .iter()
        .rposition(|cell| !matches!(cell, Data::Empty))
        .map_or(0, |last| last + 1);
    row[..used].iter().map(|cell| cell.to_string()).collect()
}

/// Turn header + data rows into assignments.
///
/// Fails if there is no data row or a required header is missing. Rows too
/// short to hold every required column are rejected; all cells are trimmed.
pub fn tabular_source(
    rows: &[Vec<String>],
    columns: &Columns,
) -> Result<UpdateSource, TransferError> {
    if rows.len() < 2 {
        return Err(TransferError::EmptySheet {
            sheet: columns.sheet.clone(),
        });
    }

    let header: HashMap<&str, usize> = rows[0]
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .collect();
    let index_of = |column: &str| {
        header
            .get(column)
            .copied()
            .ok_or_else(|| TransferError::MissingColumn {
                column: column.to_string(),
            })
    };
    let base_index = index_of(&columns.base_path)?;
    let param_index = index_of(&columns.parameter)?;
    let value_index = index_of(&columns.value)?;
    let width = base_index.max(param_index).max(value_index) + 1;

    let mut source = UpdateSource::default();
    for (offset, row) in rows[1..].iter().enumerate() {
        // 1-based sheet row number, counting the header.
        let row_number = offset + 2;
        if row.len() < width {
            log::warn!("row {} has {} cells, needs {}", row_number, row.len(), width);
            source.rejected.push(format!("row {}", row_number));
            continue;
        }

        let base = row[base_index].trim();
        let parameter = row[param_index].trim();
        let value = row[value_index].trim();
        source
            .assignments
            .push(Assignment::new(format!("{}/{}", base, parameter), value));
    }

    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn derives_path_from_base_and_parameter() {
        let rows = rows(&[
            &["路径", "参数", "华为云压测环境"],
            &["/config/product/svc", "timeout", "30"],
        ]);

        let source = tabular_source(&rows, &Columns::default()).unwrap();
        assert_eq!(
            source.assignments,
            vec![Assignment::new("/config/product/svc/timeout", "30")]
        );
        assert!(source.rejected.is_empty());
    }

    #[test]
    fn trims_headers_and_cells() {
        let rows = rows(&[
            &[" 参数 ", "路径\t", "华为云压测环境"],
            &["  retries ", " /config/product/svc  ", " 3 "],
        ]);

        let source = tabular_source(&rows, &Columns::default()).unwrap();
        assert_eq!(
            source.assignments,
            vec![Assignment::new("/config/product/svc/retries", "3")]
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let rows = rows(&[
            &["说明", "路径", "参数", "生产环境", "华为云压测环境"],
            &["note", "/config/product/db", "pool", "100", "20"],
        ]);

        let source = tabular_source(&rows, &Columns::default()).unwrap();
        assert_eq!(
            source.assignments,
            vec![Assignment::new("/config/product/db/pool", "20")]
        );
    }

    #[test]
    fn short_rows_are_rejected() {
        let rows = rows(&[
            &["路径", "参数", "华为云压测环境"],
            &["/config/product/svc", "timeout"],
            &["/config/product/svc", "retries", "3"],
        ]);

        let source = tabular_source(&rows, &Columns::default()).unwrap();
        assert_eq!(source.assignments.len(), 1);
        assert_eq!(source.rejected, vec!["row 2".to_string()]);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let rows = rows(&[&["路径", "参数"], &["/config/product/svc", "timeout"]]);

        let result = tabular_source(&rows, &Columns::default());
        assert!(matches!(
            result,
            Err(TransferError::MissingColumn { column }) if column == DEFAULT_VALUE_COLUMN
        ));
    }

    #[test]
    fn header_only_sheet_is_fatal() {
        let rows = rows(&[&["路径", "参数", "华为云压测环境"]]);
        assert!(matches!(
            tabular_source(&rows, &Columns::default()),
            Err(TransferError::EmptySheet { .. })
        ));
        assert!(matches!(
            tabular_source(&[], &Columns::default()),
            Err(TransferError::EmptySheet { .. })
        ));
    }

    #[test]
    fn custom_column_names() {
        let columns = Columns {
            sheet: "Values".to_string(),
            base_path: "path".to_string(),
            parameter: "key".to_string(),
            value: "staging".to_string(),
        };
        let rows = rows(&[
            &["path", "key", "staging"],
            &["/config/product/cache", "ttl", "60"],
        ]);

        let source = tabular_source(&rows, &columns).unwrap();
        assert_eq!(source.assignments[0].path, "/config/product/cache/ttl");
    }

    #[test]
    fn row_cells_drop_trailing_empties() {
        let row = [
            Data::String("a".to_string()),
            Data::Empty,
            Data::Float(30.0),
            Data::Empty,
            Data::Empty,
        ];
        assert_eq!(row_cells(&row), vec!["a", "", "30"]);
        assert!(row_cells(&[Data::Empty]).is_empty());
    }
}
