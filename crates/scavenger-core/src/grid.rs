//! Read-only worksheet grids and workbooks.
//!
//! Rows and columns are 1-indexed, matching how spreadsheets address cells.
//! Any position outside the populated area reads as [`CellValue::Empty`].

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::SourceReadError;

/// A typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    /// Text content.
    Text(String),
    /// Numeric content (integers are stored as whole floats).
    Number(f64),
    /// Boolean content.
    Bool(bool),
    /// Date or date-time content.
    Date(NaiveDateTime),
    /// No value at this position.
    #[default]
    Empty,
}

impl CellValue {
    /// Whether the cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric content, if this is a number cell.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Self::Number(value) => write!(f, "{}", value),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Date(value) if value.time() == NaiveTime::MIN => {
                write!(f, "{}", value.format("%Y-%m-%d"))
            }
            Self::Date(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value.and_time(NaiveTime::MIN))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Empty)
    }
}

/// Read-only rectangular view of one worksheet.
pub trait Grid {
    /// Last populated row (1-indexed); zero for an empty sheet.
    fn row_count(&self) -> usize;

    /// Last populated column (1-indexed); zero for an empty sheet.
    fn column_count(&self) -> usize;

    /// Value at `(row, col)`, both 1-indexed.
    fn cell(&self, row: usize, col: usize) -> CellValue;
}

/// A named collection of sheets.
pub trait Workbook {
    /// Concrete grid type handed out for a sheet.
    type Sheet: Grid;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Load the sheet called `name`.
    fn sheet(&mut self, name: &str) -> Result<Self::Sheet, SourceReadError>;
}

/// Grid backed by row-major vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryGrid {
    rows: Vec<Vec<CellValue>>,
    columns: usize,
}

impl MemoryGrid {
    /// Build a grid from rows; ragged rows are padded with empty cells on read.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = CellValue>,
    {
        let rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, columns }
    }
}

impl Grid for MemoryGrid {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn cell(&self, row: usize, col: usize) -> CellValue {
        if row == 0 || col == 0 {
            return CellValue::Empty;
        }
        self.rows
            .get(row - 1)
            .and_then(|cells| cells.get(col - 1))
            .cloned()
            .unwrap_or_default()
    }
}

/// Workbook held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, MemoryGrid)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet after the existing ones.
    pub fn with_sheet(mut self, name: impl Into<String>, grid: MemoryGrid) -> Self {
        self.sheets.push((name.into(), grid));
        self
    }
}

impl Workbook for MemoryWorkbook {
    type Sheet = MemoryGrid;

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn sheet(&mut self, name: &str) -> Result<MemoryGrid, SourceReadError> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| SourceReadError::Sheet {
                sheet: name.to_string(),
                reason: "no such sheet".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_grid_is_one_indexed() {
        let grid = MemoryGrid::from_rows(vec![
            vec![CellValue::from("a"), CellValue::from(1i64)],
            vec![CellValue::from("b")],
        ]);

        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cell(1, 1), CellValue::from("a"));
        assert_eq!(grid.cell(1, 2), CellValue::Number(1.0));
        assert_eq!(grid.cell(2, 2), CellValue::Empty);
        assert_eq!(grid.cell(0, 1), CellValue::Empty);
        assert_eq!(grid.cell(3, 1), CellValue::Empty);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(30.0).to_string(), "30");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Empty.to_string(), "");
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(CellValue::from(date).to_string(), "2024-01-15");
    }

    #[test]
    fn test_memory_workbook_missing_sheet() {
        let mut workbook = MemoryWorkbook::new().with_sheet("one", MemoryGrid::default());
        assert_eq!(workbook.sheet_names(), vec!["one".to_string()]);
        assert!(workbook.sheet("two").is_err());
    }
}
