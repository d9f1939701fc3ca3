//! Spreadsheet files read through calamine.

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::error::SourceReadError;
use crate::grid::{CellValue, Grid, Workbook};

/// File extensions calamine can open.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlam", "xlsb", "xls", "xla", "ods"];

/// An opened spreadsheet file.
pub struct SpreadsheetFile {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl SpreadsheetFile {
    /// Open a workbook, detecting the container format from the extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceReadError> {
        let path = path.as_ref();
        if !is_supported(path) {
            return Err(SourceReadError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }

        let sheets = open_workbook_auto(path).map_err(|e| SourceReadError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!("Opened workbook {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }

    /// Path this workbook was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Workbook for SpreadsheetFile {
    type Sheet = SheetGrid;

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn sheet(&mut self, name: &str) -> Result<SheetGrid, SourceReadError> {
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| SourceReadError::Sheet {
                sheet: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(SheetGrid::new(range))
    }
}

/// Whether `path` has an extension calamine understands.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// A worksheet grid over a calamine range.
///
/// Coordinates are absolute: blank leading rows and columns still count, so
/// row 1 is always the first row of the sheet.
pub struct SheetGrid {
    range: Range<Data>,
}

impl SheetGrid {
    pub fn new(range: Range<Data>) -> Self {
        Self { range }
    }
}

impl Grid for SheetGrid {
    fn row_count(&self) -> usize {
        self.range.end().map(|(row, _)| row as usize + 1).unwrap_or(0)
    }

    fn column_count(&self) -> usize {
        self.range.end().map(|(_, col)| col as usize + 1).unwrap_or(0)
    }

    fn cell(&self, row: usize, col: usize) -> CellValue {
        if row == 0 || col == 0 {
            return CellValue::Empty;
        }
        let (Ok(row), Ok(col)) = (u32::try_from(row - 1), u32::try_from(col - 1)) else {
            return CellValue::Empty;
        };
        self.range
            .get_value((row, col))
            .map(to_cell_value)
            .unwrap_or_default()
    }
}

fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::String(text) if text.is_empty() => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => value
            .as_datetime()
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(value.as_f64())),
        Data::DateTimeIso(text) => parse_iso_datetime(text)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(text.clone())),
        Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(text)
        .map(|datetime| datetime.naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
