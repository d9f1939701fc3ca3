//! Horizontal field extraction.
//!
//! Each row is scanned left to right. A cell whose text matches the label
//! catalog opens a field; the next non-empty cell to its right closes it with
//! a value. If that next cell is itself a label, the open field is dropped and
//! the cell is examined again as the start of a new field.

mod catalog;
mod fields;
mod range;

pub use catalog::{normalize_label, LabelCatalog};
pub use fields::{apply_split_rules, FieldMap, SplitRule};
pub use range::{select_range, RowInterval};

use std::path::Path;

use tracing::{debug, info, trace};

use crate::error::{Result, SourceReadError};
use crate::grid::{CellValue, Grid, Workbook};
use crate::spreadsheet::SpreadsheetFile;

/// Pick the sheet to extract from.
///
/// Returns the first workbook sheet (in workbook order) that is listed in
/// `candidates`, falling back to the first sheet of the workbook.
pub fn select_sheet<'a, S: AsRef<str>>(names: &'a [String], candidates: &[S]) -> Option<&'a str> {
    names
        .iter()
        .find(|name| candidates.iter().any(|c| c.as_ref() == name.as_str()))
        .or_else(|| names.first())
        .map(String::as_str)
}

/// Extract fields from `workbook` with a freshly validated catalog.
pub fn extract<W, G, L, S>(
    workbook: &mut W,
    label_groups: G,
    sheet_candidates: &[S],
    boundary_condition: Option<&str>,
) -> Result<FieldMap>
where
    W: Workbook,
    G: IntoIterator<Item = L>,
    L: IntoIterator,
    L::Item: AsRef<str>,
    S: AsRef<str>,
{
    let catalog = LabelCatalog::new(label_groups)?;
    FieldExtractor::new(catalog)
        .with_boundary(boundary_condition.map(str::to_string))
        .extract_workbook(workbook, sheet_candidates)
}

/// Per-row scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState<'c> {
    SeekingLabel,
    SeekingValue(&'c str),
}

/// Column cursor over `1..=last`.
struct ColumnCursor {
    column: usize,
    last: usize,
}

impl ColumnCursor {
    fn new(last: usize) -> Self {
        Self { column: 1, last }
    }

    fn current(&self) -> Option<usize> {
        (self.column <= self.last).then_some(self.column)
    }

    fn advance(&mut self) {
        self.column += 1;
    }

    /// Step back one column so the next `advance` revisits the current cell.
    fn rewind(&mut self) {
        self.column -= 1;
    }
}

/// Label/value extractor over worksheet grids.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    catalog: LabelCatalog,
    boundary: Option<String>,
}

impl FieldExtractor {
    /// Create an extractor that scans whole sheets.
    pub fn new(catalog: LabelCatalog) -> Self {
        Self {
            catalog,
            boundary: None,
        }
    }

    /// Restrict scans to the block of rows introduced by `condition`.
    pub fn with_boundary(mut self, condition: Option<String>) -> Self {
        self.boundary = condition;
        self
    }

    pub fn catalog(&self) -> &LabelCatalog {
        &self.catalog
    }

    /// Rows that a scan of `grid` covers.
    pub fn interval<G: Grid + ?Sized>(&self, grid: &G) -> RowInterval {
        match &self.boundary {
            Some(condition) => select_range(grid, condition),
            None => RowInterval::whole(grid),
        }
    }

    /// Extract fields from one sheet-resolved grid.
    pub fn extract_grid<G: Grid + ?Sized>(&self, grid: &G) -> FieldMap {
        let interval = self.interval(grid);
        debug!("Scanning rows {:?}", interval);

        let mut fields = FieldMap::new();
        for row in interval.rows() {
            self.scan_row(grid, row, &mut fields);
        }
        fields
    }

    /// Select a sheet from `workbook` and extract fields from it.
    pub fn extract_workbook<W, S>(&self, workbook: &mut W, sheet_candidates: &[S]) -> Result<FieldMap>
    where
        W: Workbook,
        S: AsRef<str>,
    {
        let names = workbook.sheet_names();
        let sheet = select_sheet(&names, sheet_candidates).ok_or(SourceReadError::NoSheets)?;
        debug!("Using sheet '{}'", sheet);

        let grid = workbook.sheet(sheet)?;
        let fields = self.extract_grid(&grid);
        info!("Extracted {} fields from sheet '{}'", fields.len(), sheet);
        Ok(fields)
    }

    /// Open the spreadsheet at `path` and extract fields from it.
    pub fn extract_file<S: AsRef<str>>(&self, path: &Path, sheet_candidates: &[S]) -> Result<FieldMap> {
        let mut workbook = SpreadsheetFile::open(path)?;
        self.extract_workbook(&mut workbook, sheet_candidates)
    }

    fn label_of(&self, cell: &CellValue) -> Option<&str> {
        cell.as_text().and_then(|text| self.catalog.classify(text))
    }

    fn scan_row<G: Grid + ?Sized>(&self, grid: &G, row: usize, fields: &mut FieldMap) {
        let mut state = ScanState::SeekingLabel;
        let mut cursor = ColumnCursor::new(grid.column_count());

        while let Some(col) = cursor.current() {
            let cell = grid.cell(row, col);
            state = match state {
                ScanState::SeekingLabel => match self.label_of(&cell) {
                    Some(label) => ScanState::SeekingValue(label),
                    None => ScanState::SeekingLabel,
                },
                ScanState::SeekingValue(label) if cell.is_empty() => ScanState::SeekingValue(label),
                ScanState::SeekingValue(label) if self.label_of(&cell).is_some() => {
                    trace!("Label '{}' at row {} has no value", label, row);
                    cursor.rewind();
                    ScanState::SeekingLabel
                }
                ScanState::SeekingValue(label) => {
                    let value = match cell {
                        CellValue::Text(text) => CellValue::Text(text.trim().to_string()),
                        other => other,
                    };
                    trace!("Bound '{}' = {} at row {}", label, value, row);
                    fields.insert(label, value);
                    ScanState::SeekingLabel
                }
            };
            cursor.advance();
        }
    }
}
