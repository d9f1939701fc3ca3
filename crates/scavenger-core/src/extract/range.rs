//! Row interval selection from a boundary marker in the first column.

use std::ops::Range;

use crate::grid::Grid;

/// Rows to scan: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowInterval {
    pub start: usize,
    pub end: usize,
}

impl RowInterval {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Every row of the grid.
    pub fn whole<G: Grid + ?Sized>(grid: &G) -> Self {
        Self::new(1, grid.row_count() + 1)
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Locate the block of rows introduced by `condition` in column 1.
///
/// `start` is the first row whose column-1 text equals `condition` exactly
/// (row 1 when there is none). `end` is the next row after it whose column-1
/// cell holds anything at all, or the last row of the sheet. When the marker
/// is missing the search for `end` has nothing left to visit, so the result
/// is `(1, last_row)`.
pub fn select_range<G: Grid + ?Sized>(grid: &G, condition: &str) -> RowInterval {
    let last_row = grid.row_count();
    let mut start = 1;
    let mut end = last_row;
    let mut row = 0;

    while row < last_row {
        row += 1;
        if grid.cell(row, 1).as_text() == Some(condition) {
            start = row;
            break;
        }
    }

    while row < last_row {
        row += 1;
        if !grid.cell(row, 1).is_empty() {
            end = row;
            break;
        }
    }

    RowInterval::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellValue, MemoryGrid};

    fn column(values: &[Option<&str>]) -> MemoryGrid {
        MemoryGrid::from_rows(
            values
                .iter()
                .map(|value| vec![CellValue::from(*value), CellValue::from("x")]),
        )
    }

    #[test]
    fn test_end_is_next_non_empty_row() {
        let grid = column(&[Some("A"), Some("COND"), Some("B"), None, Some("C"), Some("D")]);
        assert_eq!(select_range(&grid, "COND"), RowInterval::new(2, 3));
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let grid = column(&[Some("A"), Some("COND"), None, None, Some("C"), Some("D")]);
        assert_eq!(select_range(&grid, "COND"), RowInterval::new(2, 5));
    }

    #[test]
    fn test_trailing_block_runs_to_last_row() {
        let grid = column(&[Some("A"), Some("COND"), None, None]);
        assert_eq!(select_range(&grid, "COND"), RowInterval::new(2, 4));
    }

    #[test]
    fn test_missing_marker_spans_to_last_row() {
        let grid = column(&[Some("A"), None, Some("B"), None, None]);
        assert_eq!(select_range(&grid, "COND"), RowInterval::new(1, 5));
    }

    #[test]
    fn test_marker_must_match_exactly() {
        let grid = column(&[Some(" COND"), Some("COND "), Some("\"COND\"")]);
        assert_eq!(select_range(&grid, "COND"), RowInterval::new(1, 3));
        assert_eq!(select_range(&grid, "\"COND\""), RowInterval::new(3, 3));
    }

    #[test]
    fn test_numeric_cells_never_match() {
        let grid = MemoryGrid::from_rows(vec![
            vec![CellValue::from(7i64)],
            vec![CellValue::from("7")],
            vec![CellValue::from("end")],
        ]);
        assert_eq!(select_range(&grid, "7"), RowInterval::new(2, 3));
    }

    #[test]
    fn test_whole_interval() {
        let grid = column(&[Some("A"), None, Some("B")]);
        assert_eq!(RowInterval::whole(&grid), RowInterval::new(1, 4));
        assert_eq!(RowInterval::whole(&grid).rows().count(), 3);
    }
}
