//! Core library for scavenging labelled fields out of spreadsheets.
//!
//! This crate provides:
//! - Read-only grid and workbook abstractions over typed cells
//! - Spreadsheet reading (xlsx, xlsm, xlsb, xls, ods) via calamine
//! - Horizontal label/value extraction bounded by a column-1 marker row
//! - Document profiles, file enumeration, and post-processing rules

pub mod error;
pub mod extract;
pub mod grid;
pub mod models;
pub mod scan;
pub mod spreadsheet;

pub use error::{ConfigurationError, Result, ScavengerError, SourceReadError};
pub use extract::{
    apply_split_rules, extract, select_range, select_sheet, FieldExtractor, FieldMap,
    LabelCatalog, RowInterval, SplitRule,
};
pub use grid::{CellValue, Grid, MemoryGrid, MemoryWorkbook, Workbook};
pub use models::config::{DocumentProfile, ScanConfig, ScavengerConfig};
pub use scan::collect_files;
pub use spreadsheet::{SheetGrid, SpreadsheetFile};
