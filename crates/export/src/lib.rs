//! `cmi-export`
//!
//! **Responsibility:** spreadsheet output for a session.
//!
//! One workbook, two sheets: the flat extraction table (`Extractions`) and the
//! derived journal (`Comptabilité`). Row content comes from `cmi-accounting`;
//! this crate only maps rows onto cells.

pub mod error;
pub mod workbook;

pub use error::ExportError;
pub use workbook::{
    ACCOUNTING_SHEET, DASHBOARD_SHEET, WorkbookExport, build_workbook, export, export_file_name,
};
