use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use cmi_accounting::{
    DASHBOARD_HEADERS, DashboardRow, JOURNAL_HEADERS, JournalEntry, derive,
};
use cmi_core::Amount;
use cmi_invoicing::InvoiceRecord;

use crate::error::ExportError;

pub const DASHBOARD_SHEET: &str = "Extractions";
pub const ACCOUNTING_SHEET: &str = "Comptabilité";

const AMOUNT_FORMAT: &str = "#,##0.00";

/// A rendered workbook, ready to be written or streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl WorkbookExport {
    /// Write the workbook into `dir` under its own file name.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `CMI_EXTRACTOR_<YYYY-MM-DD>.xlsx`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("CMI_EXTRACTOR_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Render the session into a workbook.
///
/// Returns `Ok(None)` for an empty collection: nothing is exported.
pub fn export(
    records: &[InvoiceRecord],
    date: NaiveDate,
) -> Result<Option<WorkbookExport>, ExportError> {
    if records.is_empty() {
        tracing::debug!("export skipped: no invoices in session");
        return Ok(None);
    }

    let bytes = build_workbook(records)?;
    let file_name = export_file_name(date);
    tracing::info!(
        file_name = %file_name,
        invoices = records.len(),
        size = bytes.len(),
        "workbook exported"
    );

    Ok(Some(WorkbookExport { file_name, bytes }))
}

/// Build the two-sheet workbook as xlsx bytes.
pub fn build_workbook(records: &[InvoiceRecord]) -> Result<Vec<u8>, ExportError> {
    let derived = derive(records);

    let header = Format::new().set_bold();
    let money = Format::new().set_num_format(AMOUNT_FORMAT);

    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(DASHBOARD_SHEET)?;
    write_dashboard(sheet, &derived.dashboard, &header, &money)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(ACCOUNTING_SHEET)?;
    write_journal(sheet, &derived.journal, &header, &money)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), ExportError> {
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_dashboard(
    sheet: &mut Worksheet,
    rows: &[DashboardRow],
    header: &Format,
    money: &Format,
) -> Result<(), ExportError> {
    write_headers(sheet, &DASHBOARD_HEADERS, header)?;

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        write_text(sheet, r, 0, &row.reference)?;
        write_text(sheet, r, 1, &row.date)?;
        for (offset, amount) in row.amounts().into_iter().enumerate() {
            write_amount(sheet, r, 2 + offset as u16, amount, money)?;
        }
        write_text(sheet, r, 7, &row.source_file)?;
    }

    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(7, 32)?;
    Ok(())
}

fn write_journal(
    sheet: &mut Worksheet,
    rows: &[JournalEntry],
    header: &Format,
    money: &Format,
) -> Result<(), ExportError> {
    write_headers(sheet, &JOURNAL_HEADERS, header)?;

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        write_text(sheet, r, 0, &row.date)?;
        write_text(sheet, r, 1, &row.general_account)?;
        write_text(sheet, r, 2, &row.third_party_account)?;
        write_text(sheet, r, 3, &row.label)?;
        write_amount(sheet, r, 4, row.debit, money)?;
        write_amount(sheet, r, 5, row.credit, money)?;
    }

    sheet.set_column_width(3, 40)?;
    Ok(())
}

// Excel has no empty-string cells; leave them blank.
fn write_text(sheet: &mut Worksheet, row: u32, col: u16, text: &str) -> Result<(), ExportError> {
    if !text.is_empty() {
        sheet.write_string(row, col, text)?;
    }
    Ok(())
}

fn write_amount(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    amount: Amount,
    format: &Format,
) -> Result<(), ExportError> {
    sheet.write_number_with_format(row, col, amount.to_dh(), format)?;
    Ok(())
}
