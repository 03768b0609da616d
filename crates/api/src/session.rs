//! Per-user working session: the ordered invoice collection plus the
//! loading/error flags of the upload flow.
//!
//! All derived views (totals, journal, dashboard, workbook) are recomputed
//! from `records` on every call.

use chrono::NaiveDate;
use thiserror::Error;

use cmi_accounting::{DashboardRow, JournalEntry, dashboard_rows, derive_journal, invoice_balance};
use cmi_export::{ExportError, WorkbookExport};
use cmi_extraction::BatchOutcome;
use cmi_invoicing::{AggregateTotals, InvoiceRecord};

/// Shown to the user for every extraction failure, whatever the cause.
pub const GENERIC_EXTRACTION_ERROR: &str =
    "Failed to extract data. Ensure the PDF contains the financial variables requested.";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("an extraction batch is already in progress")]
    Busy,
}

/// What one finished submission did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReport {
    pub added: usize,
    pub skipped: usize,
    pub failed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    records: Vec<InvoiceRecord>,
    loading: bool,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[InvoiceRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn begin_submission(&mut self) -> Result<(), SessionError> {
        if self.loading {
            return Err(SessionError::Busy);
        }
        self.loading = true;
        self.error = None;
        Ok(())
    }

    /// Commit a batch outcome and leave the loading state.
    pub fn finish_submission(&mut self, outcome: BatchOutcome) -> SubmissionReport {
        for record in &outcome.records {
            let balance = invoice_balance(record);
            if !balance.is_balanced() {
                tracing::warn!(
                    batch_id = %outcome.batch_id,
                    reference = %record.reference,
                    file = %record.source_file,
                    debit = %balance.debit,
                    credit = %balance.credit,
                    difference = %balance.difference(),
                    "invoice figures do not balance"
                );
            }
        }

        let report = SubmissionReport {
            added: outcome.records.len(),
            skipped: outcome.skipped,
            failed: outcome.failure.is_some(),
        };

        if let Some(failure) = &outcome.failure {
            tracing::error!(
                batch_id = %outcome.batch_id,
                file = %failure.file,
                cause = %failure.error,
                kept = report.added,
                "extraction batch failed"
            );
            self.error = Some(GENERIC_EXTRACTION_ERROR.to_string());
        }

        self.records.extend(outcome.records);
        self.loading = false;
        report
    }

    /// Leave the loading state for a batch that never produced an outcome
    /// (panicked or cancelled). Nothing is committed.
    pub fn abort_submission(&mut self) {
        self.loading = false;
        self.error = Some(GENERIC_EXTRACTION_ERROR.to_string());
    }

    /// Remove the record at `index`; out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<InvoiceRecord> {
        if index >= self.records.len() {
            return None;
        }
        Some(self.records.remove(index))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn totals(&self) -> AggregateTotals {
        AggregateTotals::compute(&self.records)
    }

    pub fn journal(&self) -> Vec<JournalEntry> {
        derive_journal(&self.records)
    }

    pub fn dashboard(&self) -> Vec<DashboardRow> {
        dashboard_rows(&self.records)
    }

    pub fn export_workbook(&self, date: NaiveDate) -> Result<Option<WorkbookExport>, ExportError> {
        cmi_export::export(&self.records, date)
    }
}
