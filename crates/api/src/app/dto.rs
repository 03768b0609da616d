use serde::Serialize;

use cmi_invoicing::{AggregateTotals, InvoiceRecord};

use crate::session::{Session, SubmissionReport};

// -------------------------
// Response DTOs
// -------------------------

/// Snapshot of the session as the dashboard shows it.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub items: Vec<InvoiceRecord>,
    pub totals: AggregateTotals,
    pub loading: bool,
    pub error: Option<String>,
}

impl From<&Session> for SessionView {
    fn from(s: &Session) -> Self {
        Self {
            items: s.records().to_vec(),
            totals: s.totals(),
            loading: s.is_loading(),
            error: s.error().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub added: usize,
    pub skipped: usize,
    pub items: Vec<InvoiceRecord>,
    pub totals: AggregateTotals,
}

impl ExtractResponse {
    pub fn new(report: SubmissionReport, session: &Session) -> Self {
        Self {
            added: report.added,
            skipped: report.skipped,
            items: session.records().to_vec(),
            totals: session.totals(),
        }
    }
}
