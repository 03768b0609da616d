//! Accounting module (double-entry journal derived from CMI invoices).
//!
//! Pure domain logic only: no IO, no HTTP, no spreadsheet concerns.

pub mod chart;
pub mod dashboard;
pub mod ledger;
pub mod posting;

pub use chart::{Account, AccountKind};
pub use dashboard::{DASHBOARD_HEADERS, DashboardRow, dashboard_rows};
pub use ledger::{
    DerivedLedger, InvoiceBalance, JOURNAL_HEADERS, JournalEntry, derive, derive_journal,
    invoice_balance, invoice_entries,
};
pub use posting::{InvoiceField, LABEL_SEPARATOR, PostingRule, Side};
