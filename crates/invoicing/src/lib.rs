//! Invoicing module (extracted CMI statement invoices).
//!
//! Pure domain logic only: no IO, no HTTP, no spreadsheet concerns.
//!
//! - `record`: the canonical [`InvoiceRecord`] held in a session
//! - `raw`: the untrusted AI field set and its normalization
//! - `totals`: aggregate totals over a collection of records

pub mod raw;
pub mod record;
pub mod totals;

pub use raw::{RawInvoice, normalize};
pub use record::InvoiceRecord;
pub use totals::AggregateTotals;
