//! `cmi-extraction`
//!
//! **Responsibility:** AI document-understanding boundary.
//!
//! This crate is intentionally **not** part of the domain model:
//! - the external service is a black box behind [`DocumentExtractor`];
//! - its output is untrusted and only ever surfaces as [`RawInvoice`]s,
//!   which the batch pipeline normalizes into `InvoiceRecord`s;
//! - it never touches session state.
//!
//! [`RawInvoice`]: cmi_invoicing::RawInvoice

pub mod batch;
pub mod document;
pub mod error;
pub mod extractor;
pub mod gemini;

pub use batch::{BatchFailure, BatchOutcome, BatchPolicy, run_batch};
pub use document::SourceDocument;
pub use error::ExtractionError;
pub use extractor::DocumentExtractor;
pub use gemini::{GeminiConfig, GeminiExtractor};
