//! Sequential extraction of one upload.
//!
//! Files are sent one at a time, in upload order; the first failure stops the
//! batch. What happens to records extracted before the failure is a
//! [`BatchPolicy`] decision.

use core::str::FromStr;

use tracing::Instrument;

use cmi_core::{BatchId, DomainError};
use cmi_invoicing::{InvoiceRecord, normalize};

use crate::document::SourceDocument;
use crate::error::ExtractionError;
use crate::extractor::DocumentExtractor;

/// What to commit when a file in the batch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Discard every record of the batch (nothing committed).
    #[default]
    AllOrNothing,
    /// Keep records from the files processed before the failing one.
    CommitSucceeded,
}

impl BatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchPolicy::AllOrNothing => "all-or-nothing",
            BatchPolicy::CommitSucceeded => "commit-succeeded",
        }
    }
}

impl FromStr for BatchPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all-or-nothing" => Ok(BatchPolicy::AllOrNothing),
            "commit-succeeded" => Ok(BatchPolicy::CommitSucceeded),
            other => Err(DomainError::validation(format!(
                "unknown batch policy '{other}' (expected all-or-nothing or commit-succeeded)"
            ))),
        }
    }
}

#[derive(Debug)]
pub struct BatchFailure {
    /// Name of the document whose extraction failed.
    pub file: String,
    pub error: ExtractionError,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub batch_id: BatchId,
    /// Records to commit to the session, in upload order.
    pub records: Vec<InvoiceRecord>,
    /// PDFs successfully extracted.
    pub processed: usize,
    /// Non-PDF documents skipped without error.
    pub skipped: usize,
    pub failure: Option<BatchFailure>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Run one batch through `extractor`, strictly in order.
pub async fn run_batch<E>(
    extractor: &E,
    documents: &[SourceDocument],
    policy: BatchPolicy,
) -> BatchOutcome
where
    E: DocumentExtractor + ?Sized,
{
    let batch_id = BatchId::new();
    let span = tracing::info_span!(
        "extraction_batch",
        batch_id = %batch_id,
        files = documents.len(),
        policy = policy.as_str()
    );

    async move {
        let mut outcome = BatchOutcome {
            batch_id,
            records: Vec::new(),
            processed: 0,
            skipped: 0,
            failure: None,
        };

        for doc in documents {
            if !doc.is_pdf() {
                tracing::debug!(file = %doc.name, mime = ?doc.mime_type, "skipping non-PDF document");
                outcome.skipped += 1;
                continue;
            }

            match extractor.extract(doc).await {
                Ok(raw) => {
                    tracing::info!(file = %doc.name, invoices = raw.len(), "document extracted");
                    outcome
                        .records
                        .extend(raw.iter().map(|r| normalize(r, &doc.name)));
                    outcome.processed += 1;
                }
                Err(error) => {
                    tracing::error!(file = %doc.name, error = %error, "document extraction failed");
                    outcome.failure = Some(BatchFailure {
                        file: doc.name.clone(),
                        error,
                    });
                    break;
                }
            }
        }

        if outcome.failure.is_some() && policy == BatchPolicy::AllOrNothing {
            outcome.records.clear();
        }

        tracing::info!(
            records = outcome.records.len(),
            processed = outcome.processed,
            skipped = outcome.skipped,
            failed = outcome.failure.is_some(),
            "extraction batch finished"
        );
        outcome
    }
    .instrument(span)
    .await
}
