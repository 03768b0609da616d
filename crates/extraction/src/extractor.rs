use async_trait::async_trait;

use cmi_invoicing::RawInvoice;

use crate::document::SourceDocument;
use crate::error::ExtractionError;

/// One call to the external document-understanding service.
///
/// A single document may yield several invoices (one per statement period).
/// Implementations must not retry; the batch pipeline decides what a failure
/// means for the rest of the upload.
#[async_trait]
pub trait DocumentExtractor: Send + Sync + 'static {
    async fn extract(&self, document: &SourceDocument) -> Result<Vec<RawInvoice>, ExtractionError>;
}
