pub const PDF_MIME: &str = "application/pdf";

/// An uploaded file, held in memory for the duration of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub name: String,
    /// Declared content type, when the upload carried one.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type,
            bytes,
        }
    }

    /// Whether this document should be sent for extraction.
    ///
    /// The declared content type decides; without one, the `.pdf` extension does.
    pub fn is_pdf(&self) -> bool {
        match self.mime_type.as_deref() {
            Some(mime) => mime.trim().eq_ignore_ascii_case(PDF_MIME),
            None => self.name.to_ascii_lowercase().ends_with(".pdf"),
        }
    }
}
