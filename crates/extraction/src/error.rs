use thiserror::Error;

/// Failure of one extraction call.
///
/// Causes are kept apart for logs; users only ever see one generic message.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no API credential configured")]
    MissingCredential,

    #[error("network error: {0}")]
    Network(String),

    #[error("extraction service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("extraction service returned no content")]
    EmptyResponse,

    #[error("malformed extraction response: {0}")]
    MalformedResponse(String),
}
