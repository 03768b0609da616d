use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use cmi_export::ExportError;

use crate::session::{GENERIC_EXTRACTION_ERROR, SessionError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn session_error_to_response(err: SessionError) -> axum::response::Response {
    match err {
        SessionError::Busy => json_error(StatusCode::CONFLICT, "busy", err.to_string()),
    }
}

/// The detailed cause has already been logged; clients only get the generic text.
pub fn extraction_failed() -> axum::response::Response {
    json_error(StatusCode::BAD_GATEWAY, "extraction_failed", GENERIC_EXTRACTION_ERROR)
}

pub fn export_error_to_response(err: ExportError) -> axum::response::Response {
    tracing::error!(error = %err, "workbook export failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "export_failed",
        "failed to build the spreadsheet",
    )
}
