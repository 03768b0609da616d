use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};

use cmi_extraction::SourceDocument;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Multipart part name carrying one uploaded statement.
const FILE_FIELD: &str = "file";

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).delete(clear_invoices))
        .route("/extract", post(extract_invoices))
        .route("/:index", delete(remove_invoice))
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> impl IntoResponse {
    let view = dto::SessionView::from(&*services.session());
    Json(view)
}

pub async fn extract_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    mut multipart: Multipart,
) -> axum::response::Response {
    let mut documents = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.body_text());
            }
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().map(str::to_string);
        let bytes = match field.bytes().await {
            Ok(b) => b.to_vec(),
            Err(e) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.body_text());
            }
        };
        documents.push(SourceDocument::new(name, mime_type, bytes));
    }

    tracing::info!(files = documents.len(), "extraction requested");

    // Detached so a dropped connection cannot leave the session stuck loading.
    let batch = tokio::spawn(services.clone().submit(documents));
    let report = match batch.await {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => return errors::session_error_to_response(e),
        Err(e) => {
            tracing::error!(error = %e, "extraction task aborted");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "extraction task aborted",
            );
        }
    };

    if report.failed {
        return errors::extraction_failed();
    }

    let session = services.session();
    (StatusCode::OK, Json(dto::ExtractResponse::new(report, &session))).into_response()
}

pub async fn remove_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(index): Path<usize>,
) -> axum::response::Response {
    let mut session = services.session();
    match session.remove(index) {
        Some(removed) => {
            tracing::info!(index, reference = %removed.reference, "invoice removed");
            Json(dto::SessionView::from(&*session)).into_response()
        }
        None => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no invoice at index {index}"),
        ),
    }
}

pub async fn clear_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> impl IntoResponse {
    let mut session = services.session();
    let removed = session.len();
    session.clear();
    tracing::info!(removed, "session cleared");
    Json(dto::SessionView::from(&*session))
}
