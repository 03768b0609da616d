use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;

use crate::app::errors;
use crate::app::services::AppServices;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn router() -> Router {
    Router::new()
        .route("/totals", get(get_totals))
        .route("/journal", get(get_journal))
        .route("/export", get(export_workbook))
}

pub async fn get_totals(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let totals = services.session().totals();
    Json(totals)
}

pub async fn get_journal(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let journal = services.session().journal();
    Json(journal)
}

pub async fn export_workbook(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let exported = services.session().export_workbook(Utc::now().date_naive());

    match exported {
        Ok(Some(workbook)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", workbook.file_name),
                ),
            ],
            workbook.bytes,
        )
            .into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::export_error_to_response(e),
    }
}
