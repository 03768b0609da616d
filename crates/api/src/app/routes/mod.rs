use axum::Router;

pub mod invoices;
pub mod ledger;
pub mod system;

/// Router for all session endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/invoices", invoices::router())
        .merge(ledger::router())
}
