use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::{Value, json};

use cmi_extraction::{
    DocumentExtractor, ExtractionError, GeminiConfig, GeminiExtractor, SourceDocument,
};

type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    reply: Value,
    seen: Seen,
}

async fn generate(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.seen.lock().unwrap().push((key, body));
    (stub.status, Json(stub.reply.clone()))
}

/// Local stand-in for the Gemini REST endpoint.
struct StubServer {
    base_url: String,
    seen: Seen,
    handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    async fn spawn(status: StatusCode, reply: Value) -> Self {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v1beta/models/:model", post(generate))
            .with_state(Stub {
                status,
                reply,
                seen: seen.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            seen,
            handle,
        }
    }

    fn extractor(&self) -> GeminiExtractor {
        GeminiExtractor::new(GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-test".to_string(),
            base_url: self.base_url.clone(),
        })
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn answer(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn statement() -> SourceDocument {
    SourceDocument::new("releve.pdf", Some("application/pdf".into()), b"%PDF-1.4".to_vec())
}

#[tokio::test]
async fn extracts_invoices_from_model_answer() {
    let text = r#"[
        {"factureReference":"F-001","date":"2024-01-01","totalRemise":100,"totalCommissionsHT":20,
         "totalTVASurCommissions":4,"soldeNetRemise":76,"locationTPE":15},
        {"factureReference":"F-002","date":"2024-01-15","totalRemise":50}
    ]"#;
    let srv = StubServer::spawn(StatusCode::OK, answer(text)).await;

    let invoices = srv.extractor().extract(&statement()).await.unwrap();
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0].facture_reference, "F-001");
    assert_eq!(invoices[1].location_tpe, Value::Null);

    let seen = srv.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (key, body) = &seen[0];
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["data"], "JVBERi0xLjQ=");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
}

#[tokio::test]
async fn error_status_is_reported_with_body() {
    let srv = StubServer::spawn(
        StatusCode::FORBIDDEN,
        json!({"error": {"code": 403, "message": "API key not valid"}}),
    )
    .await;

    match srv.extractor().extract(&statement()).await {
        Err(ExtractionError::Api { status, body }) => {
            assert_eq!(status, 403);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn answer_without_candidates_is_empty() {
    let srv = StubServer::spawn(StatusCode::OK, json!({"candidates": []})).await;
    assert!(matches!(
        srv.extractor().extract(&statement()).await,
        Err(ExtractionError::EmptyResponse)
    ));
}

#[tokio::test]
async fn prose_answer_is_malformed() {
    let srv = StubServer::spawn(StatusCode::OK, answer("I cannot read this statement.")).await;
    assert!(matches!(
        srv.extractor().extract(&statement()).await,
        Err(ExtractionError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    // Grab a free port, then close it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let ex = GeminiExtractor::new(GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-test".to_string(),
        base_url: format!("http://{addr}"),
    });
    assert!(matches!(
        ex.extract(&statement()).await,
        Err(ExtractionError::Network(_))
    ));
}
