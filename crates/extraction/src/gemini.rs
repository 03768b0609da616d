//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use cmi_invoicing::RawInvoice;

use crate::document::{PDF_MIME, SourceDocument};
use crate::error::ExtractionError;
use crate::extractor::DocumentExtractor;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const EXTRACTION_PROMPT: &str = "Analyze this CMI PDF statement and extract ALL invoices (factures) \
or summary periods listed. For EACH entry found, extract: 'factureReference' (the reference or period), \
'date', 'totalRemise' (Total Remise DH), 'totalCommissionsHT' (Total Commissions HT), \
'totalTVASurCommissions' (Total TVA sur Commissions), 'soldeNetRemise' (Solde Net Remise), and \
'locationTPE' (Look specifically for 'Location TPE' or 'Frais de location TPE' amount in DH). \
Return an array of objects.";

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl core::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// [`DocumentExtractor`] backed by the Gemini REST API.
///
/// No timeout and no retry: a hung call hangs the batch.
#[derive(Debug, Clone)]
pub struct GeminiExtractor {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiExtractor {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl DocumentExtractor for GeminiExtractor {
    async fn extract(&self, document: &SourceDocument) -> Result<Vec<RawInvoice>, ExtractionError> {
        if self.config.api_key.trim().is_empty() {
            return Err(ExtractionError::MissingCredential);
        }

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body(&document.bytes))
            .send()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let body: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        let invoices = parse_invoices(&body.text())?;
        tracing::debug!(
            file = %document.name,
            model = %self.config.model,
            invoices = invoices.len(),
            "gemini extraction completed"
        );
        Ok(invoices)
    }
}

/// `generateContent` request: the PDF inline, the prompt, and a response schema
/// requiring the seven invoice fields.
pub fn request_body(pdf: &[u8]) -> JsonValue {
    let data = base64::engine::general_purpose::STANDARD.encode(pdf);
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "inlineData": { "mimeType": PDF_MIME, "data": data } },
                { "text": EXTRACTION_PROMPT },
            ],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        },
    })
}

fn response_schema() -> JsonValue {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "factureReference": {
                    "type": "STRING",
                    "description": "The name, reference number, or ID of the facture/invoice",
                },
                "date": {
                    "type": "STRING",
                    "description": "The date associated with this specific invoice",
                },
                "totalRemise": { "type": "NUMBER", "description": "Total Remise amount in DH" },
                "totalCommissionsHT": { "type": "NUMBER", "description": "Total Commissions HT" },
                "totalTVASurCommissions": { "type": "NUMBER", "description": "Total TVA sur Commissions" },
                "soldeNetRemise": { "type": "NUMBER", "description": "Solde Net Remise" },
                "locationTPE": {
                    "type": "NUMBER",
                    "description": "Amount for Location TPE (DH). If not found, return 0.",
                },
            },
            "required": [
                "factureReference",
                "date",
                "totalRemise",
                "totalCommissionsHT",
                "totalTVASurCommissions",
                "soldeNetRemise",
                "locationTPE",
            ],
        },
    })
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

/// Parse the model's text answer into raw invoices.
///
/// The answer must be a JSON array (optionally wrapped in a Markdown code
/// fence). Array elements that are not objects are dropped.
pub fn parse_invoices(text: &str) -> Result<Vec<RawInvoice>, ExtractionError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let JsonValue::Array(items) = value else {
        return Err(ExtractionError::MalformedResponse(
            "expected a JSON array of invoices".to_string(),
        ));
    };

    let total = items.len();
    let invoices: Vec<RawInvoice> = items.into_iter().filter_map(RawInvoice::from_json).collect();
    if invoices.len() < total {
        tracing::warn!(
            dropped = total - invoices.len(),
            "ignored non-object entries in extraction response"
        );
    }

    Ok(invoices)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Optional language tag: runs up to the first whitespace or JSON opener.
    let rest = rest
        .trim_start_matches(|c: char| !c.is_whitespace() && c != '[' && c != '{')
        .trim();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_targets_configured_model() {
        let ex = GeminiExtractor::new(GeminiConfig {
            api_key: "k".into(),
            model: "gemini-x".into(),
            base_url: "http://localhost:1234/".into(),
        });
        assert_eq!(
            ex.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-x:generateContent"
        );
    }

    #[test]
    fn request_embeds_pdf_as_base64() {
        let body = request_body(b"%PDF-1.4");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[0]["inlineData"]["data"], "JVBERi0xLjQ=");
        assert!(parts[1]["text"].as_str().unwrap().contains("locationTPE"));
        assert_eq!(
            body["generationConfig"]["responseSchema"]["items"]["required"]
                .as_array()
                .unwrap()
                .len(),
            7
        );
    }

    #[test]
    fn array_answer_is_parsed() {
        let invoices = parse_invoices(
            r#"[{"factureReference":"F-1","totalRemise":100},{"factureReference":"F-2"}]"#,
        )
        .unwrap();
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].facture_reference, "F-1");
        assert_eq!(invoices[0].total_remise, 100);
    }

    #[test]
    fn fenced_answer_is_parsed() {
        let invoices = parse_invoices("```json\n[{\"factureReference\":\"F-1\"}]\n```").unwrap();
        assert_eq!(invoices.len(), 1);
    }

    #[test]
    fn single_line_fenced_answer_is_parsed() {
        let invoices = parse_invoices(r#"```json [{"factureReference":"F-1"}]```"#).unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].facture_reference, "F-1");

        let invoices = parse_invoices(r#"```[{"factureReference":"F-2"}]```"#).unwrap();
        assert_eq!(invoices[0].facture_reference, "F-2");
    }

    #[test]
    fn empty_answer_is_a_failure() {
        assert!(matches!(parse_invoices("   "), Err(ExtractionError::EmptyResponse)));
        assert!(matches!(parse_invoices("```\n```"), Err(ExtractionError::EmptyResponse)));
    }

    #[test]
    fn non_array_answer_is_a_failure() {
        assert!(matches!(
            parse_invoices(r#"{"factureReference":"F-1"}"#),
            Err(ExtractionError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_invoices("Sorry, I could not read this file."),
            Err(ExtractionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn non_object_elements_are_dropped() {
        let invoices = parse_invoices(r#"[1, "x", {"factureReference":"F-1"}]"#).unwrap();
        assert_eq!(invoices.len(), 1);
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "[{\"a\":" }, { "text": "1}]" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }))
        .unwrap();
        assert_eq!(resp.text(), "[{\"a\":1}]");

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), "");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let ex = GeminiExtractor::new(GeminiConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..GeminiConfig::default()
        });
        let doc = SourceDocument::new("a.pdf", None, b"%PDF".to_vec());
        assert!(matches!(ex.extract(&doc).await, Err(ExtractionError::MissingCredential)));
    }
}
