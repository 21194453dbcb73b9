//! Client for the PDF extraction microservice.
//!
//! Posts an uploaded invoice PDF as multipart form data to the external
//! `POST {base}/extract` endpoint and normalizes the loosely typed response
//! into an [`OrderDraft`]. The caller owns the temp file and must remove it
//! after the call resolves, success or failure.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use geotoy_core::money::parse_number;

/// Errors from the extraction service layer.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Extraction service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The uploaded file could not be read from disk.
    #[error("Could not read uploaded file: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw field bag returned by the extraction service.
///
/// Monetary fields arrive as numbers or Brazilian-locale strings depending on
/// what the parser found in the PDF, so they stay as [`Value`] until
/// normalization. `observacao` may be a single string or a list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedFields {
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub descricao: Option<String>,
    pub endereco: Option<String>,
    pub observacao: Option<Value>,
    pub valor_unitario: Option<Value>,
    pub frete: Option<Value>,
    pub valor_total: Option<Value>,
    /// Delivery estimate as `DD/MM/YYYY` text.
    pub previsao_entrega: Option<String>,
    pub imagem: Option<String>,
}

/// A prospective order normalized from extracted fields. Not persisted;
/// creation happens through the regular create endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub cliente: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub produto: Option<String>,
    pub endereco: Option<String>,
    pub observacao: Option<Vec<String>>,
    pub valor_unitario: f64,
    pub frete: f64,
    pub valor_total: f64,
    pub previsao_entrega: Option<NaiveDate>,
    pub imagem: Option<String>,
}

impl ExtractedFields {
    /// Normalize into an [`OrderDraft`]: monetary fields through
    /// [`parse_number`], the delivery estimate from `DD/MM/YYYY` (absent when
    /// missing or malformed), `nome` → `cliente`, `descricao` → `produto`.
    pub fn into_draft(self) -> OrderDraft {
        let valor_unitario = parse_number(self.valor_unitario.as_ref());
        let frete = parse_number(self.frete.as_ref());
        let valor_total = parse_number(self.valor_total.as_ref());

        OrderDraft {
            cliente: self.nome,
            telefone: self.telefone,
            email: self.email,
            produto: self.descricao,
            endereco: self.endereco,
            observacao: normalize_notes(self.observacao),
            valor_unitario,
            frete,
            valor_total,
            previsao_entrega: self.previsao_entrega.as_deref().and_then(parse_delivery_date),
            imagem: self.imagem,
        }
    }
}

/// Parse a `DD/MM/YYYY` delivery estimate. Returns `None` on any malformed
/// input rather than failing the whole extraction.
fn parse_delivery_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

/// The extractor may emit a single note or a list of notes.
fn normalize_notes(value: Option<Value>) -> Option<Vec<String>> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(vec![s]),
        Some(Value::Array(items)) => {
            let notes: Vec<String> = items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            (!notes.is_empty()).then_some(notes)
        }
        _ => None,
    }
}

/// HTTP client for the extraction microservice.
pub struct ExtractorClient {
    client: reqwest::Client,
    base_url: String,
}

impl ExtractorClient {
    /// Create a new client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:8000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Send a PDF for extraction.
    ///
    /// Posts the file as multipart form data (part name `file`, filename
    /// `ordem.pdf`) and returns the parsed field bag.
    pub async fn extract(&self, path: &Path) -> Result<ExtractedFields, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("ordem.pdf")
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!(path = %path.display(), "Sending PDF to extraction service");

        let response = self
            .client
            .post(format!("{}/extract", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<ExtractedFields>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_normalizes_monetary_strings_and_date() {
        let fields: ExtractedFields = serde_json::from_value(json!({
            "nome": "Maria Souza",
            "descricao": "Toy art Gato Cyberpunk",
            "valorUnitario": "1.234,56",
            "frete": 25,
            "valorTotal": "1.260,06",
            "previsaoEntrega": "25/12/2026",
        }))
        .unwrap();

        let draft = fields.into_draft();
        assert_eq!(draft.cliente.as_deref(), Some("Maria Souza"));
        assert_eq!(draft.produto.as_deref(), Some("Toy art Gato Cyberpunk"));
        assert_eq!(draft.valor_unitario, 1234.56);
        assert_eq!(draft.frete, 25.0);
        assert_eq!(draft.valor_total, 1260.06);
        assert_eq!(
            draft.previsao_entrega,
            Some(NaiveDate::from_ymd_opt(2026, 12, 25).unwrap())
        );
    }

    #[test]
    fn draft_defaults_missing_fields() {
        let draft = ExtractedFields::default().into_draft();
        assert_eq!(draft.valor_unitario, 0.0);
        assert_eq!(draft.frete, 0.0);
        assert_eq!(draft.valor_total, 0.0);
        assert!(draft.previsao_entrega.is_none());
        assert!(draft.observacao.is_none());
    }

    #[test]
    fn malformed_delivery_date_is_dropped() {
        assert_eq!(parse_delivery_date("2026-12-25"), None);
        assert_eq!(parse_delivery_date("31/02/2026"), None);
        assert_eq!(parse_delivery_date(" 01/03/2026 "), parse_delivery_date("01/03/2026"));
    }

    #[test]
    fn notes_accept_string_or_list() {
        assert_eq!(
            normalize_notes(Some(json!("pintura fosca"))),
            Some(vec!["pintura fosca".to_string()])
        );
        assert_eq!(
            normalize_notes(Some(json!(["a", "b", 3]))),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(normalize_notes(Some(json!(""))), None);
        assert_eq!(normalize_notes(Some(json!(42))), None);
        assert_eq!(normalize_notes(None), None);
    }

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = ExtractionError::Api {
            status: 422,
            body: "pdf sem texto".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Extraction service error (422): pdf sem texto"
        );
    }
}
