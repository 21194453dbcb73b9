//! Order model and DTOs.
//!
//! Field names on the wire are the Portuguese camelCase names the frontend
//! already speaks (`valorUnitario`, `previsaoEntrega`, ...).

use chrono::NaiveDate;
use geotoy_core::notification::StatusMessages;
use geotoy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `orders` table.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: DbId,
    pub produto: String,
    pub cliente: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub observacao: Option<Vec<String>>,
    pub valor_unitario: Option<f64>,
    pub frete: Option<f64>,
    pub valor_total: Option<f64>,
    pub previsao_entrega: Option<NaiveDate>,
    pub imagem: Option<String>,
    pub imagens: Option<Vec<String>>,
    pub status: String,
    pub mensagem_email: Json<StatusMessages>,
    #[serde(rename = "mensagemWhatsApp")]
    pub mensagem_whatsapp: Json<StatusMessages>,
    pub nota_fiscal_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new order.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[validate(length(min = 1, message = "produto é obrigatório"))]
    pub produto: String,
    #[validate(length(min = 1, message = "cliente é obrigatório"))]
    pub cliente: String,
    #[validate(email(message = "email inválido"))]
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub observacao: Option<Vec<String>>,
    pub valor_unitario: Option<f64>,
    pub frete: Option<f64>,
    pub valor_total: Option<f64>,
    pub previsao_entrega: Option<NaiveDate>,
    pub imagem: Option<String>,
    pub imagens: Option<Vec<String>>,
    pub status: Option<String>,
    pub mensagem_email: Option<StatusMessages>,
    #[serde(rename = "mensagemWhatsApp")]
    pub mensagem_whatsapp: Option<StatusMessages>,
    pub nota_fiscal_path: Option<String>,
}

/// DTO for partially updating an order. Absent fields keep their stored
/// values; `valor_total` is recomputed by the lifecycle layer regardless of
/// what the client sends.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    pub produto: Option<String>,
    pub cliente: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub observacao: Option<Vec<String>>,
    pub valor_unitario: Option<f64>,
    pub frete: Option<f64>,
    pub valor_total: Option<f64>,
    pub previsao_entrega: Option<NaiveDate>,
    pub imagem: Option<String>,
    pub imagens: Option<Vec<String>>,
    pub status: Option<String>,
    pub mensagem_email: Option<StatusMessages>,
    #[serde(rename = "mensagemWhatsApp")]
    pub mensagem_whatsapp: Option<StatusMessages>,
    pub nota_fiscal_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_order_deserializes_camel_case() {
        let input: CreateOrder = serde_json::from_value(serde_json::json!({
            "produto": "Toy art Dragão",
            "cliente": "Maria",
            "email": "maria@example.com",
            "valorUnitario": 120.0,
            "frete": 25.5,
            "previsaoEntrega": "2026-12-25",
            "mensagemEmail": { "producao": "Na bancada!" },
            "mensagemWhatsApp": { "enviado": "Saiu pra entrega" }
        }))
        .unwrap();

        assert_eq!(input.valor_unitario, Some(120.0));
        assert_eq!(
            input.previsao_entrega,
            Some(NaiveDate::from_ymd_opt(2026, 12, 25).unwrap())
        );
        assert_eq!(
            input.mensagem_email.unwrap().producao.as_deref(),
            Some("Na bancada!")
        );
        assert_eq!(
            input.mensagem_whatsapp.unwrap().enviado.as_deref(),
            Some("Saiu pra entrega")
        );
    }

    #[test]
    fn create_order_requires_produto_and_cliente() {
        let input = CreateOrder {
            produto: String::new(),
            cliente: "Maria".to_string(),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let input = CreateOrder {
            produto: "Toy art".to_string(),
            cliente: "Maria".to_string(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn create_order_rejects_malformed_email() {
        let input = CreateOrder {
            produto: "Toy art".to_string(),
            cliente: "Maria".to_string(),
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_order_tolerates_partial_bodies() {
        let input: UpdateOrder =
            serde_json::from_value(serde_json::json!({ "status": "producao" })).unwrap();
        assert_eq!(input.status.as_deref(), Some("producao"));
        assert!(input.frete.is_none());
        assert!(input.valor_total.is_none());
    }
}
