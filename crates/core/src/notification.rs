//! Status-triggered email composition.
//!
//! Pure selection and rendering: per-status wording tables, order-level
//! overrides, the 4-step progress timeline, and the final HTML body built
//! from one embedded layout template. Dispatch lives in `geotoy-mailer`.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::money::format_brl;
use crate::status::OrderStatus;

/// Fixed filename used when attaching the invoice to the "enviado" email.
pub const INVOICE_ATTACHMENT_NAME: &str = "nota-fiscal.pdf";

/// Per-order message overrides, keyed by status.
///
/// Stored on the order as a JSONB map. A populated entry wins over the
/// per-status default wording when that status is reached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusMessages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalizado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enviado: Option<String>,
}

impl StatusMessages {
    /// Override text for a status, if one was set on the order.
    ///
    /// `novo` has no override slot: the confirmation email always uses the
    /// default wording.
    pub fn get(&self, status: OrderStatus) -> Option<&str> {
        match status {
            OrderStatus::Novo => None,
            OrderStatus::Producao => self.producao.as_deref(),
            OrderStatus::Finalizado => self.finalizado.as_deref(),
            OrderStatus::Enviado => self.enviado.as_deref(),
        }
    }
}

/// Default customer-facing message for a status.
pub fn default_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Novo => {
            "Recebemos seu pedido e ele já está entrando na nossa linha de produção! \
             Aqui na Geotoy cada toy art é feito à mão, com alma, tinta e muita \
             criatividade. Pode se preparar: vem arte braba por aí!"
        }
        OrderStatus::Producao => {
            "Seu pedido entrou em produção! Nossos artistas já estão com a mão na \
             tinta dando vida ao seu toy art."
        }
        OrderStatus::Finalizado => {
            "Seu pedido ficou pronto! Estamos preparando tudo para o envio com o \
             maior cuidado."
        }
        OrderStatus::Enviado => {
            "Seu pedido foi enviado e logo chega até você! Qualquer novidade a \
             gente te avisa por aqui."
        }
    }
}

/// Illustrative image shown in the email body for a status.
pub fn image_url(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Novo => "https://media.geotoy.com.br/email/pedido-recebido.gif",
        OrderStatus::Producao => "https://media.geotoy.com.br/email/em-producao.gif",
        OrderStatus::Finalizado => "https://media.geotoy.com.br/email/finalizado.gif",
        OrderStatus::Enviado => "https://media.geotoy.com.br/email/enviado.gif",
    }
}

/// Message body for a status: the order-level override when present,
/// the default wording otherwise.
pub fn message_for(status: OrderStatus, overrides: Option<&StatusMessages>) -> String {
    overrides
        .and_then(|m| m.get(status))
        .unwrap_or_else(|| default_message(status))
        .to_string()
}

/// Whether a status update should trigger a notification.
///
/// Fires only when the supplied status differs from the one already stored
/// on the order and the order has an email on file. Re-sending the current
/// status is silent.
pub fn should_notify(new_status: OrderStatus, stored_status: &str, email: Option<&str>) -> bool {
    email.is_some() && new_status.as_str() != stored_status
}

/// Invoice path to attach, only when the order just became `enviado` and an
/// invoice was uploaded.
pub fn invoice_attachment_path(
    new_status: OrderStatus,
    nota_fiscal_path: Option<&str>,
) -> Option<&str> {
    match new_status {
        OrderStatus::Enviado => nota_fiscal_path,
        _ => None,
    }
}

/// Subject line for the order-confirmation email.
pub fn confirmation_subject() -> &'static str {
    "Recebemos seu pedido na Geotoy!"
}

/// Subject line for status-update and ad-hoc emails.
pub fn update_subject(produto: &str) -> String {
    format!("Atualização do Pedido: {produto}")
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Render the 4-step progress indicator for the current status.
///
/// Steps before the current index are completed (checkmark), the current
/// index is active ("Status atual"), later indices are upcoming ("Em breve").
pub fn timeline_html(status: OrderStatus) -> String {
    let current = status.index();
    let mut cells = String::new();

    for step in OrderStatus::ALL {
        let (glyph, note, color) = match step.index().cmp(&current) {
            std::cmp::Ordering::Less => ("✔", "", "#22c55e"),
            std::cmp::Ordering::Equal => ("●", "Status atual", "#ec4899"),
            std::cmp::Ordering::Greater => ("○", "Em breve", "#cbd5e1"),
        };
        cells.push_str(&format!(
            r#"<td align="center" style="padding: 4px;">
    <div style="font-size: 20px; color: {color};">{glyph}</div>
    <div style="font-size: 12px; color: #334155; font-weight: 600;">{label}</div>
    <div style="font-size: 11px; color: #64748b; font-style: italic;">{note}</div>
</td>
"#,
            label = step.label(),
        ));
    }

    format!(
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">\
         <tr>\n{cells}</tr></table>"
    )
}

// ---------------------------------------------------------------------------
// Payload and rendering
// ---------------------------------------------------------------------------

/// Order-summary block shown only on the initial confirmation email.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub produto: String,
    pub observacoes: String,
    pub valor_unitario: String,
    pub frete: String,
    pub valor_total: String,
}

impl OrderSummary {
    /// Build a summary from raw order fields, formatting every monetary
    /// value with two decimals and joining observations with `", "`.
    pub fn new(
        produto: &str,
        observacao: Option<&[String]>,
        valor_unitario: Option<f64>,
        frete: Option<f64>,
        valor_total: Option<f64>,
    ) -> Self {
        let observacoes = match observacao {
            Some(notes) if !notes.is_empty() => notes.join(", "),
            _ => "Sem observações".to_string(),
        };
        OrderSummary {
            produto: produto.to_string(),
            observacoes,
            valor_unitario: format_brl(valor_unitario.unwrap_or(0.0)),
            frete: format_brl(frete.unwrap_or(0.0)),
            valor_total: format_brl(valor_total.unwrap_or(0.0)),
        }
    }
}

/// Everything the layout template needs to render one email body.
#[derive(Debug, Clone)]
pub struct EmailPayload {
    pub cliente: String,
    pub status: OrderStatus,
    pub mensagem: String,
    pub codigo_rastreamento: Option<String>,
    pub resumo: Option<OrderSummary>,
}

impl EmailPayload {
    /// Payload for a status notification with the given message body.
    pub fn new(cliente: &str, status: OrderStatus, mensagem: String) -> Self {
        EmailPayload {
            cliente: cliente.to_string(),
            status,
            mensagem,
            codigo_rastreamento: None,
            resumo: None,
        }
    }

    pub fn with_summary(mut self, resumo: OrderSummary) -> Self {
        self.resumo = Some(resumo);
        self
    }

    pub fn with_tracking_code(mut self, codigo: Option<String>) -> Self {
        self.codigo_rastreamento = codigo;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Email template render error: {0}")]
    Render(#[from] tera::Error),
}

/// The compiled layout template, built once per process.
fn templates() -> &'static Tera {
    static TERA: OnceLock<Tera> = OnceLock::new();
    TERA.get_or_init(|| {
        let mut tera = Tera::default();
        // Named with the .html suffix so tera's autoescaping applies.
        tera.add_raw_template("email.html", include_str!("../templates/email.html"))
            .expect("embedded email template must compile");
        tera
    })
}

/// Render the final HTML body for a payload.
pub fn render(payload: &EmailPayload) -> Result<String, ComposeError> {
    let mut ctx = Context::new();
    ctx.insert("cliente", &payload.cliente);
    ctx.insert("saudacao", payload.status.greeting());
    ctx.insert("status_texto", payload.status.label());
    ctx.insert("mensagem", &payload.mensagem);
    ctx.insert("gif_url", image_url(payload.status));
    ctx.insert("codigo_rastreamento", &payload.codigo_rastreamento);
    ctx.insert("resumo", &payload.resumo);
    ctx.insert("etapas", &timeline_html(payload.status));

    Ok(templates().render("email.html", &ctx)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_default() {
        let overrides = StatusMessages {
            producao: Some("Sua encomenda está na bancada!".to_string()),
            ..Default::default()
        };
        assert_eq!(
            message_for(OrderStatus::Producao, Some(&overrides)),
            "Sua encomenda está na bancada!"
        );
        assert_eq!(
            message_for(OrderStatus::Finalizado, Some(&overrides)),
            default_message(OrderStatus::Finalizado)
        );
        assert_eq!(
            message_for(OrderStatus::Producao, None),
            default_message(OrderStatus::Producao)
        );
    }

    #[test]
    fn confirmation_never_uses_overrides() {
        let overrides = StatusMessages {
            producao: Some("x".to_string()),
            finalizado: Some("y".to_string()),
            enviado: Some("z".to_string()),
        };
        assert_eq!(overrides.get(OrderStatus::Novo), None);
    }

    #[test]
    fn timeline_for_finalizado_marks_steps() {
        let html = timeline_html(OrderStatus::Finalizado);
        // Steps 0 and 1 completed, step 2 active, step 3 upcoming.
        assert_eq!(html.matches('✔').count(), 2);
        assert_eq!(html.matches("Status atual").count(), 1);
        assert_eq!(html.matches("Em breve").count(), 1);
        assert!(html.contains("Finalizado"));
    }

    #[test]
    fn timeline_for_novo_has_no_completed_steps() {
        let html = timeline_html(OrderStatus::Novo);
        assert_eq!(html.matches('✔').count(), 0);
        assert_eq!(html.matches("Em breve").count(), 3);
    }

    #[test]
    fn status_change_with_email_notifies() {
        assert!(should_notify(
            OrderStatus::Producao,
            "novo",
            Some("maria@example.com")
        ));
    }

    #[test]
    fn same_status_update_is_silent() {
        assert!(!should_notify(
            OrderStatus::Producao,
            "producao",
            Some("maria@example.com")
        ));
    }

    #[test]
    fn missing_email_suppresses_notification() {
        assert!(!should_notify(OrderStatus::Enviado, "producao", None));
        assert!(should_notify(
            OrderStatus::Enviado,
            "producao",
            Some("maria@example.com")
        ));
    }

    #[test]
    fn invoice_attached_only_on_enviado_with_path() {
        let path = Some("./uploads/notas/nota_1.pdf");
        assert_eq!(
            invoice_attachment_path(OrderStatus::Enviado, path),
            Some("./uploads/notas/nota_1.pdf")
        );
        assert_eq!(invoice_attachment_path(OrderStatus::Enviado, None), None);
        assert_eq!(invoice_attachment_path(OrderStatus::Finalizado, path), None);
    }

    #[test]
    fn render_includes_summary_only_when_present() {
        let summary = OrderSummary::new(
            "Toy art Gato Cyberpunk",
            Some(&["pintura metálica".to_string(), "base preta".to_string()]),
            Some(120.0),
            Some(25.5),
            Some(145.5),
        );
        let with = render(
            &EmailPayload::new(
                "Maria",
                OrderStatus::Novo,
                message_for(OrderStatus::Novo, None),
            )
            .with_summary(summary),
        )
        .unwrap();
        assert!(with.contains("Resumo do Pedido"));
        assert!(with.contains("pintura metálica, base preta"));
        assert!(with.contains("145.50"));

        let without = render(&EmailPayload::new(
            "Maria",
            OrderStatus::Producao,
            message_for(OrderStatus::Producao, None),
        ))
        .unwrap();
        assert!(!without.contains("Resumo do Pedido"));
    }

    #[test]
    fn summary_without_observations_uses_placeholder() {
        let summary = OrderSummary::new("Toy art", None, None, None, None);
        assert_eq!(summary.observacoes, "Sem observações");
        assert_eq!(summary.valor_total, "0.00");
    }

    #[test]
    fn render_includes_tracking_code_when_set() {
        let html = render(
            &EmailPayload::new(
                "João",
                OrderStatus::Enviado,
                message_for(OrderStatus::Enviado, None),
            )
            .with_tracking_code(Some("BR123456789".to_string())),
        )
        .unwrap();
        assert!(html.contains("BR123456789"));
        assert!(html.contains("Código de rastreamento"));
    }

    #[test]
    fn subjects() {
        assert_eq!(confirmation_subject(), "Recebemos seu pedido na Geotoy!");
        assert_eq!(
            update_subject("Toy art Dragão"),
            "Atualização do Pedido: Toy art Dragão"
        );
    }
}
