//! Order status lifecycle.
//!
//! Statuses move in any direction -- there is deliberately no transition
//! table. A status change only matters for notifications when the new value
//! differs from the stored one and the order has an email on file.

use serde::{Deserialize, Serialize};

/// The four stages an order moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Novo,
    Producao,
    Finalizado,
    Enviado,
}

impl OrderStatus {
    /// All statuses in timeline order.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Novo,
        OrderStatus::Producao,
        OrderStatus::Finalizado,
        OrderStatus::Enviado,
    ];

    /// Parse the lowercase wire name (`novo`, `producao`, `finalizado`,
    /// `enviado`). Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "novo" => Some(OrderStatus::Novo),
            "producao" => Some(OrderStatus::Producao),
            "finalizado" => Some(OrderStatus::Finalizado),
            "enviado" => Some(OrderStatus::Enviado),
            _ => None,
        }
    }

    /// The lowercase wire/storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Novo => "novo",
            OrderStatus::Producao => "producao",
            OrderStatus::Finalizado => "finalizado",
            OrderStatus::Enviado => "enviado",
        }
    }

    /// Position in the 4-step progress timeline.
    pub fn index(&self) -> usize {
        match self {
            OrderStatus::Novo => 0,
            OrderStatus::Producao => 1,
            OrderStatus::Finalizado => 2,
            OrderStatus::Enviado => 3,
        }
    }

    /// Customer-facing display label.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Novo => "Recebido",
            OrderStatus::Producao => "Em produção",
            OrderStatus::Finalizado => "Finalizado",
            OrderStatus::Enviado => "Enviado",
        }
    }

    /// Greeting word used in the email header for this status.
    pub fn greeting(&self) -> &'static str {
        match self {
            OrderStatus::Novo => "Olá",
            OrderStatus::Producao => "Oba",
            OrderStatus::Finalizado => "Eba",
            OrderStatus::Enviado => "Uhu",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_four_wire_names() {
        assert_eq!(OrderStatus::parse("novo"), Some(OrderStatus::Novo));
        assert_eq!(OrderStatus::parse("producao"), Some(OrderStatus::Producao));
        assert_eq!(
            OrderStatus::parse("finalizado"),
            Some(OrderStatus::Finalizado)
        );
        assert_eq!(OrderStatus::parse("enviado"), Some(OrderStatus::Enviado));
    }

    #[test]
    fn parse_rejects_unknown_and_cased_names() {
        assert_eq!(OrderStatus::parse("Novo"), None);
        assert_eq!(OrderStatus::parse("cancelado"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn timeline_indices_are_stable() {
        assert_eq!(OrderStatus::Novo.index(), 0);
        assert_eq!(OrderStatus::Producao.index(), 1);
        assert_eq!(OrderStatus::Finalizado.index(), 2);
        assert_eq!(OrderStatus::Enviado.index(), 3);
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
    }
}
