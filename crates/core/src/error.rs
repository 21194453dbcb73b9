use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} com ID {id} não encontrado")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Not-found error for an order id.
    pub fn order_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Pedido",
            id,
        }
    }
}
