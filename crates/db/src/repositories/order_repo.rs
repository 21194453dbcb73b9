//! Repository for the `orders` table.

use sqlx::types::Json;
use sqlx::PgPool;

use geotoy_core::types::DbId;

use crate::models::order::{CreateOrder, Order, UpdateOrder};

/// Column list for orders queries.
const COLUMNS: &str = "id, produto, cliente, email, telefone, endereco, observacao, \
    valor_unitario, frete, valor_total, previsao_entrega, imagem, imagens, status, \
    mensagem_email, mensagem_whatsapp, nota_fiscal_path, created_at, updated_at";

/// Provides CRUD operations for orders. Each call is individually atomic;
/// read-modify-write sequences above this layer are not serialized.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new order, defaulting `status` to `novo`, returning the
    /// created row.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let status = input.status.as_deref().unwrap_or("novo");
        let query = format!(
            "INSERT INTO orders
                (produto, cliente, email, telefone, endereco, observacao,
                 valor_unitario, frete, valor_total, previsao_entrega,
                 imagem, imagens, status, mensagem_email, mensagem_whatsapp,
                 nota_fiscal_path)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(&input.produto)
            .bind(&input.cliente)
            .bind(&input.email)
            .bind(&input.telefone)
            .bind(&input.endereco)
            .bind(&input.observacao)
            .bind(input.valor_unitario)
            .bind(input.frete)
            .bind(input.valor_total)
            .bind(input.previsao_entrega)
            .bind(&input.imagem)
            .bind(&input.imagens)
            .bind(status)
            .bind(Json(input.mensagem_email.clone().unwrap_or_default()))
            .bind(Json(input.mensagem_whatsapp.clone().unwrap_or_default()))
            .bind(&input.nota_fiscal_path)
            .fetch_one(pool)
            .await
    }

    /// Find an order by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all orders, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders ORDER BY created_at DESC");
        sqlx::query_as::<_, Order>(&query).fetch_all(pool).await
    }

    /// Merge the supplied fields onto an order, returning the post-merge row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrder,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                produto = COALESCE($2, produto),
                cliente = COALESCE($3, cliente),
                email = COALESCE($4, email),
                telefone = COALESCE($5, telefone),
                endereco = COALESCE($6, endereco),
                observacao = COALESCE($7, observacao),
                valor_unitario = COALESCE($8, valor_unitario),
                frete = COALESCE($9, frete),
                valor_total = COALESCE($10, valor_total),
                previsao_entrega = COALESCE($11, previsao_entrega),
                imagem = COALESCE($12, imagem),
                imagens = COALESCE($13, imagens),
                status = COALESCE($14, status),
                mensagem_email = COALESCE($15, mensagem_email),
                mensagem_whatsapp = COALESCE($16, mensagem_whatsapp),
                nota_fiscal_path = COALESCE($17, nota_fiscal_path),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(&input.produto)
            .bind(&input.cliente)
            .bind(&input.email)
            .bind(&input.telefone)
            .bind(&input.endereco)
            .bind(&input.observacao)
            .bind(input.valor_unitario)
            .bind(input.frete)
            .bind(input.valor_total)
            .bind(input.previsao_entrega)
            .bind(&input.imagem)
            .bind(&input.imagens)
            .bind(&input.status)
            .bind(input.mensagem_email.clone().map(Json))
            .bind(input.mensagem_whatsapp.clone().map(Json))
            .bind(&input.nota_fiscal_path)
            .fetch_optional(pool)
            .await
    }

    /// Delete an order by ID, returning the deleted row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("DELETE FROM orders WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
