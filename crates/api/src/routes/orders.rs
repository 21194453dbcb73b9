//! Route definitions for orders.
//!
//! Mounted at `/orders` by `build_app_router`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Order routes.
///
/// ```text
/// GET    /                      -> list_orders
/// POST   /                      -> create_order
/// POST   /com-imagem            -> create_order_with_images (multipart, up to 5 images)
/// POST   /upload                -> upload_order_pdf (multipart, returns unsaved draft)
/// GET    /{id}                  -> get_order
/// PATCH  /{id}                  -> update_order
/// DELETE /{id}                  -> delete_order
/// POST   /{id}/upload-nota      -> upload_invoice (multipart, single file)
/// POST   /{id}/enviar-email     -> send_order_email (multipart, up to 10 attachments)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route("/com-imagem", post(orders::create_order_with_images))
        .route("/upload", post(orders::upload_order_pdf))
        .route(
            "/{id}",
            get(orders::get_order)
                .patch(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/{id}/upload-nota", post(orders::upload_invoice))
        .route("/{id}/enviar-email", post(orders::send_order_email))
}
