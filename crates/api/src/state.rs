use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: geotoy_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the PDF extraction microservice.
    pub extractor: Arc<geotoy_extractor::ExtractorClient>,
    /// SMTP mailer; `None` when `EMAIL_FROM` is unset, in which case every
    /// dispatch is logged and skipped.
    pub mailer: Option<Arc<geotoy_mailer::Mailer>>,
}
