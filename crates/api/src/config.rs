use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGIN`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the PDF extraction microservice.
    pub extractor_url: String,
    /// Root directory for uploaded files, served under `/uploads/`.
    pub upload_dir: PathBuf,
    /// Public base URL used to build stored image links.
    pub public_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `3000`                   |
    /// | `CORS_ORIGIN`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    /// | `EXTRACTOR_URL`        | `http://localhost:8000`  |
    /// | `UPLOAD_DIR`           | `./uploads`              |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000`  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let extractor_url =
            std::env::var("EXTRACTOR_URL").unwrap_or_else(|_| "http://localhost:8000".into());

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into()));

        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            extractor_url,
            upload_dir,
            public_base_url,
        }
    }
}
