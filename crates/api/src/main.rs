use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geotoy_api::config::ServerConfig;
use geotoy_api::router::build_app_router;
use geotoy_api::state::AppState;
use geotoy_api::uploads::UploadStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geotoy_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = geotoy_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    geotoy_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    geotoy_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Upload storage ---
    let store = UploadStore::new(config.upload_dir.clone());
    store
        .ensure_dirs()
        .await
        .expect("Failed to create upload directories");
    tracing::info!(dir = %config.upload_dir.display(), "Upload directories ready");

    // --- Extraction client ---
    let extractor = Arc::new(geotoy_extractor::ExtractorClient::new(
        config.extractor_url.clone(),
    ));

    // --- Mailer (optional; orders still work without it) ---
    let mailer = match geotoy_mailer::MailerConfig::from_env() {
        Some(mail_config) => match geotoy_mailer::Mailer::new(mail_config) {
            Ok(mailer) => {
                tracing::info!("SMTP transport ready");
                Some(Arc::new(mailer))
            }
            Err(err) => {
                tracing::warn!(error = %err, "SMTP misconfigured; email dispatch disabled");
                None
            }
        },
        None => {
            tracing::warn!("EMAIL_FROM not set; email dispatch disabled");
            None
        }
    };

    // --- App state and router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        extractor,
        mailer,
    };
    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app).await.expect("Server error");
}
