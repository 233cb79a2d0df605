// Asset Hub API Server
// REST entry point for the asset management backend

mod config;
mod handlers;
mod jwt;
mod middleware;
mod routes;

use anyhow::Context;
use config::Config;
use dotenvy::dotenv;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub struct AppState {
    pub jwt: jwt::JwtService,
    pub users: dam_database::UserRepository,
    pub assets: dam_assets::AssetService,
    pub admin: dam_assets::AdminService,
    pub audit: dam_assets::AuditLedger,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,dam_api=debug,tower_http=debug".to_string()),
        )
        .init();

    tracing::info!("🚀 Starting Asset Hub API");
    tracing::info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env();
    tracing::info!("🔌 Server: {}:{}", config.server_host, config.server_port);

    // Initialize database
    tracing::info!("🗄️  Connecting to database...");
    let database = dam_database::Database::new(config.database.clone())
        .await
        .context("Failed to open database")?;
    database.migrate().await.context("Migration failed")?;
    database.ping().await.context("Database ping failed")?;
    tracing::info!("✅ Database ready");

    // Initialize JWT validation
    let jwt = jwt::JwtService::new(&config.jwt_secret);
    tracing::info!("🔐 JWT service initialized");

    // Create services
    let storage = dam_assets::ObjectStorage::from_env();
    let ledger = dam_assets::AuditLedger::new(database.pool().clone());
    let assets = dam_assets::AssetService::new(database.clone(), ledger.clone(), storage);
    let admin = dam_assets::AdminService::new(database.clone(), ledger.clone());
    let users = dam_database::UserRepository::new(database.pool().clone());
    tracing::info!("🗂️  Asset services initialized");

    // Seed the bootstrap admin if one is configured
    if let Some(email) = config.bootstrap_admin_email.as_deref() {
        if let Some(user) = admin
            .ensure_bootstrap_admin(email)
            .await
            .context("Bootstrap admin failed")?
        {
            tracing::info!(user_id = %user.id, "👤 Bootstrap admin ready");
        }
    }

    // Create app state
    let state = Arc::new(AppState {
        jwt,
        users,
        assets,
        admin,
        audit: ledger,
    });

    let cors = match config.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .context("Invalid CORS_ORIGIN")?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    // Create router
    let app = routes::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("✅ Server ready at http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
