use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use cargo_pos::config::environment::EnvironmentConfig;
use cargo_pos::database::{create_pool, mask_database_url};
use cargo_pos::middleware::cors::cors_middleware;
use cargo_pos::routes;
use cargo_pos::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Configure logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Cargo POS - Logistics Point of Sale API");
    info!("==========================================");

    let config = EnvironmentConfig::from_env()?;

    // Initialize database
    let database_url = std::env::var("DATABASE_URL").ok();
    if let Some(url) = &database_url {
        info!("📦 Connecting to {}", mask_database_url(url));
    }
    let pool = match create_pool(database_url.as_deref()).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error connecting to the database: {}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .nest("/api/voucher", routes::voucher_routes::create_voucher_router())
        .nest(
            "/api/consignment",
            routes::consignment_routes::create_consignment_router(),
        )
        .nest("/api/region", routes::region_routes::create_region_router())
        .layer(cors_middleware())
        .with_state(app_state);

    info!("🌐 Server starting on http://{}", addr);
    info!("🔍 Available endpoints:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /api/auth/login - Login");
    info!("🎫 Vouchers:");
    info!("   POST /api/voucher - Create voucher");
    info!("   GET  /api/voucher - List vouchers (scoped)");
    info!("   GET  /api/voucher/:id - Get voucher");
    info!("   POST /api/voucher/:id/status - Change status");
    info!("   POST /api/voucher/bulk-status - Bulk status change");
    info!("   GET  /api/voucher/:id/logs - Status history");
    info!("🚛 Consignments:");
    info!("   POST /api/consignment - Create consignment");
    info!("   GET  /api/consignment - List consignments (scoped)");
    info!("   GET  /api/consignment/:id - Get consignment");
    info!("   POST /api/consignment/:id/status - Change status");
    info!("   GET  /api/consignment/:id/logs - Status history");
    info!("   GET  /api/consignment/:id/vouchers - Attached vouchers");
    info!("   POST /api/consignment/:id/vouchers - Attach vouchers");
    info!("   DELETE /api/consignment/:id/vouchers/:voucher_id - Detach voucher");
    info!("🌏 Regions:");
    info!("   POST /api/region - Create region");
    info!("   GET  /api/region - List regions");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}

/// Liveness probe
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "cargo-pos",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
