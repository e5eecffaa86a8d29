use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth};
use service::auth::token::TokenWindows;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Security settings from config file with env fallbacks.
fn load_auth_config() -> auth::ServerAuthConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => auth::ServerAuthConfig {
            jwt_secret: cfg.security.jwt_secret,
            windows: TokenWindows {
                access_minutes: cfg.security.access_token_expire_minutes,
                refresh_days: cfg.security.refresh_token_expire_days,
            },
        },
        Err(_) => auth::ServerAuthConfig {
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string()),
            windows: TokenWindows::default(),
        },
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // DB connection (pooled from config when available)
    let db = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => models::db::connect_with(&cfg.database).await?,
        Err(_) => models::db::connect().await?,
    };

    // Apply pending migrations at boot
    migration::Migrator::up(&db, None).await?;

    let state = auth::ServerState {
        db,
        auth: load_auth_config(),
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting obe api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
