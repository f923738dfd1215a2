use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tenant_console::config;
use tenant_console::is_development;
use tenant_console::server::{self, issue_token, AppState, TenantStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, TENANT_API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting tenant API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let mut store = TenantStore::new();
    let admin = if config.server.seed_defaults {
        Some(
            store
                .seed_defaults(&config.server.admin_username)
                .map_err(|e| anyhow::anyhow!("failed to seed defaults: {}", e))?,
        )
    } else {
        None
    };

    let state = AppState::new(store, config);

    if is_development!() {
        if let Some(admin) = &admin {
            let token = issue_token(&state, admin).context("failed to issue admin token")?;
            tracing::info!("Development token for '{}': {}", admin.username, token);
        }
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Tenant API listening on http://{}", bind_addr);

    server::serve(listener, state, config)
        .await
        .context("server error")
}
