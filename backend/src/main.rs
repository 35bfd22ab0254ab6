//! # Backend Service
//!
//! Thin entry point that delegates to lib-web for server setup.

use lib_web::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3001".to_string());

    let mut config = ServerConfig {
        bind_address,
        migrations_path: "migrations",
        ..Default::default()
    };

    // The public origin must be allowed to call the API with credentials.
    if let Ok(origin) = std::env::var("APP_ORIGIN") {
        if !config.allowed_origins.contains(&origin) {
            config.allowed_origins.push(origin);
        }
    }

    start_server(config).await
}
