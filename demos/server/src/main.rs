//! Dicehall server binary.
//!
//! Listens on `DICEHALL_ADDR` (default `0.0.0.0:8080`). Log verbosity comes
//! from `RUST_LOG` and defaults to `info`.

use dicehall::prelude::*;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

fn bind_addr(configured: Option<String>) -> String {
    configured
        .filter(|addr| !addr.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = bind_addr(std::env::var("DICEHALL_ADDR").ok());
    let server = DicehallServer::builder()
        .bind(&addr)
        .room_config(RoomConfig::default())
        .build()
        .await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    server.run().await?;
    Ok(())
}
