//! `uno-server` binary: reads its settings from the environment and runs
//! the room server until interrupted.
//!
//! | Variable                 | Default   |
//! |--------------------------|-----------|
//! | `HOST`                   | `0.0.0.0` |
//! | `PORT`                   | `3001`    |
//! | `UNO_IDLE_TIMEOUT_SECS`  | unset     |
//! | `UNO_REPORT_REJECTIONS`  | `false`   |
//! | `UNO_RECYCLE_DISCARD`    | `false`   |
//!
//! Log verbosity comes from `RUST_LOG` (default `info`).

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use uno_server::prelude::*;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());

    let mut room_config = RoomConfig::default();
    room_config.game.recycle_discard = env_flag("UNO_RECYCLE_DISCARD");

    let mut builder = UnoServer::builder()
        .bind(&format!("{host}:{port}"))
        .room_config(room_config);

    if let Some(secs) = std::env::var("UNO_IDLE_TIMEOUT_SECS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
    {
        builder = builder.idle_timeout(Duration::from_secs(secs));
    }
    if env_flag("UNO_REPORT_REJECTIONS") {
        builder = builder.rejection_policy(ReportRejections);
    }

    let server = builder.build().await?;

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}

/// `1`, `true`, `yes` and `on` (any case) count as set.
fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
