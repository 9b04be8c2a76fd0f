#![forbid(unsafe_code)]

use health_api::{build_router, AppState, ServerConfig};
use health_core::{init_logging, open_db, open_db_in_memory, Mediator};
use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = ServerConfig::from_env().map_err(|err| err.to_string())?;
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    let conn = if config.uses_in_memory_db() {
        open_db_in_memory()
    } else {
        open_db(&config.db_path)
    }
    .map_err(|err| {
        error!(
            "event=server_start module=server status=error db_path={} error={}",
            config.db_path, err
        );
        format!("failed to open database `{}`: {err}", config.db_path)
    })?;

    let state = AppState::new(Mediator::new(conn)).with_max_body_bytes(config.max_body_bytes);
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| format!("failed to bind {}: {err}", config.bind_addr))?;

    info!(
        "event=server_start module=server status=ok bind_addr={} db_path={} max_body_bytes={}",
        config.bind_addr, config.db_path, config.max_body_bytes
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| format!("server failed: {err}"))?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
