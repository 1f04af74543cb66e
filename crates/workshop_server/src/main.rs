//! Workshop registration API server.
//!
//! # Usage
//!
//! ```bash
//! workshop-server --db-path ./workshop.db --port 3000
//! PORT=8080 WORKSHOP_LOG_DIR=/var/log/workshop workshop-server
//! ```

use anyhow::{anyhow, Context};
use clap::Parser;
use log::info;
use tokio::net::TcpListener;
use workshop_core::db::open_db;
use workshop_core::db::seed::seed_demo_data;
use workshop_core::{init_console_logging, init_logging};
use workshop_server::{build_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    let level = config.effective_log_level();
    match &config.log_dir {
        Some(dir) => init_logging(level, dir),
        None => init_console_logging(level),
    }
    .map_err(|err| anyhow!(err))
    .context("failed to initialize logging")?;

    let mut conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))?;
    if !config.no_seed {
        seed_demo_data(&mut conn).context("failed to seed demo data")?;
    }

    let app = build_router(AppState::new(conn));
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("event=server_start module=server status=ok addr={addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=server_signal module=server status=error error={err}");
        // Without a signal handler, run until the process is killed.
        std::future::pending::<()>().await;
    }
}
