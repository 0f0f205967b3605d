//! Tic-tac-toe chat service
//!
//! Serves the command endpoint over HTTP and sweeps stale games in the
//! background until interrupted.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ttt_api::session::run_sweeper;

#[derive(Parser, Debug)]
#[command(name = "ttt-api", about = "Play tic-tac-toe against a minimax AI by text message")]
struct Args {
    /// Address to listen on
    #[arg(short = 'l', long, env = "TTT_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen_addr: String,

    /// Games older than this are deleted
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u64).range(1..))]
    game_expiry_hours: u64,

    /// How often to look for expired games
    #[arg(long, default_value_t = 240, value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval_minutes: u64,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("interrupt received, shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let expiry = Duration::from_secs(args.game_expiry_hours * 60 * 60);
    let every = Duration::from_secs(args.sweep_interval_minutes * 60);

    let state = ttt_api::new_state();
    let sweeper = tokio::spawn(run_sweeper(state.clone(), every, expiry));

    let listener = tokio::net::TcpListener::bind(&args.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", args.listen_addr))?;
    info!(addr = %args.listen_addr, ?expiry, ?every, "listening via HTTP");

    axum::serve(listener, ttt_api::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweeper.abort();
    Ok(())
}
