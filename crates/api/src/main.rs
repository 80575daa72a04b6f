use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

mod config;
mod guidance;
mod routes;
mod sources;
mod state;

use config::AppConfig;
use state::AppState;

#[derive(Parser)]
#[command(name = "orienta-api")]
#[command(about = "Vocational-guidance backend over the GVA open datasets", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to bind the HTTP server on (overrides ORIENTA_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::from_env();
    let bind = cli.bind.unwrap_or_else(|| config.bind.clone());

    let state = Arc::new(AppState::from_config(&config)?);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    log::info!("serving orientation API on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .target(env_logger::Target::Stderr)
        .init();
}
