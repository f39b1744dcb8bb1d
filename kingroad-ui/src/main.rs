//! KingRoad UI server - hosts one route store and serves its panels over HTTP.

mod routes;
mod sse;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kingroad::io::config::load_config;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "kingroad-ui")]
#[command(about = "HTTP host for the KingRoad route manager")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Directory holding config.toml and the persisted route history
    #[arg(long, default_value = ".kingroad")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kingroad_ui=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = load_config(&args.data_dir.join("config.toml")).context("load kingroad config")?;
    info!(data_dir = %args.data_dir.display(), "starting kingroad-ui");

    let state = AppState::new(args.data_dir.clone(), config)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::build_app(state).layer(cors);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
