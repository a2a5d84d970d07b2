use anyhow::Result;
use axum::Router;
use clap::Parser;
use fts_core::dump::load_path;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use fts_server::{build_app, build_state};
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Abstract dump to index at startup (file or directory); starts empty if omitted
    #[arg(long)]
    dump: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let documents = match &args.dump {
        Some(path) => load_path(path)?,
        None => Vec::new(),
    };
    let state = build_state(documents, std::env::var("ADMIN_TOKEN").ok())?;
    let stats = state.index.stats();
    tracing::info!(num_documents = stats.num_documents, num_terms = stats.num_terms, "index ready");
    let app: Router = build_app(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
