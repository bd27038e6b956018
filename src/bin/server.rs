use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::FalseyValueParser;
use kusa::config::DEFAULT_GITHUB_URL;
use kusa::server::{self, AppState};
use kusa::{GithubClient, logging};

#[derive(Parser)]
#[command(name = "kusa-server")]
#[command(version, about = "Serve today's GitHub contribution count over HTTP")]
struct Args {
    /// Listen address; ":8080" means every interface
    #[arg(long, env = "PORT", default_value = ":8080")]
    addr: String,

    /// Where profile pages are fetched from
    #[arg(long, env = "GITHUB_URL", default_value = DEFAULT_GITHUB_URL)]
    github_url: String,

    /// Enable debug logging
    #[arg(long, env = "KUSA_DEBUG", value_parser = FalseyValueParser::new())]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.debug);

    let state = AppState::new(Arc::new(GithubClient::new(args.github_url)));
    let addr = server::bind_addr(&args.addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, server::router(state))
        .await
        .context("server error")?;

    Ok(())
}
