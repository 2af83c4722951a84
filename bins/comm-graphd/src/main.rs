// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Communication graph daemon (comm-graphd)
//!
//! Builds the user communication graph once at startup, then serves it
//! read-only as JSON over HTTP.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use comm_graph::GraphSeed;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;

use api::{AppState, MissingEdge};

#[derive(Parser, Debug)]
#[command(author, version, about = "Read-only HTTP API over the user communication graph")]
struct Args {
    /// TCP listen address for the HTTP API
    #[arg(long, default_value = "0.0.0.0:8000")]
    listen: SocketAddr,
    /// JSON seed file (`{"users": N, "communications": [[src, dst, weight], ...]}`).
    /// The built-in demo graph is used when omitted.
    #[arg(long)]
    seed: Option<PathBuf>,
    /// Response for `GET /graph/{id}` when no edge exists at that position
    #[arg(long, value_enum, default_value_t = MissingEdge::Empty)]
    missing_edge: MissingEdge,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    info!("Starting comm-graphd...");
    let seed = load_seed(args.seed.as_deref())?;
    let graph = seed.build().context("build graph from seed")?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        missing_edge = ?args.missing_edge,
        "graph ready"
    );

    let app = api::router(AppState::new(graph, args.missing_edge));
    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("bind {}", args.listen))?;
    info!("HTTP API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;

    info!("comm-graphd stopped");
    Ok(())
}

/// Reads the seed file at `path`, or falls back to the built-in demo seed.
fn load_seed(path: Option<&Path>) -> Result<GraphSeed> {
    let Some(path) = path else {
        info!("using built-in demo seed");
        return Ok(GraphSeed::demo());
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("read seed file {}", path.display()))?;
    let seed = GraphSeed::from_json_slice(&bytes)
        .with_context(|| format!("parse seed file {}", path.display()))?;
    info!(path = %path.display(), users = seed.users, "loaded seed file");
    Ok(seed)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(?err, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
