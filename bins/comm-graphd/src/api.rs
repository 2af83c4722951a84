// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP routes over a frozen [`CommGraph`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use comm_graph::{CommGraph, Communication};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Response for `GET /graph/{id}` when no edge sits at the requested position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MissingEdge {
    /// `200 OK` with an empty JSON object (wire-compatible default).
    #[default]
    Empty,
    /// `404 Not Found` with `{"error": ...}`.
    NotFound,
}

/// Shared handler state. The graph is immutable once served.
#[derive(Clone)]
pub struct AppState {
    graph: Arc<CommGraph>,
    missing_edge: MissingEdge,
}

impl AppState {
    /// Wraps a fully built graph for serving.
    pub fn new(graph: CommGraph, missing_edge: MissingEdge) -> Self {
        Self {
            graph: Arc::new(graph),
            missing_edge,
        }
    }
}

/// Builds the router: `GET /graph` and `GET /graph/:id`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/graph", get(list_edges))
        .route("/graph/:id", get(edge_by_position))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_edges(State(state): State<AppState>) -> Json<Vec<Communication>> {
    Json(state.graph.edges())
}

async fn edge_by_position(State(state): State<AppState>, Path(raw): Path<String>) -> Response {
    if let Some(edge) = parse_position(&raw).and_then(|pos| state.graph.edge_at(pos)) {
        return Json(edge).into_response();
    }
    debug!(id = %raw, edges = state.graph.edge_count(), "no edge at position");
    match state.missing_edge {
        MissingEdge::Empty => Json(json!({})).into_response(),
        MissingEdge::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no edge at position {raw}") })),
        )
            .into_response(),
    }
}

/// Accepts only the canonical decimal form of a positive integer.
fn parse_position(raw: &str) -> Option<usize> {
    if raw.is_empty() || raw.starts_with('0') || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
