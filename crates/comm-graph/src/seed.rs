// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Startup population of a [`CommGraph`], expressed as data.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::{CommGraph, Communication, GraphError};

/// Error type for seed loading and graph construction.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Seed document was not valid JSON for [`GraphSeed`].
    #[error("seed parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// A seeded communication referenced an unknown source node.
    #[error("seed graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Users to create and communications to record, applied in order.
///
/// JSON form: `{"users": 4, "communications": [[0, 1, 1], [1, 2, 5]]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphSeed {
    /// Number of users; they receive ids `0..users`.
    pub users: usize,
    /// Edges added after all users exist. Later entries overwrite earlier
    /// ones with the same `(source, target)`.
    #[serde(default)]
    pub communications: Vec<Communication>,
}

impl GraphSeed {
    /// Built-in demo population: four users and four communications.
    pub fn demo() -> Self {
        Self {
            users: 4,
            communications: vec![
                Communication::new(0, 1, 1),
                Communication::new(1, 2, 5),
                Communication::new(0, 3, 1),
                Communication::new(3, 1, 4),
            ],
        }
    }

    /// Parses a JSON seed document.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SeedError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Creates a fresh graph and applies this seed to it.
    ///
    /// Stops at the first communication whose source is not a user.
    #[instrument(skip(self), fields(users = self.users, communications = self.communications.len()))]
    pub fn build(&self) -> Result<CommGraph, SeedError> {
        let mut graph = CommGraph::new();
        for _ in 0..self.users {
            graph.add_node();
        }
        for edge in &self.communications {
            graph.add_edge(edge.source, edge.target, edge.weight)?;
        }
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph seeded"
        );
        Ok(graph)
    }
}

impl Default for GraphSeed {
    fn default() -> Self {
        Self::demo()
    }
}
