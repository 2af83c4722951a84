// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Weighted directed graph of users and their pairwise communication weights.
//!
//! [`CommGraph`] stores users as dense, sequentially numbered nodes. Each node
//! owns its outgoing edges (target → weight); a reverse index keeps neighbor
//! lookups independent of graph size. [`GraphSeed`] describes the one-time
//! startup population as data, so the serving layer can build a graph, freeze
//! it behind an `Arc`, and share it immutably.
//!
//! # Ordering
//!
//! Edge enumeration order is unspecified to callers. The current storage is
//! ordered (ascending source, then ascending target), which makes positional
//! lookups via [`CommGraph::edge_at`] stable for an unchanged graph.
#![forbid(unsafe_code)]

mod seed;
mod store;

pub use seed::{GraphSeed, SeedError};
pub use store::{CommGraph, UserNode};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dense, sequential user identifier (position in the node sequence).
pub type NodeId = usize;
/// Communication weight carried by a directed edge.
pub type Weight = i64;

/// A directed, weighted edge keyed by `(source, target)`.
///
/// Serializes as the JSON array `[source, target, weight]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(
    from = "(NodeId, NodeId, Weight)",
    into = "(NodeId, NodeId, Weight)"
)]
pub struct Communication {
    /// Node the edge leaves.
    pub source: NodeId,
    /// Node the edge points at.
    pub target: NodeId,
    /// Edge weight.
    pub weight: Weight,
}

impl Communication {
    /// Convenience constructor.
    pub const fn new(source: NodeId, target: NodeId, weight: Weight) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }
}

impl From<(NodeId, NodeId, Weight)> for Communication {
    fn from((source, target, weight): (NodeId, NodeId, Weight)) -> Self {
        Self::new(source, target, weight)
    }
}

impl From<Communication> for (NodeId, NodeId, Weight) {
    fn from(edge: Communication) -> Self {
        (edge.source, edge.target, edge.weight)
    }
}

/// Errors raised by graph mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    /// `add_edge` named a source id outside `[0, node_count)`.
    #[error("[GRAPH_UNKNOWN_NODE] unknown source node {id} (graph has {node_count} nodes)")]
    UnknownSourceNode {
        /// The rejected source id.
        id: NodeId,
        /// Node count at the time of the call.
        node_count: usize,
    },
}
