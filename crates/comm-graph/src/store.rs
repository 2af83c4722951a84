// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory adjacency storage for the communication graph.
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{Communication, GraphError, NodeId, Weight};

/// A user vertex and its outgoing communications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserNode {
    id: NodeId,
    /// Outgoing edges: target → weight.
    communications: BTreeMap<NodeId, Weight>,
}

impl UserNode {
    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Outgoing `(target, weight)` pairs.
    pub fn communications(&self) -> impl Iterator<Item = (NodeId, Weight)> + '_ {
        self.communications.iter().map(|(t, w)| (*t, *w))
    }

    /// Number of outgoing edges.
    pub fn out_degree(&self) -> usize {
        self.communications.len()
    }
}

/// Weighted directed graph with dense node ids.
///
/// Populate with [`add_node`](CommGraph::add_node) and
/// [`add_edge`](CommGraph::add_edge), then share it read-only (typically as
/// `Arc<CommGraph>`). There is no removal; ids are never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommGraph {
    /// Nodes indexed by id.
    nodes: Vec<UserNode>,
    /// Reverse adjacency: target → sources with an edge into it.
    ///
    /// Keyed by target even when the target is not a node, mirroring the
    /// unchecked target in `add_edge`.
    incoming: BTreeMap<NodeId, BTreeSet<NodeId>>,
    edge_count: usize,
}

impl CommGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node with no outgoing edges and returns its id.
    ///
    /// The i-th call on a fresh graph returns `i`.
    pub fn add_node(&mut self) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(UserNode {
            id,
            communications: BTreeMap::new(),
        });
        id
    }

    /// Records the directed edge `source → target` with `weight`.
    ///
    /// An existing `(source, target)` edge has its weight replaced. `target`
    /// is not checked against the node range.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownSourceNode`] if `source` is not a node;
    /// the graph is left unchanged.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        weight: Weight,
    ) -> Result<(), GraphError> {
        let node_count = self.nodes.len();
        let Some(node) = self.nodes.get_mut(source) else {
            return Err(GraphError::UnknownSourceNode {
                id: source,
                node_count,
            });
        };
        match node.communications.insert(target, weight) {
            Some(previous) => {
                debug!(source, target, previous, weight, "communication weight replaced");
            }
            None => {
                self.edge_count += 1;
                self.incoming.entry(target).or_default().insert(source);
            }
        }
        Ok(())
    }

    /// Every node one directed hop from `id`, in either direction.
    ///
    /// Targets of `id`'s outgoing edges come first, then sources of edges into
    /// `id`. A node linked both ways appears twice, as does `id` itself when it
    /// has a self-loop. Callers should treat the order as unspecified.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(node) = self.nodes.get(id) {
            out.extend(node.communications.keys().copied());
        }
        if let Some(sources) = self.incoming.get(&id) {
            out.extend(sources.iter().copied());
        }
        out
    }

    /// All node ids, ascending: `[0, 1, ..., N-1]`.
    pub fn nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len()).collect()
    }

    /// All stored edges, one per `(source, target)` key.
    ///
    /// Concatenated across nodes in node-id order; order within a node is
    /// unspecified.
    pub fn edges(&self) -> Vec<Communication> {
        self.iter_edges().collect()
    }

    /// Iterates edges in the same order as [`edges`](CommGraph::edges).
    pub fn iter_edges(&self) -> impl Iterator<Item = Communication> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.communications
                .iter()
                .map(move |(target, weight)| Communication::new(node.id, *target, *weight))
        })
    }

    /// Edge at 1-based `position` within [`edges`](CommGraph::edges).
    ///
    /// Returns `None` for position 0 or past the last edge.
    pub fn edge_at(&self, position: usize) -> Option<Communication> {
        let index = position.checked_sub(1)?;
        self.iter_edges().nth(index)
    }

    /// Current weight of `source → target`, if that edge exists.
    pub fn weight(&self, source: NodeId, target: NodeId) -> Option<Weight> {
        self.nodes
            .get(source)
            .and_then(|node| node.communications.get(&target).copied())
    }

    /// Node lookup by id.
    pub fn node(&self, id: NodeId) -> Option<&UserNode> {
        self.nodes.get(id)
    }

    /// Number of nodes created so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct `(source, target)` edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` if no nodes exist.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut ids: Vec<NodeId>) -> Vec<NodeId> {
        ids.sort_unstable();
        ids
    }

    #[test]
    fn add_edge_rejects_unknown_source_and_leaves_graph_unchanged() {
        let mut graph = CommGraph::new();
        graph.add_node();
        let before = graph.clone();

        let err = graph.add_edge(1, 0, 3).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownSourceNode {
                id: 1,
                node_count: 1
            }
        );
        assert_eq!(graph, before);
    }

    #[test]
    fn add_edge_on_empty_graph_fails() {
        let mut graph = CommGraph::new();
        assert!(graph.add_edge(0, 0, 1).is_err());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn overwrite_keeps_reverse_index_single_entry() {
        let mut graph = CommGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        graph.add_edge(a, b, 1).unwrap();
        graph.add_edge(a, b, 9).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight(a, b), Some(9));
        assert_eq!(graph.neighbors(b), vec![a]);
        assert_eq!(graph.incoming.get(&b).map(BTreeSet::len), Some(1));
    }

    #[test]
    fn self_loop_is_reported_once_per_direction() {
        let mut graph = CommGraph::new();
        let a = graph.add_node();
        graph.add_edge(a, a, 2).unwrap();

        assert_eq!(graph.neighbors(a), vec![a, a]);
        assert_eq!(graph.edges(), vec![Communication::new(a, a, 2)]);
    }

    #[test]
    fn mutual_edges_yield_duplicate_neighbor() {
        let mut graph = CommGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        graph.add_edge(a, b, 1).unwrap();
        graph.add_edge(b, a, 1).unwrap();

        assert_eq!(graph.neighbors(a), vec![b, b]);
    }

    #[test]
    fn dangling_target_is_stored_and_discoverable() {
        let mut graph = CommGraph::new();
        let a = graph.add_node();
        graph.add_edge(a, 42, 7).unwrap();

        assert_eq!(graph.edges(), vec![Communication::new(a, 42, 7)]);
        assert_eq!(graph.neighbors(42), vec![a]);
        assert_eq!(graph.nodes(), vec![a]);
    }

    #[test]
    fn neighbors_of_unknown_id_is_empty() {
        let mut graph = CommGraph::new();
        graph.add_node();
        assert!(graph.neighbors(7).is_empty());
    }

    #[test]
    fn edge_at_is_one_based() {
        let mut graph = CommGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        graph.add_edge(a, b, 5).unwrap();
        graph.add_edge(b, a, 6).unwrap();

        assert_eq!(graph.edge_at(0), None);
        assert_eq!(graph.edge_at(1), Some(Communication::new(a, b, 5)));
        assert_eq!(graph.edge_at(2), Some(Communication::new(b, a, 6)));
        assert_eq!(graph.edge_at(3), None);
        assert_eq!(graph.edge_at(usize::MAX), None);
    }

    #[test]
    fn node_exposes_outgoing_communications() {
        let mut graph = CommGraph::new();
        let a = graph.add_node();
        let b = graph.add_node();
        let c = graph.add_node();
        graph.add_edge(a, c, 2).unwrap();
        graph.add_edge(a, b, 1).unwrap();

        let node = graph.node(a).unwrap();
        assert_eq!(node.id(), a);
        assert_eq!(node.out_degree(), 2);
        assert_eq!(
            sorted(node.communications().map(|(t, _)| t).collect()),
            vec![b, c]
        );
        assert!(graph.node(3).is_none());
    }
}
