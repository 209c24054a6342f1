//! Capacitated residual multigraph.
//!
//! # Overview
//!
//! Every call to [`ResidualGraph::add_edge`] appends a forward arc with the
//! requested capacity and a paired reverse arc with capacity 0. Each arc
//! records the offset of its partner in the partner's adjacency list, so a
//! push updates both sides in O(1):
//!
//! ```text
//! adjacency[u][i] = Edge { to: v, rev: j, .. }
//! adjacency[v][j] = Edge { to: u, rev: i, .. }
//! ```
//!
//! Arcs are addressed by [`EdgeRef`] `(node, offset)` pairs rather than by
//! references into the adjacency lists, so the solver can hold a path of
//! arcs while mutating capacities. Arcs are never removed.

#![allow(clippy::module_name_repetitions)]

use crate::error::GraphError;

/// Index of a vertex in a [`ResidualGraph`].
pub type NodeId = usize;
/// Edge capacity and flow quantity.
pub type Capacity = u64;

/// Position of an arc: the `offset`-th outgoing arc of `node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeRef {
    pub node: NodeId,
    pub offset: usize,
}

/// One directed arc of the residual graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    to: NodeId,
    rev: usize,
    residual: Capacity,
    original: Capacity,
    forward: bool,
}

impl Edge {
    /// Head of the arc.
    #[must_use]
    pub const fn to(&self) -> NodeId {
        self.to
    }

    /// Remaining pushable capacity.
    #[must_use]
    pub const fn residual(&self) -> Capacity {
        self.residual
    }

    /// Capacity at construction; 0 for reverse arcs.
    #[must_use]
    pub const fn original(&self) -> Capacity {
        self.original
    }

    /// True for arcs created with a caller-supplied capacity.
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        self.forward
    }
}

/// Adjacency-list residual graph over nodes `0..node_count`.
#[derive(Debug, Clone, Default)]
pub struct ResidualGraph {
    adjacency: Vec<Vec<Edge>>,
    forward_edges: usize,
}

impl ResidualGraph {
    /// Create a graph with `node_count` isolated nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            forward_edges: 0,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of forward arcs added (reverse arcs are not counted).
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.forward_edges
    }

    /// Return an error unless `node` is a valid index.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeOutOfRange`] for `node >= node_count`.
    pub fn check_node(&self, node: NodeId) -> Result<(), GraphError> {
        if node < self.adjacency.len() {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange {
                node,
                node_count: self.adjacency.len(),
            })
        }
    }

    /// Append a forward arc `from → to` with `capacity` and its reverse arc.
    ///
    /// Returns the position of the forward arc. Both endpoints are checked
    /// before anything is appended.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeOutOfRange`] if either endpoint is invalid.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    ) -> Result<EdgeRef, GraphError> {
        self.check_node(from)?;
        self.check_node(to)?;

        let forward_offset = self.adjacency[from].len();
        // A self-loop's reverse arc lands right after the forward arc.
        let reverse_offset = if from == to {
            forward_offset + 1
        } else {
            self.adjacency[to].len()
        };

        self.adjacency[from].push(Edge {
            to,
            rev: reverse_offset,
            residual: capacity,
            original: capacity,
            forward: true,
        });
        self.adjacency[to].push(Edge {
            to: from,
            rev: forward_offset,
            residual: 0,
            original: 0,
            forward: false,
        });
        self.forward_edges += 1;

        Ok(EdgeRef {
            node: from,
            offset: forward_offset,
        })
    }

    /// Outgoing arcs of `node` (forward and reverse). Empty for an invalid
    /// node.
    #[must_use]
    pub fn edges(&self, node: NodeId) -> &[Edge] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    /// The arc at `edge`, if it exists.
    #[must_use]
    pub fn edge(&self, edge: EdgeRef) -> Option<&Edge> {
        self.adjacency.get(edge.node)?.get(edge.offset)
    }

    /// Position of the arc paired with `edge`.
    #[must_use]
    pub fn reverse_of(&self, edge: EdgeRef) -> Option<EdgeRef> {
        self.edge(edge).map(|e| EdgeRef {
            node: e.to,
            offset: e.rev,
        })
    }

    /// Remaining capacity at `edge`, 0 if it does not exist.
    #[must_use]
    pub fn residual(&self, edge: EdgeRef) -> Capacity {
        self.edge(edge).map_or(0, Edge::residual)
    }

    /// Move `amount` units of capacity from `edge` to its paired arc.
    ///
    /// `amount` must not exceed the arc's residual capacity; the solver only
    /// pushes path bottlenecks, which satisfy this by construction.
    pub(crate) fn push(&mut self, edge: EdgeRef, amount: Capacity) {
        let Some(reverse) = self.reverse_of(edge) else {
            return;
        };
        let arc = &mut self.adjacency[edge.node][edge.offset];
        debug_assert!(amount <= arc.residual, "push exceeds residual capacity");
        arc.residual -= amount;
        self.adjacency[reverse.node][reverse.offset].residual += amount;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
