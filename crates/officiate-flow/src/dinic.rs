//! Dinic's maximum-flow algorithm.
//!
//! # Algorithm
//!
//! 1. **Level phase**: BFS from the source over arcs with positive residual
//!    capacity, labelling each reached node with its hop distance. If the
//!    sink is not reached the accumulated flow is maximal.
//! 2. **Blocking-flow phase**: repeated DFS walks from the source that only
//!    follow arcs into the next level with positive residual capacity. Each
//!    node keeps a current-arc pointer that only moves forward during the
//!    phase, so an arc found useless is never examined again until the next
//!    level phase. Every walk that reaches the sink pushes its bottleneck.
//! 3. Repeat until a level phase fails to reach the sink.
//!
//! The DFS is iterative: the current path is an explicit stack of
//! [`EdgeRef`]s, so deep level graphs cannot overflow the call stack.
//!
//! Worst case is O(V²·E); on the four-tier referee network the number of
//! phases is bounded by the few distinct augmenting path lengths.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::residual::{Capacity, EdgeRef, NodeId, ResidualGraph};

const UNREACHED: usize = usize::MAX;

/// Reusable solver state: level labels, current-arc pointers and scratch
/// buffers sized to the graph on each solve.
#[derive(Debug, Default, Clone)]
pub struct Dinic {
    level: Vec<usize>,
    next_arc: Vec<usize>,
    queue: VecDeque<NodeId>,
    path: Vec<EdgeRef>,
    phases: usize,
    augmenting_paths: usize,
}

impl Dinic {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of level phases that reached the sink in the last solve.
    #[must_use]
    pub const fn phases(&self) -> usize {
        self.phases
    }

    /// Number of augmenting paths pushed in the last solve.
    #[must_use]
    pub const fn augmenting_paths(&self) -> usize {
        self.augmenting_paths
    }

    /// Compute the value of a maximum `source`–`sink` flow.
    ///
    /// `graph` is left in its final residual state; rebuild it before solving
    /// again.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeOutOfRange`] for an invalid terminal,
    /// [`GraphError::SameTerminal`] when `source == sink`, and
    /// [`GraphError::FlowOverflow`] if the total exceeds `u64`.
    #[instrument(skip(self, graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
    pub fn max_flow(
        &mut self,
        graph: &mut ResidualGraph,
        source: NodeId,
        sink: NodeId,
    ) -> Result<Capacity, GraphError> {
        graph.check_node(source)?;
        graph.check_node(sink)?;
        if source == sink {
            return Err(GraphError::SameTerminal { node: source });
        }

        let n = graph.node_count();
        self.level.clear();
        self.level.resize(n, UNREACHED);
        self.next_arc.clear();
        self.next_arc.resize(n, 0);
        self.phases = 0;
        self.augmenting_paths = 0;

        let mut total: Capacity = 0;
        while self.build_levels(graph, source, sink) {
            self.phases += 1;
            self.next_arc.fill(0);

            let mut phase_flow: Capacity = 0;
            while let Some(pushed) = self.augment(graph, source, sink) {
                self.augmenting_paths += 1;
                phase_flow = phase_flow
                    .checked_add(pushed)
                    .ok_or(GraphError::FlowOverflow {
                        accumulated: phase_flow,
                        pushed,
                    })?;
            }

            total = total
                .checked_add(phase_flow)
                .ok_or(GraphError::FlowOverflow {
                    accumulated: total,
                    pushed: phase_flow,
                })?;

            debug!(
                phase = self.phases,
                sink_level = self.level[sink],
                phase_flow,
                total,
                "blocking flow phase complete"
            );
        }

        debug!(
            total,
            phases = self.phases,
            augmenting_paths = self.augmenting_paths,
            "max flow computed"
        );
        Ok(total)
    }

    /// BFS over positive-residual arcs. Returns whether `sink` was reached.
    fn build_levels(&mut self, graph: &ResidualGraph, source: NodeId, sink: NodeId) -> bool {
        self.level.fill(UNREACHED);
        self.queue.clear();

        self.level[source] = 0;
        self.queue.push_back(source);

        while let Some(v) = self.queue.pop_front() {
            let next = self.level[v] + 1;
            for edge in graph.edges(v) {
                if edge.residual() > 0 && self.level[edge.to()] == UNREACHED {
                    self.level[edge.to()] = next;
                    self.queue.push_back(edge.to());
                }
            }
        }

        self.level[sink] != UNREACHED
    }

    /// Find one augmenting path in the current level graph and push its
    /// bottleneck. Returns `None` once the phase is blocked.
    fn augment(
        &mut self,
        graph: &mut ResidualGraph,
        source: NodeId,
        sink: NodeId,
    ) -> Option<Capacity> {
        self.path.clear();
        let mut v = source;

        loop {
            if v == sink {
                let bottleneck = self
                    .path
                    .iter()
                    .map(|&edge| graph.residual(edge))
                    .min()?;
                for &edge in &self.path {
                    graph.push(edge, bottleneck);
                }
                return Some(bottleneck);
            }

            let edges = graph.edges(v);
            let mut advanced = None;
            while self.next_arc[v] < edges.len() {
                let offset = self.next_arc[v];
                let edge = &edges[offset];
                if edge.residual() > 0 && self.level[edge.to()] == self.level[v] + 1 {
                    advanced = Some((EdgeRef { node: v, offset }, edge.to()));
                    break;
                }
                self.next_arc[v] += 1;
            }

            if let Some((edge, head)) = advanced {
                self.path.push(edge);
                v = head;
            } else {
                // Dead end: retreat one arc and skip it from the tail.
                let edge = self.path.pop()?;
                v = edge.node;
                self.next_arc[v] += 1;
            }
        }
    }
}

/// Compute a maximum `source`–`sink` flow with a fresh [`Dinic`] solver.
///
/// # Errors
///
/// See [`Dinic::max_flow`].
pub fn max_flow(
    graph: &mut ResidualGraph,
    source: NodeId,
    sink: NodeId,
) -> Result<Capacity, GraphError> {
    Dinic::new().max_flow(graph, source, sink)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(NodeId, NodeId, Capacity)]) -> ResidualGraph {
        let mut g = ResidualGraph::new(n);
        for &(from, to, cap) in edges {
            g.add_edge(from, to, cap).expect("valid edge");
        }
        g
    }

    #[test]
    fn single_edge() {
        let mut g = graph(2, &[(0, 1, 7)]);
        assert_eq!(max_flow(&mut g, 0, 1), Ok(7));
    }

    #[test]
    fn disconnected_sink_has_zero_flow() {
        let mut g = graph(3, &[(0, 1, 7)]);
        let mut solver = Dinic::new();
        assert_eq!(solver.max_flow(&mut g, 0, 2), Ok(0));
        assert_eq!(solver.phases(), 0);
    }

    #[test]
    fn classic_textbook_network() {
        // CLRS figure 26.1: max flow 23.
        let mut g = graph(
            6,
            &[
                (0, 1, 16),
                (0, 2, 13),
                (1, 3, 12),
                (2, 1, 4),
                (2, 4, 14),
                (3, 2, 9),
                (3, 5, 20),
                (4, 3, 7),
                (4, 5, 4),
            ],
        );
        assert_eq!(max_flow(&mut g, 0, 5), Ok(23));
    }

    #[test]
    fn flow_uses_reverse_arcs_to_reroute() {
        // Greedy 0→1→2→3 blocks both paths unless flow on 1→2 is cancelled.
        let mut g = graph(
            4,
            &[(0, 1, 1), (0, 2, 1), (1, 2, 1), (1, 3, 1), (2, 3, 1)],
        );
        assert_eq!(max_flow(&mut g, 0, 3), Ok(2));
    }

    #[test]
    fn parallel_edges_add_up() {
        let mut g = graph(2, &[(0, 1, 3), (0, 1, 4)]);
        assert_eq!(max_flow(&mut g, 0, 1), Ok(7));
    }

    #[test]
    fn self_loops_and_zero_capacity_edges_are_ignored() {
        let mut g = graph(3, &[(0, 0, 9), (0, 1, 0), (0, 2, 2), (2, 2, 5), (2, 1, 3)]);
        assert_eq!(max_flow(&mut g, 0, 1), Ok(2));
    }

    #[test]
    fn long_chain_does_not_recurse() {
        let n = 50_000;
        let edges: Vec<_> = (0..n - 1).map(|i| (i, i + 1, 3)).collect();
        let mut g = graph(n, &edges);
        assert_eq!(max_flow(&mut g, 0, n - 1), Ok(3));
    }

    #[test]
    fn residual_state_reflects_flow() {
        let mut g = graph(3, &[(0, 1, 5), (1, 2, 3)]);
        assert_eq!(max_flow(&mut g, 0, 2), Ok(3));
        let first = EdgeRef { node: 0, offset: 0 };
        assert_eq!(g.residual(first), 2);
        let arc = g.edge(first).expect("edge");
        assert_eq!(arc.original() - arc.residual(), 3);
    }

    #[test]
    fn invalid_terminals_are_rejected() {
        let mut g = graph(2, &[(0, 1, 1)]);
        assert_eq!(
            max_flow(&mut g, 0, 0),
            Err(GraphError::SameTerminal { node: 0 })
        );
        assert_eq!(
            max_flow(&mut g, 0, 9),
            Err(GraphError::NodeOutOfRange {
                node: 9,
                node_count: 2
            })
        );
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        let mut g = graph(2, &[(0, 1, u64::MAX), (0, 1, 1)]);
        let err = max_flow(&mut g, 0, 1).expect_err("sum exceeds u64");
        assert!(matches!(err, GraphError::FlowOverflow { .. }));
    }

    #[test]
    fn solver_can_be_reused_across_graphs() {
        let mut solver = Dinic::new();
        let mut small = graph(2, &[(0, 1, 4)]);
        let mut larger = graph(4, &[(0, 1, 2), (1, 3, 2), (0, 2, 5), (2, 3, 1)]);
        assert_eq!(solver.max_flow(&mut small, 0, 1), Ok(4));
        assert_eq!(solver.max_flow(&mut larger, 0, 3), Ok(3));
        assert_eq!(solver.phases(), 1);
        assert_eq!(solver.augmenting_paths(), 2);
    }
}
