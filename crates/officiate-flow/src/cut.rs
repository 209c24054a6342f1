//! Minimum cut extraction from a solved residual graph.
//!
//! After a maximum flow, the nodes still reachable from the source through
//! positive-residual arcs form the source side `S` of a minimum cut. The cut
//! capacity is the total *original* capacity of forward arcs leaving `S`,
//! which by max-flow/min-cut equals the flow value. Every such arc is
//! saturated.

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::GraphError;
use crate::residual::{Capacity, EdgeRef, NodeId, ResidualGraph};

/// A source/sink partition and the arcs crossing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinCut {
    /// `source_side[v]` is true when `v` is reachable from the source.
    pub source_side: Vec<bool>,
    /// Forward arcs from the source side to the sink side.
    #[serde(skip)]
    pub crossing: Vec<EdgeRef>,
    /// Sum of the original capacities of `crossing`.
    pub capacity: Capacity,
}

impl MinCut {
    /// True when `node` lies on the source side.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.source_side.get(node).copied().unwrap_or(false)
    }
}

/// Extract the minimum cut induced by residual reachability from `source`.
///
/// Call after a max-flow solve; on an unsolved graph this returns some cut,
/// not necessarily a minimum one.
///
/// # Errors
///
/// Returns [`GraphError::NodeOutOfRange`] for an invalid source and
/// [`GraphError::FlowOverflow`] if the cut capacity exceeds `u64`.
pub fn min_cut(graph: &ResidualGraph, source: NodeId) -> Result<MinCut, GraphError> {
    graph.check_node(source)?;

    let mut source_side = vec![false; graph.node_count()];
    let mut queue = VecDeque::from([source]);
    source_side[source] = true;

    while let Some(v) = queue.pop_front() {
        for edge in graph.edges(v) {
            if edge.residual() > 0 && !source_side[edge.to()] {
                source_side[edge.to()] = true;
                queue.push_back(edge.to());
            }
        }
    }

    let mut crossing = Vec::new();
    let mut capacity: Capacity = 0;
    for (node, reachable) in source_side.iter().enumerate() {
        if !reachable {
            continue;
        }
        for (offset, edge) in graph.edges(node).iter().enumerate() {
            if edge.is_forward() && !source_side[edge.to()] {
                crossing.push(EdgeRef { node, offset });
                capacity =
                    capacity
                        .checked_add(edge.original())
                        .ok_or(GraphError::FlowOverflow {
                            accumulated: capacity,
                            pushed: edge.original(),
                        })?;
            }
        }
    }

    Ok(MinCut {
        source_side,
        crossing,
        capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dinic::max_flow;

    #[test]
    fn cut_capacity_equals_max_flow() {
        let mut g = ResidualGraph::new(4);
        for (from, to, cap) in [(0, 1, 3), (0, 2, 2), (1, 2, 5), (1, 3, 2), (2, 3, 3)] {
            g.add_edge(from, to, cap).expect("edge");
        }
        let flow = max_flow(&mut g, 0, 3).expect("solve");
        let cut = min_cut(&g, 0).expect("cut");

        assert_eq!(flow, 5);
        assert_eq!(cut.capacity, flow);
        assert!(cut.contains(0));
        assert!(!cut.contains(3));
        for edge in &cut.crossing {
            assert_eq!(g.residual(*edge), 0, "crossing arcs are saturated");
        }
    }

    #[test]
    fn unreachable_sink_gives_empty_cut() {
        let mut g = ResidualGraph::new(3);
        g.add_edge(0, 1, 4).expect("edge");
        let flow = max_flow(&mut g, 0, 2).expect("solve");
        let cut = min_cut(&g, 0).expect("cut");
        assert_eq!(flow, 0);
        assert_eq!(cut.capacity, 0);
        assert!(cut.crossing.is_empty());
        assert!(cut.contains(1));
    }

    #[test]
    fn bottleneck_arc_is_the_cut() {
        let mut g = ResidualGraph::new(4);
        g.add_edge(0, 1, 10).expect("edge");
        let narrow = g.add_edge(1, 2, 1).expect("edge");
        g.add_edge(2, 3, 10).expect("edge");
        max_flow(&mut g, 0, 3).expect("solve");

        let cut = min_cut(&g, 0).expect("cut");
        assert_eq!(cut.crossing, vec![narrow]);
        assert_eq!(cut.capacity, 1);
    }
}
