//! Capacity graph construction.
use log::debug;

use linenv_maxflow::{FlowGraph, MinCut, NodeId};

/// Flow network under construction.
///
/// Only grows: nodes and capacities are added, never removed. Solving consumes the graph.
pub struct CapacityGraph {
    flow: FlowGraph,
    elided_edges: usize,
}

impl CapacityGraph {
    pub fn new(node_hint: usize, edge_hint: usize) -> CapacityGraph {
        CapacityGraph {
            flow: FlowGraph::with_capacity(node_hint, edge_hint),
            elided_edges: 0,
        }
    }

    /// Allocates `count` consecutive nodes and returns the first one.
    pub fn create_nodes(&mut self, count: usize) -> NodeId {
        self.flow.add_nodes(count)
    }

    /// Adds to the capacities of the edges between `node` and the terminals.
    pub fn add_terminal_capacities(&mut self, node: NodeId, to_source: f64, to_sink: f64) {
        if to_source == 0.0 && to_sink == 0.0 {
            return;
        }
        self.flow.add_terminal_weights(node, to_source, to_sink);
    }

    /// Adds an edge pair, skipping it when both capacities are zero.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, forward: f64, backward: f64) {
        if forward == 0.0 && backward == 0.0 {
            self.elided_edges += 1;
            return;
        }
        self.flow.add_edge(from, to, forward, backward);
    }

    pub fn node_count(&self) -> usize {
        self.flow.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.flow.edge_count()
    }

    pub fn solve(self) -> MinCut {
        debug!(
            "capacity graph has {} nodes and {} edges ({} zero capacity edges elided)",
            self.node_count(),
            self.edge_count(),
            self.elided_edges
        );
        self.flow.max_flow()
    }
}
