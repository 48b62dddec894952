//! s-t minimum cuts for graphs with terminal weights.
//!
//! A [`FlowGraph`] is built by allocating nodes, adding terminal weights (capacities of the edges
//! from the source and to the sink) and adding pairs of directed edges between nodes. The two
//! terminals are implicit. Calling [`FlowGraph::max_flow`] consumes the graph, so it cannot be
//! modified after solving, and returns a [`MinCut`] with the cut value and the side of every node.
//!
//! Terminal weights are accumulated the same way they are in the Boykov-Kolmogorov graph
//! representation: only the difference between the source and sink capacity of a node is stored
//! and the common part is added to the flow directly. This makes repeated calls additive and
//! also accepts negative terminal weights.
use log::debug;

mod dinic;

/// Index of a node of a [`FlowGraph`].
pub type NodeId = usize;

/// Side of a minimum cut.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Source,
    Sink,
}

/// A pair of opposing arcs stored as consecutive entries.
#[derive(Copy, Clone, Debug)]
struct Arc {
    head: NodeId,
    cap: f64,
}

/// Capacitated directed graph with implicit source and sink terminals.
#[derive(Default)]
pub struct FlowGraph {
    /// Net terminal capacity per node, positive towards the source, negative towards the sink.
    terminal: Vec<f64>,
    /// Arc `2 * i` and its sister `2 * i + 1` form one edge pair.
    arcs: Vec<Arc>,
    /// Flow accounted for while adding terminal weights.
    flow: f64,
}

impl FlowGraph {
    /// Create an empty graph.
    pub fn new() -> FlowGraph {
        FlowGraph::default()
    }

    /// Create an empty graph, reserving space for the given number of nodes and edges.
    pub fn with_capacity(node_hint: usize, edge_hint: usize) -> FlowGraph {
        FlowGraph {
            terminal: Vec::with_capacity(node_hint),
            arcs: Vec::with_capacity(edge_hint * 2),
            flow: 0.0,
        }
    }

    /// Adds `count` nodes and returns the index of the first one.
    ///
    /// The new nodes are numbered consecutively.
    pub fn add_nodes(&mut self, count: usize) -> NodeId {
        let first = self.terminal.len();
        self.terminal.resize(first + count, 0.0);
        first
    }

    /// Number of nodes, not counting the terminals.
    pub fn node_count(&self) -> usize {
        self.terminal.len()
    }

    /// Number of edge pairs added with [`add_edge`](FlowGraph::add_edge).
    pub fn edge_count(&self) -> usize {
        self.arcs.len() / 2
    }

    /// Adds capacity to the edges from the source to `node` and from `node` to the sink.
    ///
    /// Repeated calls for the same node accumulate.
    pub fn add_terminal_weights(&mut self, node: NodeId, source_cap: f64, sink_cap: f64) {
        let delta = self.terminal[node];
        let (mut source_cap, mut sink_cap) = (source_cap, sink_cap);
        if delta > 0.0 {
            source_cap += delta;
        } else {
            sink_cap -= delta;
        }
        self.flow += source_cap.min(sink_cap);
        self.terminal[node] = source_cap - sink_cap;
    }

    /// Adds an edge from `from` to `to` with capacity `cap` and the reverse edge with capacity
    /// `rev_cap`.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, cap: f64, rev_cap: f64) {
        debug_assert!(from < self.node_count() && to < self.node_count());
        debug_assert!(cap >= 0.0 && rev_cap >= 0.0);
        self.arcs.push(Arc { head: to, cap });
        self.arcs.push(Arc {
            head: from,
            cap: rev_cap,
        });
    }

    /// Computes a maximum flow and the corresponding minimum cut.
    pub fn max_flow(self) -> MinCut {
        let node_count = self.node_count();
        let FlowGraph {
            terminal,
            arcs,
            flow,
        } = self;

        let mut network = dinic::Network::new(node_count, arcs.len() / 2 + node_count);
        for pair in arcs.chunks_exact(2) {
            network.add_arc_pair(pair[1].head, pair[0].head, pair[0].cap, pair[1].cap);
        }
        let (source, sink) = (network.source(), network.sink());
        for (node, &cap) in terminal.iter().enumerate() {
            if cap > 0.0 {
                network.add_arc_pair(source, node, cap, 0.0);
            } else if cap < 0.0 {
                network.add_arc_pair(node, sink, -cap, 0.0);
            }
        }

        let augmented = network.run();
        debug!(
            "max-flow on {} nodes: {} from terminal weights, {} augmented",
            node_count, flow, augmented
        );

        let can_reach_sink = network.can_reach_sink();
        let segments = can_reach_sink[..node_count]
            .iter()
            .map(|&reaches| {
                if reaches {
                    Segment::Sink
                } else {
                    Segment::Source
                }
            })
            .collect();

        MinCut {
            value: flow + augmented,
            segments,
        }
    }
}

/// Result of [`FlowGraph::max_flow`].
#[derive(Clone, Debug)]
pub struct MinCut {
    value: f64,
    segments: Vec<Segment>,
}

impl MinCut {
    /// Value of the minimum cut, equal to the maximum flow.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Side of the cut a node belongs to.
    ///
    /// A node is on the sink side iff it can reach the sink in the residual network, so nodes not
    /// connected to anything are on the source side.
    pub fn segment(&self, node: NodeId) -> Segment {
        self.segments[node]
    }

    /// Number of nodes, not counting the terminals.
    pub fn node_count(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::{collection, prelude::*};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn simple_cut() {
        // source -> 0 -> 1 -> sink with a bottleneck in the middle
        let mut graph = FlowGraph::new();
        let first = graph.add_nodes(2);
        assert_eq!(first, 0);
        graph.add_terminal_weights(0, 5.0, 0.0);
        graph.add_terminal_weights(1, 0.0, 4.0);
        graph.add_edge(0, 1, 3.0, 0.0);

        let cut = graph.max_flow();
        assert!(close(cut.value(), 3.0));
        assert_eq!(cut.segment(0), Segment::Source);
        assert_eq!(cut.segment(1), Segment::Sink);
    }

    #[test]
    fn terminal_weights_accumulate() {
        let mut graph = FlowGraph::new();
        graph.add_nodes(1);
        graph.add_terminal_weights(0, 2.0, 0.0);
        graph.add_terminal_weights(0, 0.0, 3.0);
        graph.add_terminal_weights(0, 1.5, 0.0);

        // source 3.5, sink 3.0: cheapest to cut the sink edge
        let cut = graph.max_flow();
        assert!(close(cut.value(), 3.0));
        assert_eq!(cut.segment(0), Segment::Source);
    }

    #[test]
    fn negative_terminal_weights() {
        let mut graph = FlowGraph::new();
        graph.add_nodes(1);
        graph.add_terminal_weights(0, -1.0, 2.0);

        let cut = graph.max_flow();
        assert!(close(cut.value(), -1.0));
        assert_eq!(cut.segment(0), Segment::Sink);
    }

    #[test]
    fn isolated_nodes_default_to_source() {
        let mut graph = FlowGraph::with_capacity(3, 0);
        graph.add_nodes(3);
        let cut = graph.max_flow();
        assert_eq!(cut.node_count(), 3);
        assert_eq!(cut.value(), 0.0);
        for node in 0..3 {
            assert_eq!(cut.segment(node), Segment::Source);
        }
    }

    #[test]
    fn reverse_capacity() {
        let mut graph = FlowGraph::new();
        graph.add_nodes(2);
        graph.add_terminal_weights(0, 0.0, 10.0);
        graph.add_terminal_weights(1, 10.0, 0.0);
        graph.add_edge(0, 1, 0.0, 2.5);
        assert_eq!(graph.edge_count(), 1);

        let cut = graph.max_flow();
        assert!(close(cut.value(), 2.5));
        assert_eq!(cut.segment(0), Segment::Sink);
        assert_eq!(cut.segment(1), Segment::Source);
    }

    type Instance = (Vec<(f64, f64)>, Vec<(usize, usize, f64, f64)>);

    fn instance() -> impl Strategy<Value = Instance> {
        (1..7usize).prop_flat_map(|nodes| {
            (
                collection::vec((0.0..10.0, 0.0..10.0), nodes),
                collection::vec((0..nodes, 0..nodes, 0.0..5.0, 0.0..5.0), 0..15),
            )
        })
    }

    fn cut_cost(instance: &Instance, source_side: &[bool]) -> f64 {
        let (terminal, edges) = instance;
        let mut cost = 0.0;
        for (node, &(source_cap, sink_cap)) in terminal.iter().enumerate() {
            cost += if source_side[node] { sink_cap } else { source_cap };
        }
        for &(from, to, cap, rev_cap) in edges.iter() {
            if source_side[from] && !source_side[to] {
                cost += cap;
            }
            if source_side[to] && !source_side[from] {
                cost += rev_cap;
            }
        }
        cost
    }

    proptest! {
        #[test]
        fn matches_brute_force(instance in instance()) {
            let (terminal, edges) = &instance;
            let mut graph = FlowGraph::new();
            graph.add_nodes(terminal.len());
            for (node, &(source_cap, sink_cap)) in terminal.iter().enumerate() {
                graph.add_terminal_weights(node, source_cap, sink_cap);
            }
            for &(from, to, cap, rev_cap) in edges.iter() {
                graph.add_edge(from, to, cap, rev_cap);
            }

            let cut = graph.max_flow();

            let source_side: Vec<bool> = (0..terminal.len())
                .map(|node| cut.segment(node) == Segment::Source)
                .collect();
            prop_assert!(close(cut.value(), cut_cost(&instance, &source_side)));

            let best = (0..1usize << terminal.len())
                .map(|mask| {
                    let sides: Vec<bool> =
                        (0..terminal.len()).map(|node| mask & (1 << node) != 0).collect();
                    cut_cost(&instance, &sides)
                })
                .fold(std::f64::INFINITY, f64::min);
            prop_assert!(close(cut.value(), best));
        }
    }
}
