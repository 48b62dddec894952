//! Dinic's blocking flow algorithm.
use std::collections::VecDeque;

use crate::NodeId;

#[derive(Copy, Clone, Debug)]
struct ResidualArc {
    head: NodeId,
    cap: f64,
}

/// Residual network with explicit terminal nodes.
///
/// Arcs are stored in pairs, the sister of arc `a` is `a ^ 1`.
pub struct Network {
    arcs: Vec<ResidualArc>,
    outgoing: Vec<Vec<usize>>,
    level: Vec<i32>,
    next_arc: Vec<usize>,
}

impl Network {
    /// Create a network with `node_count` inner nodes plus source and sink.
    pub fn new(node_count: usize, pair_hint: usize) -> Network {
        Network {
            arcs: Vec::with_capacity(pair_hint * 2),
            outgoing: vec![vec![]; node_count + 2],
            level: vec![-1; node_count + 2],
            next_arc: vec![0; node_count + 2],
        }
    }

    pub fn source(&self) -> NodeId {
        self.outgoing.len() - 2
    }

    pub fn sink(&self) -> NodeId {
        self.outgoing.len() - 1
    }

    /// Adds the arc `from -> to` with capacity `cap` and its sister with capacity `rev_cap`.
    pub fn add_arc_pair(&mut self, from: NodeId, to: NodeId, cap: f64, rev_cap: f64) {
        if cap <= 0.0 && rev_cap <= 0.0 {
            return;
        }
        let index = self.arcs.len();
        self.arcs.push(ResidualArc { head: to, cap });
        self.arcs.push(ResidualArc {
            head: from,
            cap: rev_cap,
        });
        self.outgoing[from].push(index);
        self.outgoing[to].push(index + 1);
    }

    /// Saturates the network and returns the total augmented flow.
    pub fn run(&mut self) -> f64 {
        let mut total = 0.0;
        while self.build_levels() {
            for next in self.next_arc.iter_mut() {
                *next = 0;
            }
            total += self.blocking_flow();
        }
        total
    }

    /// Breadth first search from the source, returns whether the sink is reachable.
    fn build_levels(&mut self) -> bool {
        let source = self.source();
        for level in self.level.iter_mut() {
            *level = -1;
        }
        self.level[source] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(node) = queue.pop_front() {
            for &arc in self.outgoing[node].iter() {
                let ResidualArc { head, cap } = self.arcs[arc];
                if cap > 0.0 && self.level[head] < 0 {
                    self.level[head] = self.level[node] + 1;
                    queue.push_back(head);
                }
            }
        }
        self.level[self.sink()] >= 0
    }

    /// Augments along shortest paths until no path in the level graph remains.
    ///
    /// Iterative to keep the stack depth independent of the path length.
    fn blocking_flow(&mut self) -> f64 {
        let (source, sink) = (self.source(), self.sink());
        let mut total = 0.0;
        let mut path: Vec<usize> = vec![];
        let mut node = source;

        loop {
            if node == sink {
                let bottleneck = path
                    .iter()
                    .map(|&arc| self.arcs[arc].cap)
                    .fold(std::f64::INFINITY, f64::min);
                for &arc in path.iter() {
                    self.arcs[arc].cap -= bottleneck;
                    self.arcs[arc ^ 1].cap += bottleneck;
                }
                total += bottleneck;

                // Retreat to the tail of the first saturated arc
                let saturated = path
                    .iter()
                    .position(|&arc| self.arcs[arc].cap <= 0.0)
                    .unwrap_or(0);
                node = self.arcs[path[saturated] ^ 1].head;
                path.truncate(saturated);
                continue;
            }

            let mut advanced = false;
            while self.next_arc[node] < self.outgoing[node].len() {
                let arc = self.outgoing[node][self.next_arc[node]];
                let ResidualArc { head, cap } = self.arcs[arc];
                if cap > 0.0 && self.level[head] == self.level[node] + 1 {
                    path.push(arc);
                    node = head;
                    advanced = true;
                    break;
                }
                self.next_arc[node] += 1;
            }

            if !advanced {
                // Dead end, remove the node from the level graph
                self.level[node] = -1;
                match path.pop() {
                    Some(arc) => {
                        node = self.arcs[arc ^ 1].head;
                        self.next_arc[node] += 1;
                    }
                    None => break,
                }
            }
        }
        total
    }

    /// Marks the nodes that can reach the sink through arcs with residual capacity.
    pub fn can_reach_sink(&self) -> Vec<bool> {
        let sink = self.sink();
        let mut reaches = vec![false; self.outgoing.len()];
        reaches[sink] = true;

        let mut queue = VecDeque::new();
        queue.push_back(sink);
        while let Some(node) = queue.pop_front() {
            // Every arc leaving `node` is the sister of an arc entering it
            for &arc in self.outgoing[node].iter() {
                let entering = arc ^ 1;
                let tail = self.arcs[arc].head;
                if self.arcs[entering].cap > 0.0 && !reaches[tail] {
                    reaches[tail] = true;
                    queue.push_back(tail);
                }
            }
        }
        reaches
    }
}
