//! Reduction of lower linear envelope potentials to pairwise terms.
//!
//! A clique with member slot fraction `x̄` and envelope pieces `(a_k, b_k)` is represented by
//! one auxiliary node `z_k` per level `k = 1..K`. Every member slot pays `a_0 / m` when labeled
//! 1 and, per level, `(a_{k-1} - a_k) / m` when labeled 0 while `z_k` is labeled 1. The node
//! `z_k` itself pays `a_{k-1} - a_k` when labeled 0 and `b_k - b_{k-1}` when labeled 1. Minimizing
//! over the auxiliary labels leaves `min_k (a_k x̄ + b_k)` up to a per clique constant, provided
//! the slope drops and intercept rises are positive.
use log::warn;

use linenv_maxflow::NodeId;
use linenv_model::{CliqueId, Problem};

use crate::cliques::CliqueSizes;
use crate::graph::CapacityGraph;
use crate::validate::Level;

/// Graph nodes of every clique's auxiliary chain.
#[derive(Clone, Debug, Default)]
pub struct AuxiliaryChains {
    levels: usize,
    chains: Vec<Vec<NodeId>>,
}

impl AuxiliaryChains {
    /// Node of the auxiliary variable for `level` (1-based) of `clique`.
    pub fn node(&self, clique: CliqueId, level: usize) -> NodeId {
        self.chains[clique.index()][level - 1]
    }

    /// Number of auxiliary nodes in every chain.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Chains in clique order, nodes in level order.
    pub fn iter(&self) -> impl Iterator<Item = (CliqueId, &[NodeId])> + '_ {
        self.chains
            .iter()
            .enumerate()
            .map(|(index, chain)| (CliqueId::from_index(index), &chain[..]))
    }
}

/// Adds the envelope potential of every clique to the graph.
///
/// Variable `i` must be node `var_base + i`. Allocates `K - 1` auxiliary nodes for every clique
/// id, including empty cliques and skipped levels, whose nodes stay unconnected. `levels` are the
/// retained levels of the problem's envelope.
pub fn encode_envelopes(
    graph: &mut CapacityGraph,
    problem: &Problem,
    sizes: &CliqueSizes,
    levels: &[Level],
    var_base: NodeId,
) -> AuxiliaryChains {
    let envelope = problem.envelope();
    let first_slope = match envelope.slopes().first() {
        Some(&slope) => slope,
        None => return AuxiliaryChains::default(),
    };
    let level_count = envelope.len() - 1;

    let mut chains = AuxiliaryChains {
        levels: level_count,
        chains: Vec::with_capacity(sizes.len()),
    };
    for (clique, size) in sizes.iter() {
        if size == 0 {
            warn!("clique {} is empty", clique);
        }
        let first = graph.create_nodes(level_count);
        chains.chains.push((first..first + level_count).collect());
    }

    for (var, clique) in problem.cliques().iter() {
        let weight = sizes.weight(clique);
        let node = var_base + var.index();
        graph.add_terminal_capacities(node, 0.0, first_slope * weight);
        for level in levels {
            graph.add_edge(
                node,
                chains.node(clique, level.index),
                0.0,
                weight * level.slope_drop,
            );
        }
    }

    for (clique, size) in sizes.iter() {
        if size == 0 {
            continue;
        }
        for level in levels {
            graph.add_terminal_capacities(
                chains.node(clique, level.index),
                level.slope_drop,
                level.intercept_rise,
            );
        }
    }

    chains
}

#[cfg(test)]
mod tests {
    use super::*;

    use linenv_maxflow::Segment;
    use linenv_model::{CliqueTable, Envelope, Unary};

    use crate::validate::envelope_levels;

    fn encode(problem: &Problem) -> (CapacityGraph, AuxiliaryChains) {
        let mut graph = CapacityGraph::new(0, 0);
        graph.create_nodes(problem.var_count());
        let sizes = CliqueSizes::index(problem.cliques());
        let levels = envelope_levels(problem.envelope(), 1e-6).unwrap();
        let chains = encode_envelopes(&mut graph, problem, &sizes, &levels, 0);
        (graph, chains)
    }

    fn three_vars(pieces: Vec<(f64, f64)>, rows: Vec<Vec<CliqueId>>) -> Problem {
        let mut problem = Problem::from_unary(vec![Unary::new(0.0, 0.0); 3]);
        problem.set_envelope(Envelope::from_pieces(pieces));
        problem.set_cliques(CliqueTable::from_memberships(rows));
        problem
    }

    #[test]
    fn chain_layout() {
        let c = CliqueId::from_one_based;
        let problem = three_vars(
            vec![(3.0, 0.0), (2.0, 0.2), (2.0, 0.2), (0.0, 1.0)],
            vec![vec![c(1)], vec![c(1), c(3)], vec![c(3)]],
        );
        let (graph, chains) = encode(&problem);

        assert_eq!(chains.iter().count(), 3);
        assert_eq!(chains.levels(), 3);
        assert_eq!(graph.node_count(), 3 + 3 * 3);
        assert_eq!(chains.iter().next(), Some((c(1), &[3, 4, 5][..])));
        assert_eq!(chains.node(c(2), 1), 6);
        assert_eq!(chains.node(c(3), 3), 11);
        // two retained levels for each of the four member slots
        assert_eq!(graph.edge_count(), 8);
    }

    #[test]
    fn single_piece_has_no_chain() {
        let c = CliqueId::from_one_based;
        let problem = three_vars(vec![(3.0, 1.0)], vec![vec![c(1)], vec![c(1)], vec![c(1)]]);
        let (graph, chains) = encode(&problem);

        assert_eq!(chains.levels(), 0);
        assert_eq!(chains.iter().count(), 1);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 0);

        // every member pays a third of the slope when labeled 1
        let cut = graph.solve();
        assert!(cut.value().abs() < 1e-12);
        for node in 0..3 {
            assert_eq!(cut.segment(node), Segment::Sink);
        }
    }

    #[test]
    fn envelope_value_is_recovered() {
        // f(x̄) = min(2 x̄, 0.5) with both members forced to 1
        let c = CliqueId::from_one_based;
        let mut problem = Problem::from_unary(vec![Unary::new(100.0, 0.0); 2]);
        problem.set_envelope(Envelope::from_pieces(vec![(2.0, 0.0), (0.0, 0.5)]));
        problem.set_cliques(CliqueTable::from_memberships(vec![vec![c(1)], vec![c(1)]]));
        let (graph, chains) = encode(&problem);

        let cut = graph.solve();
        // offset = (2 - 0) - 0
        assert!((cut.value() - (0.5 + 2.0)).abs() < 1e-9);
        assert_eq!(cut.segment(0), Segment::Source);
        assert_eq!(cut.segment(chains.node(c(1), 1)), Segment::Source);
    }

    #[test]
    fn empty_envelope() {
        let problem = three_vars(vec![], vec![vec![CliqueId::from_index(0)]]);
        let (graph, chains) = encode(&problem);
        assert_eq!(chains.iter().count(), 0);
        assert_eq!(graph.node_count(), 3);
    }
}
