//! Mapping a minimum cut back to labelings.
use linenv_maxflow::{MinCut, NodeId, Segment};
use linenv_model::CliqueId;

use crate::envelope::AuxiliaryChains;

fn label(cut: &MinCut, node: NodeId) -> bool {
    cut.segment(node) == Segment::Source
}

/// Labels of `count` consecutive nodes starting at `first`, true on the source side.
pub fn decode_labeling(cut: &MinCut, first: NodeId, count: usize) -> Vec<bool> {
    (first..first + count).map(|node| label(cut, node)).collect()
}

/// Labels of the auxiliary variables, grouped by clique in level order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuxiliaryLabeling {
    levels: usize,
    values: Vec<bool>,
}

impl AuxiliaryLabeling {
    pub fn decode(cut: &MinCut, chains: &AuxiliaryChains) -> AuxiliaryLabeling {
        AuxiliaryLabeling {
            levels: chains.levels(),
            values: chains
                .iter()
                .flat_map(|(_, chain)| chain.iter().map(|&node| label(cut, node)))
                .collect(),
        }
    }

    /// Number of auxiliary variables per clique.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of cliques covered.
    ///
    /// Zero when there are no auxiliary variables.
    pub fn clique_count(&self) -> usize {
        if self.levels == 0 {
            0
        } else {
            self.values.len() / self.levels
        }
    }

    /// Labels of one clique's chain.
    pub fn chain(&self, clique: CliqueId) -> &[bool] {
        let begin = clique.index() * self.levels;
        &self.values[begin..begin + self.levels]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CliqueId, &[bool])> + '_ {
        (0..self.clique_count()).map(move |index| {
            let clique = CliqueId::from_index(index);
            (clique, self.chain(clique))
        })
    }

    /// All labels, clique by clique.
    pub fn as_slice(&self) -> &[bool] {
        &self.values
    }
}
