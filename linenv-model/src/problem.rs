//! Energy minimization problems.
use crate::clique::CliqueTable;
use crate::envelope::Envelope;
use crate::index::Var;

/// Unary potential of a single variable.
///
/// The names follow the terminal edges of the flow network: `source` is the capacity of the edge
/// from the source and is paid when the variable is labeled 0, `sink` is the capacity of the edge
/// to the sink and is paid when the variable is labeled 1.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Unary {
    pub source: f64,
    pub sink: f64,
}

impl Unary {
    pub fn new(source: f64, sink: f64) -> Unary {
        Unary { source, sink }
    }

    /// Cost of assigning the given label.
    pub fn cost(&self, label: bool) -> f64 {
        if label {
            self.sink
        } else {
            self.source
        }
    }
}

/// Pairwise term paying `weight` whenever `u` and `v` receive different labels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pairwise {
    pub u: Var,
    pub v: Var,
    pub weight: f64,
}

impl Pairwise {
    pub fn new(u: Var, v: Var, weight: f64) -> Pairwise {
        Pairwise { u, v, weight }
    }

    /// Cost of this term under a labeling.
    pub fn cost(&self, labeling: &[bool]) -> f64 {
        if labeling[self.u.index()] != labeling[self.v.index()] {
            self.weight
        } else {
            0.0
        }
    }
}

/// A binary random field with pairwise terms and lower linear envelope clique potentials.
///
/// The problem stores its data as given. Checking that indices are in range and that the
/// potentials admit an exact reduction happens when running inference on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Problem {
    unary: Vec<Unary>,
    pairwise: Vec<Pairwise>,
    envelope: Envelope,
    cliques: CliqueTable,
}

impl Problem {
    /// Create a problem without variables.
    pub fn new() -> Problem {
        Problem::default()
    }

    /// Create a problem with one variable per unary potential.
    pub fn from_unary(unary: impl IntoIterator<Item = Unary>) -> Problem {
        Problem {
            unary: unary.into_iter().collect(),
            ..Problem::default()
        }
    }

    /// Number of variables.
    pub fn var_count(&self) -> usize {
        self.unary.len()
    }

    /// Adds a variable with the given unary potential.
    pub fn add_var(&mut self, unary: Unary) -> Var {
        let var = Var::from_index(self.unary.len());
        self.unary.push(unary);
        var
    }

    /// Adds a pairwise term.
    pub fn add_pairwise(&mut self, u: Var, v: Var, weight: f64) {
        self.pairwise.push(Pairwise::new(u, v, weight));
    }

    /// Replace the envelope shared by all cliques.
    pub fn set_envelope(&mut self, envelope: Envelope) {
        self.envelope = envelope;
    }

    /// Replace the clique assignment table.
    pub fn set_cliques(&mut self, cliques: CliqueTable) {
        self.cliques = cliques;
    }

    pub fn unary(&self) -> &[Unary] {
        &self.unary
    }

    pub fn unary_mut(&mut self) -> &mut [Unary] {
        &mut self.unary
    }

    pub fn pairwise(&self) -> &[Pairwise] {
        &self.pairwise
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn cliques(&self) -> &CliqueTable {
        &self.cliques
    }
}

#[cfg(any(test, feature = "proptest-strategies"))]
#[doc(hidden)]
pub mod strategy {
    use super::*;

    use proptest::{collection::SizeRange, prelude::*, *};

    use crate::index::strategy::var;

    pub fn unary(cost: std::ops::Range<f64>) -> impl Strategy<Value = Unary> {
        (cost.clone(), cost).prop_map(|(source, sink)| Unary::new(source, sink))
    }

    /// Problems without higher-order potentials.
    pub fn pairwise_problem(
        vars: impl Strategy<Value = usize>,
        edges: impl Into<SizeRange>,
    ) -> impl Strategy<Value = Problem> {
        let edges = edges.into();
        vars.prop_ind_flat_map(move |vars| {
            (
                collection::vec(unary(0.0..10.0), vars),
                collection::vec(
                    (
                        var(0..vars),
                        var(0..vars),
                        prop_oneof![Just(0.0), 0.0..5.0],
                    ),
                    edges.clone(),
                ),
            )
                .prop_map(|(unary, edges)| {
                    let mut problem = Problem::from_unary(unary);
                    for (u, v, weight) in edges {
                        problem.add_pairwise(u, v, weight);
                    }
                    problem
                })
        })
    }
}
