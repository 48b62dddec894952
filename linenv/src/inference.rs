//! Exact inference by a single minimum cut.
use log::info;

use linenv_model::{CliqueId, Problem, Table};

use crate::cliques::CliqueSizes;
use crate::config::{InferenceConfig, InferenceConfigUpdate};
use crate::decode::{decode_labeling, AuxiliaryLabeling};
use crate::envelope::{encode_envelopes, AuxiliaryChains};
use crate::error::{ConfigError, InferenceError};
use crate::graph::CapacityGraph;
use crate::load::problem_from_tables;
use crate::validate::{envelope_levels, validate_problem};

/// Usage information returned for an unsupported number of outputs.
pub const USAGE: &str = "usage: [labeling, energy, auxiliary] = \
                         infer(unary, pairwise, coeffs, cliques), requesting 1 to 3 outputs";

/// Results requested from an inference call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outputs {
    Labeling,
    LabelingAndEnergy,
    /// Also decode the labels of the auxiliary variables.
    All,
}

impl Outputs {
    /// Outputs for a requested result count between 1 and 3.
    pub fn from_count(count: usize) -> Result<Outputs, InferenceError> {
        match count {
            1 => Ok(Outputs::Labeling),
            2 => Ok(Outputs::LabelingAndEnergy),
            3 => Ok(Outputs::All),
            _ => Err(InferenceError::Usage {
                usage: USAGE.to_owned(),
            }),
        }
    }

    pub fn count(self) -> usize {
        match self {
            Outputs::Labeling => 1,
            Outputs::LabelingAndEnergy => 2,
            Outputs::All => 3,
        }
    }
}

impl Default for Outputs {
    fn default() -> Outputs {
        Outputs::LabelingAndEnergy
    }
}

/// A minimizing labeling and its energy.
#[derive(Clone, Debug)]
pub struct Solution {
    labeling: Vec<bool>,
    energy: f64,
    auxiliary: Option<AuxiliaryLabeling>,
    empty_cliques: Vec<CliqueId>,
}

impl Solution {
    /// Label of every variable, true for 1.
    pub fn labeling(&self) -> &[bool] {
        &self.labeling
    }

    /// Value of the minimum cut.
    ///
    /// This is the reduced energy of the labeling, see [`crate::energy`].
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Labels of the auxiliary variables, present only when all outputs were requested.
    pub fn auxiliary(&self) -> Option<&AuxiliaryLabeling> {
        self.auxiliary.as_ref()
    }

    /// Clique ids below the largest referenced one that have no members.
    pub fn empty_cliques(&self) -> &[CliqueId] {
        &self.empty_cliques
    }
}

/// Minimizes energies of binary random fields with lower linear envelope potentials.
#[derive(Default)]
pub struct Inference {
    config: InferenceConfig,
}

impl Inference {
    /// Create an instance using the default configuration.
    pub fn new() -> Inference {
        Inference::default()
    }

    pub fn with_config(config: InferenceConfig) -> Inference {
        Inference { config }
    }

    /// Change the configuration.
    pub fn config(&mut self, update: &InferenceConfigUpdate) -> Result<(), ConfigError> {
        update.apply(&mut self.config)
    }

    /// Finds a labeling of minimal energy.
    ///
    /// All checks happen before the flow network is built.
    pub fn infer(&self, problem: &Problem, outputs: Outputs) -> Result<Solution, InferenceError> {
        validate_problem(problem)?;
        let envelope = problem.envelope();
        let levels = envelope_levels(envelope, self.config.epsilon)?;

        let var_count = problem.var_count();
        let sizes = if envelope.is_empty() {
            CliqueSizes::default()
        } else {
            CliqueSizes::index(problem.cliques())
        };
        let level_count = envelope.len().saturating_sub(1);
        let node_hint = var_count + sizes.len() * level_count;
        let edge_hint = problem.pairwise().len() + problem.cliques().iter().count() * levels.len();

        let mut graph = CapacityGraph::new(node_hint, edge_hint);
        let var_base = graph.create_nodes(var_count);

        info!("adding {} unary terms", var_count);
        for (index, unary) in problem.unary().iter().enumerate() {
            graph.add_terminal_capacities(var_base + index, unary.source, unary.sink);
        }

        info!("adding {} pairwise terms", problem.pairwise().len());
        for pairwise in problem.pairwise() {
            graph.add_edge(
                var_base + pairwise.u.index(),
                var_base + pairwise.v.index(),
                pairwise.weight,
                pairwise.weight,
            );
        }

        let chains = if envelope.is_empty() {
            AuxiliaryChains::default()
        } else {
            info!(
                "{} higher-order cliques (maximum of {} cliques per variable)",
                sizes.len(),
                problem.cliques().slots()
            );
            info!("adding {} linear envelope potentials", sizes.len());
            encode_envelopes(&mut graph, problem, &sizes, &levels, var_base)
        };

        let cut = graph.solve();
        info!("min-cut has value {}", cut.value());

        let auxiliary = match outputs {
            Outputs::All => Some(AuxiliaryLabeling::decode(&cut, &chains)),
            _ => None,
        };

        Ok(Solution {
            labeling: decode_labeling(&cut, var_base, var_count),
            energy: cut.value(),
            auxiliary,
            empty_cliques: sizes.empty_cliques().collect(),
        })
    }

    /// Converts the four input tables into a problem and runs [`infer`](Inference::infer).
    pub fn infer_tables(
        &self,
        unary: &Table,
        pairwise: &Table,
        coeffs: &Table,
        cliques: &Table,
        outputs: Outputs,
    ) -> Result<Solution, InferenceError> {
        let problem = problem_from_tables(unary, pairwise, coeffs, cliques)?;
        self.infer(&problem, outputs)
    }
}

/// Runs inference with the default configuration.
pub fn infer(problem: &Problem, outputs: Outputs) -> Result<Solution, InferenceError> {
    Inference::new().infer(problem, outputs)
}
