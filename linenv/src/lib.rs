//! Linenv computes exact minimum energy labelings of binary Markov random fields with unary,
//! pairwise and higher-order clique potentials. Every clique potential is a lower linear envelope
//! of the fraction of clique members labeled 1: the minimum of linear pieces shared by all
//! cliques.
//!
//! Potentials are reduced to a flow network with one auxiliary node per clique and envelope
//! level, so a single minimum cut yields a global optimum. This requires the slopes of the
//! envelope to strictly decrease and the intercepts to strictly increase, other inputs are
//! rejected.

pub mod config;
pub mod energy;
pub mod error;
pub mod inference;
pub mod load;

mod cliques;
mod decode;
mod envelope;
mod graph;
mod validate;


pub use linenv_model::{
    clique, index, problem, CliqueId, CliqueTable, Envelope, Pairwise, Problem, Table, Unary, Var,
};

pub use config::{InferenceConfig, InferenceConfigUpdate};
pub use decode::AuxiliaryLabeling;
pub use error::{ConfigError, InferenceError};
pub use inference::{infer, Inference, Outputs, Solution};

pub mod tables {
    //! Text format for the input tables.
    pub use linenv_tables::*;
}
