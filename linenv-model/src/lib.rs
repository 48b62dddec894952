//! Problem data types used by the linenv lower linear envelope inference.

pub mod clique;
pub mod envelope;
pub mod index;
pub mod problem;
pub mod table;


pub use clique::CliqueTable;
pub use envelope::Envelope;
pub use index::{CliqueId, Var};
pub use problem::{Pairwise, Problem, Unary};
pub use table::{Table, TableError};
