//! Error types.
use thiserror::Error;

use linenv_model::Var;

/// Reasons for rejecting an inference call.
///
/// All of these are detected before the flow network is built, so no partial result exists when
/// one is returned.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("incorrect size for {}: {} columns, expected {}", table, cols, expected)]
    ColumnCount {
        table: &'static str,
        cols: usize,
        expected: usize,
    },
    #[error(
        "mismatch between {} and {}: {} rows vs. {} rows",
        first,
        second,
        first_rows,
        second_rows
    )]
    ShapeMismatch {
        first: &'static str,
        second: &'static str,
        first_rows: usize,
        second_rows: usize,
    },
    #[error(
        "invalid entry {} in {} at row {}, column {}",
        value,
        table,
        row + 1,
        col + 1
    )]
    InvalidEntry {
        table: &'static str,
        row: usize,
        col: usize,
        value: f64,
    },
    #[error(
        "illegal variable pair in pairwise term {}: index {} is outside 1..={}",
        term + 1,
        index,
        var_count
    )]
    IndexOutOfRange {
        term: usize,
        index: i64,
        var_count: usize,
    },
    #[error("illegal pairwise weight {} in pairwise term {}", weight, term + 1)]
    InvalidWeight { term: usize, weight: f64 },
    #[error(
        "illegal unary potential ({}, {}) for variable {}",
        source_cost,
        sink_cost,
        var
    )]
    NegativeUnary {
        var: Var,
        source_cost: f64,
        sink_cost: f64,
    },
    #[error(
        "invalid linear envelope coefficients at piece {}: slope drop {}, intercept rise {}",
        piece,
        slope_drop,
        intercept_rise
    )]
    NonConvexEnvelope {
        piece: usize,
        slope_drop: f64,
        intercept_rise: f64,
    },
    #[error("{}", usage)]
    Usage { usage: String },
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("epsilon must be finite and non-negative, got {}", value)]
    InvalidEpsilon { value: f64 },
}
