//! Conversion of the four input tables into a [`Problem`].
use linenv_model::{CliqueId, CliqueTable, Envelope, Problem, Table, Unary, Var};

use crate::error::InferenceError;

/// Column counts required of non-empty tables.
const UNARY_COLS: usize = 2;
const PAIRWISE_COLS: usize = 3;
const COEFFS_COLS: usize = 2;

/// Build a problem from the unary (N×2), pairwise (M×3), coefficient (K×2) and clique
/// assignment (N×C) tables.
///
/// All shape checks happen before any entry is looked at. Pairwise variable indices and clique
/// ids are 1-based, clique entries that are not positive mark unused slots. The entries of the
/// clique table are ignored when there are no coefficients.
pub fn problem_from_tables(
    unary: &Table,
    pairwise: &Table,
    coeffs: &Table,
    cliques: &Table,
) -> Result<Problem, InferenceError> {
    check_cols("unary", unary, UNARY_COLS)?;
    check_cols("pairwise", pairwise, PAIRWISE_COLS)?;
    check_cols("coeffs", coeffs, COEFFS_COLS)?;
    if cliques.cols() != 0 && cliques.rows() != unary.rows() {
        return Err(InferenceError::ShapeMismatch {
            first: "unary",
            second: "cliques",
            first_rows: unary.rows(),
            second_rows: cliques.rows(),
        });
    }

    let var_count = unary.rows();

    let mut problem = Problem::new();
    for (row, values) in unary.iter_rows().enumerate() {
        let source = finite("unary", row, 0, values[0])?;
        let sink = finite("unary", row, 1, values[1])?;
        problem.add_var(Unary::new(source, sink));
    }

    for (term, values) in pairwise.iter_rows().enumerate() {
        let u = variable(term, 0, values[0], var_count)?;
        let v = variable(term, 1, values[1], var_count)?;
        let weight = finite("pairwise", term, 2, values[2])?;
        problem.add_pairwise(u, v, weight);
    }

    let mut envelope = Envelope::new();
    for (piece, values) in coeffs.iter_rows().enumerate() {
        envelope.add_piece(
            finite("coeffs", piece, 0, values[0])?,
            finite("coeffs", piece, 1, values[1])?,
        );
    }
    problem.set_envelope(envelope);

    // Without linear pieces the clique assignment is irrelevant.
    if !coeffs.is_empty() {
        let mut table = CliqueTable::with_shape(cliques.rows(), cliques.cols());
        for (row, values) in cliques.iter_rows().enumerate() {
            for (slot, &value) in values.iter().enumerate() {
                table.set(Var::from_index(row), slot, clique(row, slot, value)?);
            }
        }
        problem.set_cliques(table);
    }

    Ok(problem)
}

fn check_cols(table: &'static str, values: &Table, expected: usize) -> Result<(), InferenceError> {
    if values.is_empty() || values.cols() == expected {
        Ok(())
    } else {
        Err(InferenceError::ColumnCount {
            table,
            cols: values.cols(),
            expected,
        })
    }
}

fn finite(table: &'static str, row: usize, col: usize, value: f64) -> Result<f64, InferenceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InferenceError::InvalidEntry {
            table,
            row,
            col,
            value,
        })
    }
}

fn integral(
    table: &'static str,
    row: usize,
    col: usize,
    value: f64,
) -> Result<i64, InferenceError> {
    let value = finite(table, row, col, value)?;
    if value.fract() != 0.0 || value.abs() > i64::max_value() as f64 / 2.0 {
        return Err(InferenceError::InvalidEntry {
            table,
            row,
            col,
            value,
        });
    }
    Ok(value as i64)
}

fn variable(term: usize, col: usize, value: f64, var_count: usize) -> Result<Var, InferenceError> {
    let index = integral("pairwise", term, col, value)?;
    if index < 1 || index as u64 > var_count as u64 {
        return Err(InferenceError::IndexOutOfRange {
            term,
            index,
            var_count,
        });
    }
    Ok(Var::from_one_based(index as usize))
}

fn clique(row: usize, slot: usize, value: f64) -> Result<Option<CliqueId>, InferenceError> {
    if finite("cliques", row, slot, value)? <= 0.0 {
        return Ok(None);
    }
    let id = integral("cliques", row, slot, value)?;
    if id as u64 > u32::max_value() as u64 {
        Err(InferenceError::InvalidEntry {
            table: "cliques",
            row,
            col: slot,
            value,
        })
    } else {
        Ok(Some(CliqueId::from_one_based(id as usize)))
    }
}
