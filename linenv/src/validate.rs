//! Preconditions of the reduction.
use log::warn;

use linenv_model::{Envelope, Problem};

use crate::error::InferenceError;

/// One step of a clique's auxiliary chain.
///
/// Level `k` (1-based, `1..K`) lies between linear pieces `k - 1` and `k` of the envelope.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Level {
    pub index: usize,
    /// `a_{k-1} - a_k`
    pub slope_drop: f64,
    /// `b_k - b_{k-1}`
    pub intercept_rise: f64,
}

impl Level {
    /// Member fraction above which crossing this level is cheaper than not crossing it.
    pub fn breakpoint(&self) -> f64 {
        self.intercept_rise / self.slope_drop
    }
}

/// Check everything about a problem that does not depend on the envelope tolerance.
pub fn validate_problem(problem: &Problem) -> Result<(), InferenceError> {
    let var_count = problem.var_count();

    let cliques = problem.cliques();
    if cliques.slots() != 0 && cliques.var_count() != var_count {
        return Err(InferenceError::ShapeMismatch {
            first: "unary",
            second: "cliques",
            first_rows: var_count,
            second_rows: cliques.var_count(),
        });
    }

    for (index, unary) in problem.unary().iter().enumerate() {
        if !(unary.source >= 0.0 && unary.sink >= 0.0) {
            return Err(InferenceError::NegativeUnary {
                var: linenv_model::Var::from_index(index),
                source_cost: unary.source,
                sink_cost: unary.sink,
            });
        }
    }

    for (term, pairwise) in problem.pairwise().iter().enumerate() {
        for &var in [pairwise.u, pairwise.v].iter() {
            if var.index() >= var_count {
                return Err(InferenceError::IndexOutOfRange {
                    term,
                    index: var.to_one_based() as i64,
                    var_count,
                });
            }
        }
        if !(pairwise.weight >= 0.0) {
            return Err(InferenceError::InvalidWeight {
                term,
                weight: pairwise.weight,
            });
        }
    }

    for (piece, (slope, intercept)) in problem.envelope().pieces().enumerate() {
        for &(col, value) in [(0, slope), (1, intercept)].iter() {
            if !value.is_finite() {
                return Err(InferenceError::InvalidEntry {
                    table: "coeffs",
                    row: piece,
                    col,
                    value,
                });
            }
        }
    }

    Ok(())
}

/// Computes the levels of the auxiliary chain that contribute to the energy.
///
/// A level whose slope drop and intercept rise are both within `epsilon` of zero repeats the
/// previous linear piece and is skipped. Every other level needs a strictly positive slope drop
/// and intercept rise, otherwise the reduction would not be submodular.
pub fn envelope_levels(envelope: &Envelope, epsilon: f64) -> Result<Vec<Level>, InferenceError> {
    let (slopes, intercepts) = (envelope.slopes(), envelope.intercepts());
    let mut levels = vec![];

    for index in 1..envelope.len() {
        let slope_drop = slopes[index - 1] - slopes[index];
        let intercept_rise = intercepts[index] - intercepts[index - 1];

        if slope_drop.abs() <= epsilon && intercept_rise.abs() <= epsilon {
            continue;
        }
        if !(slope_drop > epsilon && intercept_rise > 0.0) {
            return Err(InferenceError::NonConvexEnvelope {
                piece: index,
                slope_drop,
                intercept_rise,
            });
        }

        levels.push(Level {
            index,
            slope_drop,
            intercept_rise,
        });
    }

    for pair in levels.windows(2) {
        if pair[1].breakpoint() <= pair[0].breakpoint() {
            warn!(
                "linear envelope piece {} never attains the minimum",
                pair[0].index
            );
        }
    }

    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    use linenv_model::{CliqueId, CliqueTable, Unary, Var};

    const EPSILON: f64 = 1e-6;

    #[test]
    fn convex_levels() {
        let envelope = Envelope::from_pieces(vec![(2.0, 0.0), (1.0, 0.3), (0.0, 0.8)]);
        let levels = envelope_levels(&envelope, EPSILON).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].index, 1);
        assert_eq!(levels[0].slope_drop, 1.0);
        assert!((levels[0].intercept_rise - 0.3).abs() < 1e-12);
        assert!((levels[1].breakpoint() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn parallel_piece_is_rejected() {
        let envelope = Envelope::from_pieces(vec![(1.0, 0.0), (1.0, 5.0)]);
        match envelope_levels(&envelope, EPSILON) {
            Err(InferenceError::NonConvexEnvelope { piece: 1, .. }) => (),
            other => panic!("unexpected result {:?}", other),
        }

        let envelope = Envelope::from_pieces(vec![(2.0, 0.0), (1.0, 5.0)]);
        let levels = envelope_levels(&envelope, EPSILON).unwrap();
        assert_eq!(levels.len(), 1);

        // an equal slope is only skipped when the intercept is equal too
        let envelope = Envelope::from_pieces(vec![(1.0, 5.0), (1.0, 0.0)]);
        match envelope_levels(&envelope, EPSILON) {
            Err(InferenceError::NonConvexEnvelope { piece: 1, .. }) => (),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn repeated_piece_is_skipped() {
        let envelope = Envelope::from_pieces(vec![(2.0, 0.0), (2.0, 1e-9), (1.0, 0.5)]);
        let levels = envelope_levels(&envelope, EPSILON).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].index, 2);
    }

    #[test]
    fn epsilon_controls_degeneracy() {
        let envelope = Envelope::from_pieces(vec![(2.0, 0.0), (1.99, 0.001)]);
        assert_eq!(envelope_levels(&envelope, EPSILON).unwrap().len(), 1);
        assert_eq!(envelope_levels(&envelope, 0.1).unwrap().len(), 0);

        // differences equal to epsilon are degenerate
        let envelope = Envelope::from_pieces(vec![(2.0, 0.0), (1.5, 0.5)]);
        assert_eq!(envelope_levels(&envelope, 0.5).unwrap().len(), 0);
    }

    #[test]
    fn non_convex_pieces() {
        for pieces in vec![
            vec![(1.0, 0.0), (2.0, 1.0)],
            vec![(2.0, 1.0), (1.0, 0.0)],
            vec![(2.0, 0.0), (1.0, 1.0), (1.5, 2.0)],
        ] {
            let envelope = Envelope::from_pieces(pieces);
            assert!(matches!(
                envelope_levels(&envelope, EPSILON),
                Err(InferenceError::NonConvexEnvelope { .. })
            ));
        }
    }

    #[test]
    fn short_envelopes_have_no_levels() {
        assert!(envelope_levels(&Envelope::new(), EPSILON)
            .unwrap()
            .is_empty());
        assert!(envelope_levels(&Envelope::from_pieces(vec![(3.0, 1.0)]), EPSILON)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn problem_checks() {
        let mut problem = Problem::from_unary(vec![Unary::new(1.0, 0.0), Unary::new(0.0, 1.0)]);
        problem.add_pairwise(Var::from_index(0), Var::from_index(1), 0.0);
        validate_problem(&problem).unwrap();

        let mut negative_weight = problem.clone();
        negative_weight.add_pairwise(Var::from_index(1), Var::from_index(0), -0.5);
        assert!(matches!(
            validate_problem(&negative_weight),
            Err(InferenceError::InvalidWeight { term: 1, .. })
        ));

        let mut out_of_range = problem.clone();
        out_of_range.add_pairwise(Var::from_index(0), Var::from_index(2), 1.0);
        assert!(matches!(
            validate_problem(&out_of_range),
            Err(InferenceError::IndexOutOfRange {
                term: 1,
                index: 3,
                var_count: 2
            })
        ));

        let mut negative_unary = problem.clone();
        negative_unary.unary_mut()[1].sink = -1.0;
        assert!(matches!(
            validate_problem(&negative_unary),
            Err(InferenceError::NegativeUnary { .. })
        ));

        let mut wrong_rows = problem.clone();
        wrong_rows.set_cliques(CliqueTable::from_memberships(vec![vec![
            CliqueId::from_index(0),
        ]]));
        assert!(matches!(
            validate_problem(&wrong_rows),
            Err(InferenceError::ShapeMismatch { .. })
        ));
    }
}
