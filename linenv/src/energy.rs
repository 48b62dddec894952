//! Direct evaluation of energies for a given labeling.
//!
//! [`envelope_energy`] is the energy of the model, [`reduced_energy`] the energy of the pairwise
//! reduction with the auxiliary variables minimized out. The minimum cut value equals the reduced
//! energy of the decoded labeling. Whenever every linear piece of the envelope attains the
//! minimum somewhere, the two differ by [`clique_offset`] for every non-empty clique.
use linenv_model::{Envelope, Problem};

use crate::cliques::CliqueSizes;
use crate::error::InferenceError;
use crate::validate::{envelope_levels, Level};

/// Fraction of member slots labeled 1, per clique id.
///
/// Empty cliques have fraction 0.
pub fn member_fractions(problem: &Problem, labeling: &[bool]) -> Vec<f64> {
    let sizes = CliqueSizes::index(problem.cliques());
    let mut fractions = vec![0.0; sizes.len()];
    for (var, clique) in problem.cliques().iter() {
        if labeling[var.index()] {
            fractions[clique.index()] += sizes.weight(clique);
        }
    }
    fractions
}

/// Sum of the unary and pairwise costs.
pub fn pairwise_energy(problem: &Problem, labeling: &[bool]) -> f64 {
    let unary: f64 = problem
        .unary()
        .iter()
        .zip(labeling)
        .map(|(unary, &label)| unary.cost(label))
        .sum();
    let pairwise: f64 = problem
        .pairwise()
        .iter()
        .map(|pairwise| pairwise.cost(labeling))
        .sum();
    unary + pairwise
}

/// Energy with `min_k (a_k x̄ + b_k)` for every non-empty clique.
pub fn envelope_energy(problem: &Problem, labeling: &[bool]) -> f64 {
    let envelope = problem.envelope();
    let mut energy = pairwise_energy(problem, labeling);
    if envelope.is_empty() {
        return energy;
    }
    let sizes = CliqueSizes::index(problem.cliques());
    for ((_, size), fraction) in sizes.iter().zip(member_fractions(problem, labeling)) {
        if size > 0 {
            energy += envelope.value(fraction).unwrap_or(0.0);
        }
    }
    energy
}

/// Energy minimized by the cut.
pub fn reduced_energy(
    problem: &Problem,
    labeling: &[bool],
    epsilon: f64,
) -> Result<f64, InferenceError> {
    let envelope = problem.envelope();
    let mut energy = pairwise_energy(problem, labeling);
    let first_slope = match envelope.slopes().first() {
        Some(&slope) => slope,
        None => return Ok(energy),
    };
    let levels = envelope_levels(envelope, epsilon)?;

    let sizes = CliqueSizes::index(problem.cliques());
    for ((_, size), fraction) in sizes.iter().zip(member_fractions(problem, labeling)) {
        if size > 0 {
            energy += first_slope * fraction + chain_cost(&levels, fraction);
        }
    }
    Ok(energy)
}

/// Cost of the auxiliary chain with every auxiliary variable at its optimum.
fn chain_cost(levels: &[Level], fraction: f64) -> f64 {
    levels
        .iter()
        .map(|level| {
            let crossed = level.intercept_rise + level.slope_drop * (1.0 - fraction);
            level.slope_drop.min(crossed)
        })
        .sum()
}

/// Constant added to each non-empty clique's envelope value by the reduction.
pub fn clique_offset(envelope: &Envelope, epsilon: f64) -> Result<f64, InferenceError> {
    let first_intercept = match envelope.intercepts().first() {
        Some(&intercept) => intercept,
        None => return Ok(0.0),
    };
    let levels = envelope_levels(envelope, epsilon)?;
    Ok(levels.iter().map(|level| level.slope_drop).sum::<f64>() - first_intercept)
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use linenv_model::{test::envelope, CliqueId, CliqueTable, Unary, Var};

    #[test]
    fn fractions() {
        let c = CliqueId::from_one_based;
        let mut problem = Problem::from_unary(vec![Unary::new(0.0, 0.0); 3]);
        problem.set_cliques(CliqueTable::from_memberships(vec![
            vec![c(1), c(3)],
            vec![c(1)],
            vec![c(1), c(1)],
        ]));

        let fractions = member_fractions(&problem, &[true, false, true]);
        assert_eq!(fractions.len(), 3);
        assert!((fractions[0] - 0.75).abs() < 1e-12);
        assert_eq!(fractions[1], 0.0);
        assert_eq!(fractions[2], 1.0);
    }

    #[test]
    fn envelope_and_reduced_energy() {
        let c = CliqueId::from_one_based;
        let mut problem = Problem::from_unary(vec![Unary::new(1.0, 0.0), Unary::new(0.0, 2.0)]);
        problem.add_pairwise(Var::from_index(0), Var::from_index(1), 0.5);
        problem.set_envelope(Envelope::from_pieces(vec![(2.0, 0.0), (0.0, 0.5)]));
        problem.set_cliques(CliqueTable::from_memberships(vec![vec![c(1)], vec![c(1)]]));

        let labeling = [true, false];
        // unary 0 + 0, pairwise 0.5, envelope min(2 * 0.5, 0.5)
        assert!((envelope_energy(&problem, &labeling) - 1.0).abs() < 1e-12);
        // offset 2 - 0
        let reduced = reduced_energy(&problem, &labeling, 1e-6).unwrap();
        assert!((reduced - 3.0).abs() < 1e-12);
        assert_eq!(clique_offset(problem.envelope(), 1e-6).unwrap(), 2.0);
    }

    proptest! {
        #[test]
        fn offset_relation(
            pieces in envelope(1..5usize),
            fraction in 0.0..=1.0f64,
        ) {
            let levels = envelope_levels(&pieces, 1e-6).unwrap();
            let reduced = pieces.slopes()[0] * fraction + chain_cost(&levels, fraction);
            let offset = clique_offset(&pieces, 1e-6).unwrap();
            let value = pieces.value(fraction).unwrap();
            prop_assert!((reduced - value - offset).abs() < 1e-9);
        }
    }
}
