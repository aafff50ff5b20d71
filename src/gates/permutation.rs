//! Copy constraints
//!
//! Slots are numbered `col · n + row`. Every wire's occurrences form one
//! cycle of the permutation; unused slots and wires seen once are fixed
//! points. Slot `(col, row)` is labelled `k_col · ω^row`, with the three
//! coset shifts chosen so the cosets of the domain are disjoint.

use ark_ff::PrimeField;
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};

use super::Gate;

/// `[1, k1, k2]` with `k1` the field's multiplicative generator and `k2 = k1²`
pub fn coset_shifts<F: PrimeField>() -> [F; 3] {
    let k1 = F::GENERATOR;
    [F::one(), k1, k1.square()]
}

pub(crate) fn build<F: PrimeField>(gates: &[Gate<F>], n: usize, num_wires: usize) -> Vec<usize> {
    let mut occurrences: Vec<Vec<usize>> = vec![Vec::new(); num_wires];
    for (row, gate) in gates.iter().enumerate() {
        for (col, wire) in gate.wires.iter().enumerate() {
            if let Some(w) = wire {
                occurrences[*w].push(col * n + row);
            }
        }
    }

    let mut sigma: Vec<usize> = (0..3 * n).collect();
    for slots in occurrences.iter().filter(|s| s.len() > 1) {
        for (i, &slot) in slots.iter().enumerate() {
            sigma[slot] = slots[(i + 1) % slots.len()];
        }
    }
    sigma
}

/// Evaluations of S_σ1, S_σ2, S_σ3 over the domain
pub fn sigma_evaluations<F: PrimeField>(
    permutation: &[usize],
    domain: &Radix2EvaluationDomain<F>,
) -> [Vec<F>; 3] {
    let n = domain.size();
    let shifts = coset_shifts::<F>();
    let elements: Vec<F> = domain.elements().collect();
    let label = |slot: usize| shifts[slot / n] * elements[slot % n];
    [
        (0..n).map(|row| label(permutation[row])).collect(),
        (0..n).map(|row| label(permutation[n + row])).collect(),
        (0..n).map(|row| label(permutation[2 * n + row])).collect(),
    ]
}
