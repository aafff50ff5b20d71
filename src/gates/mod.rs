//! Gate-based backend: a PLONK-style row table
//!
//! Each row is one wide arithmetic gate over three wire columns:
//!
//! `q_M·a·b + q_L·a + q_R·b + q_O·c + q_C + PI = 0`
//!
//! Public inputs sit in the first rows as `a - x_i = 0`, with `-x_i`
//! supplied by the public-input polynomial. Wires refer to circuit
//! variables or to derived wires introduced when a linear combination is
//! wider than one gate; equal wires across rows are tied together by a
//! copy-constraint permutation.

mod compile;
mod permutation;

pub use compile::compile;
pub use permutation::{coset_shifts, sigma_evaluations};

use ark_ff::PrimeField;

use crate::circuit::LinearCombination;
use crate::errors::{PipelineError, Result};
use crate::witness::Witness;

/// Smallest evaluation domain the backend uses
pub const MIN_DOMAIN_SIZE: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate<F: PrimeField> {
    pub q_m: F,
    pub q_l: F,
    pub q_r: F,
    pub q_o: F,
    pub q_c: F,
    /// Wire index for columns a, b, c; `None` is an unused slot holding zero
    pub wires: [Option<usize>; 3],
}

impl<F: PrimeField> Gate<F> {
    pub fn evaluate(&self, a: F, b: F, c: F) -> F {
        self.q_m * a * b + self.q_l * a + self.q_r * b + self.q_o * c + self.q_c
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateSystem<F: PrimeField> {
    /// Rows before padding; public-input rows first
    pub gates: Vec<Gate<F>>,
    pub num_public: usize,
    pub num_circuit_vars: usize,
    /// Derived wire `num_circuit_vars + k` equals `derived[k]`, evaluated
    /// over the wires that precede it
    pub derived: Vec<LinearCombination<F>>,
    pub domain_size: usize,
    /// Copy-constraint permutation over slots `col · n + row`
    pub permutation: Vec<usize>,
}

impl<F: PrimeField> GateSystem<F> {
    pub fn num_rows(&self) -> usize {
        self.gates.len()
    }

    pub fn num_wires(&self) -> usize {
        self.num_circuit_vars + self.derived.len()
    }

    /// Circuit-level witness extended with derived wire values
    pub fn wire_values(&self, witness: &Witness<F>) -> Result<Vec<F>> {
        if witness.num_variables() != self.num_circuit_vars {
            return Err(PipelineError::Proving(format!(
                "witness has {} variables, gate system expects {}",
                witness.num_variables(),
                self.num_circuit_vars
            )));
        }
        let mut values = witness.values().to_vec();
        for lc in &self.derived {
            let value = lc.evaluate(&values);
            values.push(value);
        }
        Ok(values)
    }

    /// Wire columns a, b, c padded to the domain size
    pub fn wire_columns(&self, wire_values: &[F]) -> [Vec<F>; 3] {
        let n = self.domain_size;
        let mut columns = [vec![F::zero(); n], vec![F::zero(); n], vec![F::zero(); n]];
        for (row, gate) in self.gates.iter().enumerate() {
            for (col, wire) in gate.wires.iter().enumerate() {
                if let Some(w) = wire {
                    columns[col][row] = wire_values[*w];
                }
            }
        }
        columns
    }

    /// Selector columns `[q_M, q_L, q_R, q_O, q_C]` padded with zero rows
    pub fn selector_columns(&self) -> [Vec<F>; 5] {
        let n = self.domain_size;
        let mut sel = [
            vec![F::zero(); n],
            vec![F::zero(); n],
            vec![F::zero(); n],
            vec![F::zero(); n],
            vec![F::zero(); n],
        ];
        for (row, gate) in self.gates.iter().enumerate() {
            sel[0][row] = gate.q_m;
            sel[1][row] = gate.q_l;
            sel[2][row] = gate.q_r;
            sel[3][row] = gate.q_o;
            sel[4][row] = gate.q_c;
        }
        sel
    }

    /// Evaluations of PI(X) over the domain: `-x_i` on the public rows
    pub fn public_input_column(&self, public: &[F]) -> Vec<F> {
        let mut pi = vec![F::zero(); self.domain_size];
        for (i, x) in public.iter().enumerate() {
            pi[i] = -*x;
        }
        pi
    }

    /// Gate equations and copy constraints on concrete wire values
    pub fn is_satisfied(&self, wire_values: &[F], public: &[F]) -> bool {
        if public.len() != self.num_public || wire_values.len() != self.num_wires() {
            return false;
        }
        let columns = self.wire_columns(wire_values);
        let pi = self.public_input_column(public);
        let gates_hold = self.gates.iter().enumerate().all(|(row, gate)| {
            gate.evaluate(columns[0][row], columns[1][row], columns[2][row]) + pi[row] == F::zero()
        });
        let n = self.domain_size;
        let copies_hold = self
            .permutation
            .iter()
            .enumerate()
            .all(|(slot, &target)| columns[slot / n][slot % n] == columns[target / n][target % n]);
        gates_hold && copies_hold
    }
}
