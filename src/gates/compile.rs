//! Circuit definition → gate table
//!
//! Row layout: one row per public input, then one multiplication gate per
//! product, then one gate per assertion. Linear combinations wider than a
//! gate are folded two terms at a time into derived wires, each with its
//! own addition gate.

use ark_ff::PrimeField;
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};

use super::{permutation, Gate, GateSystem, MIN_DOMAIN_SIZE};
use crate::circuit::{CircuitDefinition, LinearCombination, Variable, VariableKind};
use crate::errors::{PipelineError, Result};

struct GateBuilder<F: PrimeField> {
    gates: Vec<Gate<F>>,
    derived: Vec<LinearCombination<F>>,
    num_circuit_vars: usize,
}

impl<F: PrimeField> GateBuilder<F> {
    fn push(&mut self, q_m: F, q_l: F, q_r: F, q_o: F, q_c: F, wires: [Option<usize>; 3]) {
        self.gates.push(Gate {
            q_m,
            q_l,
            q_r,
            q_o,
            q_c,
            wires,
        });
    }

    fn fresh_wire(&mut self, value: LinearCombination<F>) -> usize {
        self.derived.push(value);
        self.num_circuit_vars + self.derived.len() - 1
    }

    /// Fold leading pairs of terms into derived wires until at most
    /// `max_terms` remain
    fn fold(&mut self, mut lc: LinearCombination<F>, max_terms: usize) -> LinearCombination<F> {
        while lc.terms.len() > max_terms {
            let (v1, c1) = lc.terms[0];
            let (v2, c2) = lc.terms[1];
            let t = self.fresh_wire(LinearCombination {
                terms: vec![(v1, c1), (v2, c2)],
                constant: F::zero(),
            });
            self.push(
                F::zero(),
                c1,
                c2,
                -F::one(),
                F::zero(),
                [Some(v1.index()), Some(v2.index()), Some(t)],
            );
            lc.terms.drain(0..2);
            // t is the newest wire, so the terms stay sorted
            lc.terms.push((Variable(t), F::one()));
        }
        lc
    }

    /// Wire holding the value of `lc`
    fn to_wire(&mut self, lc: &LinearCombination<F>) -> usize {
        if let Some(v) = lc.as_variable() {
            return v.index();
        }
        let lc = self.fold(lc.clone(), 2);
        let (w0, c0) = slot(&lc, 0);
        let (w1, c1) = slot(&lc, 1);
        let constant = lc.constant;
        let t = self.fresh_wire(lc);
        self.push(F::zero(), c0, c1, -F::one(), constant, [w0, w1, Some(t)]);
        t
    }

    fn assert_zero(&mut self, lc: LinearCombination<F>, index: usize) -> Result<()> {
        let lc = self.fold(lc, 3);
        if lc.terms.is_empty() {
            if lc.constant.is_zero() {
                return Ok(());
            }
            return Err(PipelineError::Compilation(format!(
                "assertion {} compares two different constants",
                index
            )));
        }
        let (w0, c0) = slot(&lc, 0);
        let (w1, c1) = slot(&lc, 1);
        let (w2, c2) = slot(&lc, 2);
        self.push(F::zero(), c0, c1, c2, lc.constant, [w0, w1, w2]);
        Ok(())
    }
}

fn slot<F: PrimeField>(lc: &LinearCombination<F>, i: usize) -> (Option<usize>, F) {
    match lc.terms.get(i) {
        Some((v, c)) => (Some(v.index()), *c),
        None => (None, F::zero()),
    }
}

#[tracing::instrument(skip_all, name = "gates::compile")]
pub fn compile<F: PrimeField>(definition: &CircuitDefinition<F>) -> Result<GateSystem<F>> {
    definition.validate()?;

    let public = definition.public_variables();
    let mut builder = GateBuilder {
        gates: Vec::with_capacity(public.len() + definition.num_constraints()),
        derived: Vec::new(),
        num_circuit_vars: definition.num_variables(),
    };

    for var in &public {
        builder.push(
            F::zero(),
            F::one(),
            F::zero(),
            F::zero(),
            F::zero(),
            [Some(var.index()), None, None],
        );
    }

    for (i, var) in definition.variables.iter().enumerate() {
        if let VariableKind::Product { left, right } = var {
            let l = builder.to_wire(left);
            let r = builder.to_wire(right);
            builder.push(
                F::one(),
                F::zero(),
                F::zero(),
                -F::one(),
                F::zero(),
                [Some(l), Some(r), Some(i)],
            );
        }
    }

    for (k, (lhs, rhs)) in definition.assertions.iter().enumerate() {
        builder.assert_zero(lhs.clone() - rhs.clone(), k)?;
    }

    let num_rows = builder.gates.len();
    let domain_size = num_rows.next_power_of_two().max(MIN_DOMAIN_SIZE);
    Radix2EvaluationDomain::<F>::new(domain_size)
        .filter(|d| d.size() == domain_size)
        .ok_or_else(|| {
            PipelineError::Compilation(format!("{} rows exceed the field's two-adicity", num_rows))
        })?;

    let num_wires = builder.num_circuit_vars + builder.derived.len();
    let permutation = permutation::build(&builder.gates, domain_size, num_wires);

    tracing::debug!(
        num_rows,
        domain_size,
        derived_wires = builder.derived.len(),
        "compiled gate system"
    );
    Ok(GateSystem {
        gates: builder.gates,
        num_public: public.len(),
        num_circuit_vars: builder.num_circuit_vars,
        derived: builder.derived,
        domain_size,
        permutation,
    })
}
