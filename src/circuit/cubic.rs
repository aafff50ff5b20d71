//! Reference circuit: `y == x^3 + x + 5` with private `x` and public `y`

use ark_ff::PrimeField;

use super::{Circuit, CircuitBuilder};
use crate::errors::Result;
use crate::witness::Assignment;

#[derive(Clone, Copy, Debug, Default)]
pub struct CubicCircuit;

impl CubicCircuit {
    /// `x^3 + x + 5` in the scalar field
    pub fn evaluate<F: PrimeField>(x: u64) -> F {
        let x = F::from(x);
        x * x * x + x + F::from(5u64)
    }

    pub fn assignment<F: PrimeField>(x: u64, y: u64) -> Assignment<F> {
        let mut assignment = Assignment::new();
        assignment.set("x", F::from(x));
        assignment.set("y", F::from(y));
        assignment
    }

    /// Assignment with `y` computed from `x`
    pub fn satisfying_assignment<F: PrimeField>(x: u64) -> Assignment<F> {
        let mut assignment = Assignment::new();
        assignment.set("x", F::from(x));
        assignment.set("y", Self::evaluate::<F>(x));
        assignment
    }
}

impl<F: PrimeField> Circuit<F> for CubicCircuit {
    fn define(&self, api: &mut CircuitBuilder<F>) -> Result<()> {
        let x = api.private_input("x")?;
        let y = api.public_input("y")?;
        let x2 = api.mul(x, x);
        let x3 = api.mul(x2, x);
        let rhs = api.add(x3, x) + api.constant(F::from(5u64));
        api.assert_equal(y, rhs);
        Ok(())
    }
}
