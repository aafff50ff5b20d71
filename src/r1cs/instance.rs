//! R1CS instance
//!
//! Checks: (A·z) ◦ (B·z) = (C·z) where z = (1, io, w)

use super::SparseMatrix;
use ark_ff::PrimeField;
use crate::errors::{PipelineError, Result};
use crate::witness::Witness;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct R1CSInstance<F: PrimeField> {
    pub a: SparseMatrix<F>,
    pub b: SparseMatrix<F>,
    pub c: SparseMatrix<F>,
    pub num_constraints: usize,
    pub num_vars: usize,   // |z| including the leading constant
    pub num_public: usize, // |io|
    /// z column of each circuit variable
    pub columns: Vec<usize>,
}

impl<F: PrimeField> R1CSInstance<F> {
    /// Number of instance wires: the constant plus public inputs
    pub fn num_instance_vars(&self) -> usize {
        self.num_public + 1
    }

    pub fn num_witness_vars(&self) -> usize {
        self.num_vars - self.num_instance_vars()
    }

    /// Lay out a circuit-level witness as z = (1, io, w)
    pub fn build_z(&self, witness: &Witness<F>) -> Result<Vec<F>> {
        if witness.num_variables() != self.columns.len() {
            return Err(PipelineError::Proving(format!(
                "witness has {} variables, constraint system expects {}",
                witness.num_variables(),
                self.columns.len()
            )));
        }
        let mut z = vec![F::zero(); self.num_vars];
        z[0] = F::one();
        for (value, &col) in witness.values().iter().zip(self.columns.iter()) {
            z[col] = *value;
        }
        Ok(z)
    }

    /// Verify R1CS satisfaction for a full z vector
    pub fn is_satisfied(&self, z: &[F]) -> Result<bool> {
        if z.len() != self.num_vars {
            return Err(PipelineError::Proving(format!(
                "z length mismatch: expected {}, got {}",
                self.num_vars,
                z.len()
            )));
        }
        if z[0] != F::one() {
            return Ok(false);
        }

        let az = self.a.mul_vector(z);
        let bz = self.b.mul_vector(z);
        let cz = self.c.mul_vector(z);

        Ok((0..self.num_constraints).all(|i| az[i] * bz[i] == cz[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Bn254Fr as Fr;
    use ark_ff::One;

    fn instance_mul_gate() -> (R1CSInstance<Fr>, Vec<Fr>) {
        // Constraint: x * y = w with x public
        // z = (1, x, y, w)
        let num_vars = 4;
        let num_constraints = 1;

        let mut a = SparseMatrix::new(num_constraints, num_vars);
        a.add_entry(0, 1, Fr::one());
        let mut b = SparseMatrix::new(num_constraints, num_vars);
        b.add_entry(0, 2, Fr::one());
        let mut c = SparseMatrix::new(num_constraints, num_vars);
        c.add_entry(0, 3, Fr::one());

        let instance = R1CSInstance {
            a,
            b,
            c,
            num_constraints,
            num_vars,
            num_public: 1,
            columns: vec![1, 2, 3],
        };
        let z = vec![Fr::one(), Fr::from(3u64), Fr::from(4u64), Fr::from(12u64)];
        (instance, z)
    }

    #[test]
    fn test_mul_gate_satisfied() {
        let (inst, z) = instance_mul_gate();
        assert!(inst.is_satisfied(&z).unwrap());
    }

    #[test]
    fn test_mul_gate_unsatisfied() {
        let (inst, mut z) = instance_mul_gate();
        z[3] = Fr::from(15u64);
        assert!(!inst.is_satisfied(&z).unwrap());
    }

    #[test]
    fn test_constant_wire_must_be_one() {
        let (inst, mut z) = instance_mul_gate();
        z[0] = Fr::from(2u64);
        assert!(!inst.is_satisfied(&z).unwrap());
    }

    #[test]
    fn test_size_mismatch() {
        let (inst, mut z) = instance_mul_gate();
        z.push(Fr::one());
        assert!(inst.is_satisfied(&z).is_err());
    }

    #[test]
    fn test_wire_counts() {
        let (inst, _) = instance_mul_gate();
        assert_eq!(inst.num_instance_vars(), 2);
        assert_eq!(inst.num_witness_vars(), 2);
    }
}
