//! Circuit definition → R1CS
//!
//! Products `v = l · r` become one row each; assertions `l == r` become the
//! degenerate row `l · 1 = r`.

use ark_ff::PrimeField;

use super::{R1CSInstance, SparseMatrix};
use crate::circuit::{CircuitDefinition, LinearCombination, VariableKind};
use crate::errors::{PipelineError, Result};

fn write_row<F: PrimeField>(
    matrix: &mut SparseMatrix<F>,
    row: usize,
    lc: &LinearCombination<F>,
    columns: &[usize],
) {
    if !lc.constant.is_zero() {
        matrix.add_entry(row, 0, lc.constant);
    }
    for (var, coeff) in &lc.terms {
        matrix.add_entry(row, columns[var.index()], *coeff);
    }
}

#[tracing::instrument(skip_all, name = "r1cs::compile")]
pub fn compile<F: PrimeField>(definition: &CircuitDefinition<F>) -> Result<R1CSInstance<F>> {
    definition.validate()?;

    let public = definition.public_variables();
    let private = definition.private_variables();
    let num_vars = 1 + public.len() + private.len();

    let mut columns = vec![0usize; definition.num_variables()];
    for (k, var) in public.iter().chain(private.iter()).enumerate() {
        columns[var.index()] = k + 1;
    }

    let num_constraints = definition.num_constraints();
    let mut a = SparseMatrix::new(num_constraints, num_vars);
    let mut b = SparseMatrix::new(num_constraints, num_vars);
    let mut c = SparseMatrix::new(num_constraints, num_vars);

    let mut row = 0;
    for (i, var) in definition.variables.iter().enumerate() {
        if let VariableKind::Product { left, right } = var {
            write_row(&mut a, row, left, &columns);
            write_row(&mut b, row, right, &columns);
            c.add_entry(row, columns[i], F::one());
            row += 1;
        }
    }
    for (k, (lhs, rhs)) in definition.assertions.iter().enumerate() {
        if lhs.is_constant() && rhs.is_constant() && lhs.constant != rhs.constant {
            return Err(PipelineError::Compilation(format!(
                "assertion {} compares two different constants",
                k
            )));
        }
        write_row(&mut a, row, lhs, &columns);
        b.add_entry(row, 0, F::one());
        write_row(&mut c, row, rhs, &columns);
        row += 1;
    }

    tracing::debug!(num_constraints, num_vars, num_public = public.len(), "compiled R1CS");
    Ok(R1CSInstance {
        a,
        b,
        c,
        num_constraints,
        num_vars,
        num_public: public.len(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Circuit, CircuitBuilder, CubicCircuit};
    use crate::field::Bn254Fr as Fr;
    use crate::witness::generate;

    struct Contradiction;

    impl Circuit<Fr> for Contradiction {
        fn define(&self, api: &mut CircuitBuilder<Fr>) -> Result<()> {
            api.private_input("x")?;
            api.assert_equal(api.constant(Fr::from(1u64)), api.constant(Fr::from(2u64)));
            Ok(())
        }
    }

    #[test]
    fn cubic_shape() {
        let def = CircuitDefinition::<Fr>::from_circuit(&CubicCircuit).unwrap();
        let r1cs = compile(&def).unwrap();
        assert_eq!(r1cs.num_constraints, 3);
        assert_eq!(r1cs.num_vars, 5); // 1, y, x, x^2, x^3
        assert_eq!(r1cs.num_public, 1);
        // y is the first public input, right after the constant
        assert_eq!(r1cs.columns[1], 1);
    }

    #[test]
    fn cubic_witness_satisfies() {
        let def = CircuitDefinition::<Fr>::from_circuit(&CubicCircuit).unwrap();
        let r1cs = compile(&def).unwrap();
        let w = generate(&def, &CubicCircuit::assignment(3, 35)).unwrap();
        let z = r1cs.build_z(&w).unwrap();
        assert_eq!(z[1], Fr::from(35u64));
        assert!(r1cs.is_satisfied(&z).unwrap());
    }

    #[test]
    fn compile_is_deterministic() {
        let def = CircuitDefinition::<Fr>::from_circuit(&CubicCircuit).unwrap();
        assert_eq!(compile(&def).unwrap(), compile(&def).unwrap());
    }

    #[test]
    fn constant_contradiction_rejected() {
        let def = CircuitDefinition::<Fr>::from_circuit(&Contradiction).unwrap();
        assert!(matches!(compile(&def), Err(PipelineError::Compilation(_))));
    }
}
