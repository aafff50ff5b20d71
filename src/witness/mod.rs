//! Witness generation
//!
//! Evaluates a circuit definition on named input values. The full witness
//! holds one value per circuit variable (inputs, then intermediates); the
//! public witness is its projection onto the public inputs in declaration
//! order.

use ark_ff::PrimeField;
use std::collections::BTreeMap;

use crate::circuit::{CircuitDefinition, Variable, VariableKind};
use crate::errors::{PipelineError, Result};
use crate::field::DecimalEncoding;

/// Named input values
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment<F: PrimeField> {
    values: BTreeMap<String, F>,
}

impl<F: PrimeField> Assignment<F> {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, value: F) -> &mut Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&F> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }
}

/// Full assignment to every circuit variable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness<F: PrimeField> {
    values: Vec<F>,
    public_variables: Vec<Variable>,
}

impl<F: PrimeField> Witness<F> {
    pub fn values(&self) -> &[F] {
        &self.values
    }

    pub fn value(&self, var: Variable) -> Option<F> {
        self.values.get(var.index()).copied()
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub fn public(&self) -> PublicWitness<F> {
        PublicWitness(self.public_variables.iter().map(|v| self.values[v.index()]).collect())
    }

    #[cfg(test)]
    pub(crate) fn tampered(mut self, var: Variable, value: F) -> Self {
        self.values[var.index()] = value;
        self
    }
}

/// Public input values in the circuit's public-variable order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicWitness<F: PrimeField>(pub Vec<F>);

impl<F: PrimeField> PublicWitness<F> {
    pub fn values(&self) -> &[F] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_decimal_strings(&self) -> Vec<String> {
        self.0.iter().map(|v| v.to_decimal_string()).collect()
    }

    pub fn from_decimal_strings<S: AsRef<str>>(strings: &[S]) -> Result<Self> {
        strings
            .iter()
            .map(|s| F::from_decimal_str(s.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(PublicWitness)
    }
}

impl<F: PrimeField> From<Vec<F>> for PublicWitness<F> {
    fn from(values: Vec<F>) -> Self {
        PublicWitness(values)
    }
}

fn check_known_inputs<F: PrimeField>(
    definition: &CircuitDefinition<F>,
    assignment: &Assignment<F>,
) -> Result<()> {
    for name in assignment.names() {
        let declared = definition
            .variables
            .iter()
            .any(|v| matches!(v, VariableKind::Input { name: n, .. } if n == name));
        if !declared {
            return Err(PipelineError::Witness(format!("value given for undeclared input {:?}", name)));
        }
    }
    Ok(())
}

/// Evaluate every variable and check every assertion
#[tracing::instrument(skip_all, name = "witness::generate")]
pub fn generate<F: PrimeField>(
    definition: &CircuitDefinition<F>,
    assignment: &Assignment<F>,
) -> Result<Witness<F>> {
    check_known_inputs(definition, assignment)?;

    let mut values: Vec<F> = Vec::with_capacity(definition.num_variables());
    for (i, var) in definition.variables.iter().enumerate() {
        let value = match var {
            VariableKind::Input { name, .. } => *assignment
                .get(name)
                .ok_or_else(|| PipelineError::Witness(format!("missing value for input {:?}", name)))?,
            VariableKind::Product { left, right } => {
                if left.variables().chain(right.variables()).any(|v| v.index() >= i) {
                    return Err(PipelineError::Witness(format!(
                        "product v{} depends on an undefined variable",
                        i
                    )));
                }
                left.evaluate(&values) * right.evaluate(&values)
            }
        };
        values.push(value);
    }

    for (k, (lhs, rhs)) in definition.assertions.iter().enumerate() {
        if lhs.variables().chain(rhs.variables()).any(|v| v.index() >= values.len()) {
            return Err(PipelineError::Witness(format!(
                "assertion {} references an undefined variable",
                k
            )));
        }
        if lhs.evaluate(&values) != rhs.evaluate(&values) {
            return Err(PipelineError::Witness(format!("assertion {} is not satisfied", k)));
        }
    }

    tracing::debug!(variables = values.len(), "witness generated");
    Ok(Witness {
        values,
        public_variables: definition.public_variables(),
    })
}

/// Public witness from public input values alone.
///
/// Needs no private values, so a verifier-only party can rebuild it.
pub fn public_witness<F: PrimeField>(
    definition: &CircuitDefinition<F>,
    assignment: &Assignment<F>,
) -> Result<PublicWitness<F>> {
    definition
        .public_variables()
        .into_iter()
        .map(|v| {
            let name = definition
                .input_name(v)
                .ok_or_else(|| PipelineError::Witness(format!("v{} is not an input", v.index())))?;
            assignment
                .get(name)
                .copied()
                .ok_or_else(|| PipelineError::Witness(format!("missing value for public input {:?}", name)))
        })
        .collect::<Result<Vec<_>>>()
        .map(PublicWitness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CubicCircuit;
    use crate::field::Bn254Fr as Fr;

    fn cubic() -> CircuitDefinition<Fr> {
        CircuitDefinition::from_circuit(&CubicCircuit).unwrap()
    }

    #[test]
    fn cubic_witness_values() {
        let w = generate(&cubic(), &CubicCircuit::assignment(3, 35)).unwrap();
        let expected: Vec<Fr> = [3u64, 35, 9, 27].iter().map(|v| Fr::from(*v)).collect();
        assert_eq!(w.values(), expected.as_slice());
        assert_eq!(w.public(), PublicWitness(vec![Fr::from(35u64)]));
    }

    #[test]
    fn wrong_output_rejected() {
        let err = generate(&cubic(), &CubicCircuit::assignment::<Fr>(3, 36)).unwrap_err();
        assert!(matches!(err, PipelineError::Witness(_)));
    }

    #[test]
    fn missing_input_rejected() {
        let mut assignment = Assignment::<Fr>::new();
        assignment.set("x", Fr::from(3u64));
        let err = generate(&cubic(), &assignment).unwrap_err();
        assert!(err.to_string().contains("\"y\""));
    }

    #[test]
    fn undeclared_input_rejected() {
        let mut assignment = CubicCircuit::assignment::<Fr>(3, 35);
        assignment.set("z", Fr::from(1u64));
        assert!(generate(&cubic(), &assignment).is_err());
    }

    #[test]
    fn public_projection_without_private_values() {
        let mut only_public = Assignment::<Fr>::new();
        only_public.set("y", Fr::from(35u64));
        let pw = public_witness(&cubic(), &only_public).unwrap();
        let full = generate(&cubic(), &CubicCircuit::assignment(3, 35)).unwrap();
        assert_eq!(pw, full.public());
    }

    #[test]
    fn decimal_strings_round_trip() {
        let pw = PublicWitness(vec![Fr::from(35u64), -Fr::from(1u64)]);
        let strings = pw.to_decimal_strings();
        assert_eq!(strings[0], "35");
        assert_eq!(PublicWitness::<Fr>::from_decimal_strings(&strings).unwrap(), pw);
    }
}
