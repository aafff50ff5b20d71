//! Circuit definitions
//!
//! A circuit is a table of variables plus equality assertions between
//! linear combinations. Variables are either declared inputs (tagged
//! public or private) or intermediates introduced by `mul`, which fixes
//! the intermediate to the product of two linear combinations.
//!
//! Inputs come first in the table, in declaration order; intermediates
//! follow in the order they were introduced. Public-variable order is the
//! declaration order of public inputs and every backend relies on it.

mod cubic;
mod linear_combination;

pub use cubic::CubicCircuit;
pub use linear_combination::{LinearCombination, Variable};

use ark_ff::PrimeField;
use std::collections::HashSet;

use crate::errors::{PipelineError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Private
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VariableKind<F: PrimeField> {
    Input {
        name: String,
        visibility: Visibility,
    },
    /// `left · right`
    Product {
        left: LinearCombination<F>,
        right: LinearCombination<F>,
    },
}

/// A circuit description: anything that can declare itself into a builder
pub trait Circuit<F: PrimeField> {
    fn define(&self, api: &mut CircuitBuilder<F>) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct CircuitBuilder<F: PrimeField> {
    inputs: Vec<(String, Visibility)>,
    products: Vec<(LinearCombination<F>, LinearCombination<F>)>,
    assertions: Vec<(LinearCombination<F>, LinearCombination<F>)>,
}

impl<F: PrimeField> CircuitBuilder<F> {
    pub fn new() -> Self {
        Self {
            inputs: Vec::new(),
            products: Vec::new(),
            assertions: Vec::new(),
        }
    }

    pub fn public_input(&mut self, name: &str) -> Result<Variable> {
        self.declare(name, Visibility::Public)
    }

    pub fn private_input(&mut self, name: &str) -> Result<Variable> {
        self.declare(name, Visibility::Private)
    }

    fn declare(&mut self, name: &str, visibility: Visibility) -> Result<Variable> {
        if name.is_empty() {
            return Err(PipelineError::Compilation("input name must not be empty".into()));
        }
        if !self.products.is_empty() {
            return Err(PipelineError::Compilation(format!(
                "input {:?} declared after an intermediate; declare all inputs first",
                name
            )));
        }
        if self.inputs.iter().any(|(n, _)| n == name) {
            return Err(PipelineError::Compilation(format!("duplicate input name {:?}", name)));
        }
        self.inputs.push((name.to_string(), visibility));
        Ok(Variable(self.inputs.len() - 1))
    }

    pub fn constant(&self, value: F) -> LinearCombination<F> {
        LinearCombination::constant(value)
    }

    pub fn add(
        &self,
        a: impl Into<LinearCombination<F>>,
        b: impl Into<LinearCombination<F>>,
    ) -> LinearCombination<F> {
        a.into() + b.into()
    }

    pub fn sub(
        &self,
        a: impl Into<LinearCombination<F>>,
        b: impl Into<LinearCombination<F>>,
    ) -> LinearCombination<F> {
        a.into() - b.into()
    }

    pub fn scale(&self, a: impl Into<LinearCombination<F>>, k: F) -> LinearCombination<F> {
        a.into() * k
    }

    /// New intermediate variable constrained to `a · b`
    pub fn mul(
        &mut self,
        a: impl Into<LinearCombination<F>>,
        b: impl Into<LinearCombination<F>>,
    ) -> Variable {
        self.products.push((a.into(), b.into()));
        Variable(self.inputs.len() + self.products.len() - 1)
    }

    pub fn assert_equal(
        &mut self,
        lhs: impl Into<LinearCombination<F>>,
        rhs: impl Into<LinearCombination<F>>,
    ) {
        self.assertions.push((lhs.into(), rhs.into()));
    }

    pub fn build(self) -> CircuitDefinition<F> {
        let mut variables: Vec<VariableKind<F>> = self
            .inputs
            .into_iter()
            .map(|(name, visibility)| VariableKind::Input { name, visibility })
            .collect();
        variables.extend(
            self.products
                .into_iter()
                .map(|(left, right)| VariableKind::Product { left, right }),
        );
        CircuitDefinition {
            variables,
            assertions: self.assertions,
        }
    }
}

/// Immutable circuit description consumed by the backends
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircuitDefinition<F: PrimeField> {
    pub variables: Vec<VariableKind<F>>,
    pub assertions: Vec<(LinearCombination<F>, LinearCombination<F>)>,
}

impl<F: PrimeField> CircuitDefinition<F> {
    pub fn from_circuit<C: Circuit<F>>(circuit: &C) -> Result<Self> {
        let mut api = CircuitBuilder::new();
        circuit.define(&mut api)?;
        let definition = api.build();
        definition.validate()?;
        Ok(definition)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Products plus assertions
    pub fn num_constraints(&self) -> usize {
        self.num_products() + self.assertions.len()
    }

    pub fn num_products(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| matches!(v, VariableKind::Product { .. }))
            .count()
    }

    fn inputs_with(&self, visibility: Visibility) -> Vec<Variable> {
        self.variables
            .iter()
            .enumerate()
            .filter_map(|(i, v)| match v {
                VariableKind::Input { visibility: vis, .. } if *vis == visibility => {
                    Some(Variable(i))
                }
                _ => None,
            })
            .collect()
    }

    /// Public inputs in declaration order
    pub fn public_variables(&self) -> Vec<Variable> {
        self.inputs_with(Visibility::Public)
    }

    /// Private inputs followed by every intermediate
    pub fn private_variables(&self) -> Vec<Variable> {
        let mut vars = self.inputs_with(Visibility::Private);
        vars.extend(
            self.variables
                .iter()
                .enumerate()
                .filter(|(_, v)| matches!(v, VariableKind::Product { .. }))
                .map(|(i, _)| Variable(i)),
        );
        vars
    }

    pub fn num_public(&self) -> usize {
        self.public_variables().len()
    }

    pub fn input_name(&self, var: Variable) -> Option<&str> {
        match self.variables.get(var.0) {
            Some(VariableKind::Input { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// Structural checks shared by every backend.
    ///
    /// Products may only reference strictly earlier variables; assertions
    /// may reference any defined variable.
    pub fn validate(&self) -> Result<()> {
        if self.num_constraints() == 0 {
            return Err(PipelineError::Compilation("circuit defines no constraints".into()));
        }
        let mut names = HashSet::new();
        for (i, var) in self.variables.iter().enumerate() {
            match var {
                VariableKind::Input { name, .. } => {
                    if !names.insert(name.as_str()) {
                        return Err(PipelineError::Compilation(format!(
                            "duplicate input name {:?}",
                            name
                        )));
                    }
                }
                VariableKind::Product { left, right } => {
                    for v in left.variables().chain(right.variables()) {
                        if v.0 >= i {
                            return Err(PipelineError::Compilation(format!(
                                "product v{} references undefined variable v{}",
                                i, v.0
                            )));
                        }
                    }
                }
            }
        }
        for (k, (lhs, rhs)) in self.assertions.iter().enumerate() {
            for v in lhs.variables().chain(rhs.variables()) {
                if v.0 >= self.variables.len() {
                    return Err(PipelineError::Compilation(format!(
                        "assertion {} references undefined variable v{}",
                        k, v.0
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Bn254Fr as Fr;

    struct Empty;

    impl Circuit<Fr> for Empty {
        fn define(&self, api: &mut CircuitBuilder<Fr>) -> Result<()> {
            api.public_input("y")?;
            Ok(())
        }
    }

    struct Dangling;

    impl Circuit<Fr> for Dangling {
        fn define(&self, api: &mut CircuitBuilder<Fr>) -> Result<()> {
            let x = api.private_input("x")?;
            api.assert_equal(x, Variable(42));
            Ok(())
        }
    }

    #[test]
    fn cubic_layout() {
        let def = CircuitDefinition::<Fr>::from_circuit(&CubicCircuit).unwrap();
        assert_eq!(def.num_variables(), 4); // x, y, x^2, x^3
        assert_eq!(def.num_constraints(), 3);
        assert_eq!(def.public_variables(), vec![Variable(1)]);
        assert_eq!(def.private_variables(), vec![Variable(0), Variable(2), Variable(3)]);
        assert_eq!(def.input_name(Variable(1)), Some("y"));
        assert_eq!(def.input_name(Variable(2)), None);
    }

    #[test]
    fn definition_is_deterministic() {
        let a = CircuitDefinition::<Fr>::from_circuit(&CubicCircuit).unwrap();
        let b = CircuitDefinition::<Fr>::from_circuit(&CubicCircuit).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn no_constraints_rejected() {
        let err = CircuitDefinition::<Fr>::from_circuit(&Empty).unwrap_err();
        assert!(matches!(err, PipelineError::Compilation(_)));
    }

    #[test]
    fn undefined_variable_rejected() {
        let err = CircuitDefinition::<Fr>::from_circuit(&Dangling).unwrap_err();
        assert!(matches!(err, PipelineError::Compilation(_)));
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut api = CircuitBuilder::<Fr>::new();
        api.public_input("a").unwrap();
        assert!(api.private_input("a").is_err());
    }

    #[test]
    fn inputs_after_products_rejected() {
        let mut api = CircuitBuilder::<Fr>::new();
        let a = api.private_input("a").unwrap();
        api.mul(a, a);
        assert!(api.public_input("b").is_err());
    }
}
