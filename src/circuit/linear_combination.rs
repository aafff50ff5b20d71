//! Linear combinations of circuit variables
//!
//! `Σ c_i · v_i + k` over a prime field. Normalisation merges repeated
//! variables, drops zero coefficients and sorts by variable index, so two
//! equal combinations always have identical term lists.

use ark_ff::Field;
use std::ops::{Add, Mul, Neg, Sub};

/// Handle to a variable in a circuit's variable table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub(crate) usize);

impl Variable {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearCombination<F: Field> {
    pub terms: Vec<(Variable, F)>,
    pub constant: F,
}

impl<F: Field> LinearCombination<F> {
    pub fn zero() -> Self {
        Self {
            terms: Vec::new(),
            constant: F::zero(),
        }
    }

    pub fn constant(value: F) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    pub fn term(var: Variable, coeff: F) -> Self {
        Self {
            terms: vec![(var, coeff)],
            constant: F::zero(),
        }.normalized()
    }

    /// Merge duplicates, drop zero coefficients, sort by variable
    pub fn normalized(mut self) -> Self {
        self.terms.sort_by_key(|(v, _)| *v);
        let mut merged: Vec<(Variable, F)> = Vec::with_capacity(self.terms.len());
        for (var, coeff) in self.terms {
            match merged.last_mut() {
                Some((last, acc)) if *last == var => *acc += coeff,
                _ => merged.push((var, coeff)),
            }
        }
        merged.retain(|(_, c)| !c.is_zero());
        self.terms = merged;
        self
    }

    /// Returns the single variable if this is exactly `1 · v`
    pub fn as_variable(&self) -> Option<Variable> {
        match (self.terms.as_slice(), self.constant.is_zero()) {
            ([(v, c)], true) if c.is_one() => Some(*v),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.terms.iter().map(|(v, _)| *v)
    }

    /// Evaluate against a full variable assignment indexed by `Variable`
    pub fn evaluate(&self, values: &[F]) -> F {
        self.terms
            .iter()
            .fold(self.constant, |acc, (v, c)| acc + *c * values[v.0])
    }
}

impl<F: Field> From<Variable> for LinearCombination<F> {
    fn from(var: Variable) -> Self {
        Self::term(var, F::one())
    }
}

impl<F: Field> Add for LinearCombination<F> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self.normalized()
    }
}

impl<F: Field> Add<Variable> for LinearCombination<F> {
    type Output = Self;

    fn add(self, rhs: Variable) -> Self {
        self + LinearCombination::from(rhs)
    }
}

impl<F: Field> Add<LinearCombination<F>> for Variable {
    type Output = LinearCombination<F>;

    fn add(self, rhs: LinearCombination<F>) -> LinearCombination<F> {
        LinearCombination::from(self) + rhs
    }
}

impl<F: Field> Neg for LinearCombination<F> {
    type Output = Self;

    fn neg(mut self) -> Self {
        for (_, c) in self.terms.iter_mut() {
            *c = -*c;
        }
        self.constant = -self.constant;
        self
    }
}

impl<F: Field> Sub for LinearCombination<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<F: Field> Mul<F> for LinearCombination<F> {
    type Output = Self;

    fn mul(mut self, rhs: F) -> Self {
        for (_, c) in self.terms.iter_mut() {
            *c *= rhs;
        }
        self.constant *= rhs;
        self.normalized()
    }
}
