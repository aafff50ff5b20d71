//! Sparse matrix representation and basic operations
//!
//! Stored as a list of (row, col, value) triples in insertion order.

use ark_ff::Field;
use rayon::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseMatrix<F: Field> {
    pub num_rows: usize,
    pub num_cols: usize,
    pub entries: Vec<(usize, usize, F)>,
}

impl<F: Field> SparseMatrix<F> {
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            entries: Vec::new(),
        }
    }

    /// Add an entry (row, col, value). Panics if out of bounds.
    pub fn add_entry(&mut self, row: usize, col: usize, value: F) {
        assert!(row < self.num_rows, "row out of bounds");
        assert!(col < self.num_cols, "col out of bounds");
        if !value.is_zero() {
            self.entries.push((row, col, value));
        }
    }

    pub fn num_non_zero(&self) -> usize {
        self.entries.len()
    }

    /// Entries grouped by column, each list in insertion order
    pub fn columns(&self) -> BTreeMap<usize, Vec<(usize, F)>> {
        let mut cols: BTreeMap<usize, Vec<(usize, F)>> = BTreeMap::new();
        for &(r, c, v) in &self.entries {
            cols.entry(c).or_default().push((r, v));
        }
        cols
    }

    /// Matrix-vector product: returns a vector of length num_rows
    pub fn mul_vector(&self, vector: &[F]) -> Vec<F> {
        assert_eq!(vector.len(), self.num_cols, "vector length mismatch");

        const PARALLEL_THRESHOLD: usize = 1000;

        if self.entries.len() >= PARALLEL_THRESHOLD {
            self.mul_vector_parallel(vector)
        } else {
            self.mul_vector_sequential(vector)
        }
    }

    fn mul_vector_sequential(&self, vector: &[F]) -> Vec<F> {
        let mut result = vec![F::zero(); self.num_rows];
        for &(r, c, ref v) in &self.entries {
            result[r] += *v * vector[c];
        }
        result
    }

    /// Groups entries by row and processes rows in parallel
    fn mul_vector_parallel(&self, vector: &[F]) -> Vec<F> {
        let mut rows: Vec<Vec<(usize, F)>> = vec![Vec::new(); self.num_rows];
        for &(r, c, v) in &self.entries {
            rows[r].push((c, v));
        }

        rows.par_iter()
            .map(|row| {
                row.iter()
                    .fold(F::zero(), |acc, (c, v)| acc + *v * vector[*c])
            })
            .collect()
    }
}
