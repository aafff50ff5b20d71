//! Quadratic-constraint backend: R1CS
//!
//! Every constraint has the form (A·z) ◦ (B·z) = (C·z) where
//! z = (1, public inputs, private inputs, intermediates).

mod compile;
mod instance;
mod sparse_matrix;

pub use compile::compile;
pub use instance::R1CSInstance;
pub use sparse_matrix::SparseMatrix;
