//! Row-major matrix type backing the feature grid.
pub mod matrix;

pub use matrix::{Array2, ShapeError};
