//! Reading feature files into a `Grid` and writing normalized grids back out.

pub mod grid_reader;
pub mod writer;

pub use grid_reader::{load_grid, load_grid_from_path, GridLoader, GridShape};
pub use writer::write_grid;
