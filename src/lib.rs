//! Regular sparse grids without boundary points, built from piecewise-linear
//! hierarchical hat functions.
//!
//! ```
//! use sgregular::grids::{linear_grid::LinearGrid, sparse_grid::SparseGrid};
//!
//! let mut grid = LinearGrid::new(2, 3)?;
//! grid.generate_points()?;
//! grid.update_values(&|x: &[f64]| x[0] * x[1]);
//! grid.hierarchize()?;
//! let value = grid.evaluate(&[0.25, 0.5])?;
//! assert!((value - 0.125).abs() < 1e-12);
//! # Ok::<(), sgregular::errors::SGError>(())
//! ```
pub mod algorithms;
pub mod basis;
pub mod errors;
pub mod generators;
pub mod grids;
pub mod iterators;
pub mod serialization;
pub mod storage;
pub mod utilities;
