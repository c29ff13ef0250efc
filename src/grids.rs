pub mod linear_grid;
pub mod sparse_grid;
