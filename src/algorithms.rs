pub(crate) mod sweep;
pub mod basis_evaluation;
pub mod hierarchisation;
pub mod integration;
