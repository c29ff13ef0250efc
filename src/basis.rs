pub mod base;
pub mod linear;
