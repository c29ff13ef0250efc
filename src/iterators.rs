pub mod subspace_iterator;
