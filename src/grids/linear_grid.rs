use std::fmt::Display;

use serde::{Deserialize, Serialize};
use crate::algorithms::hierarchisation::LinearHierarchisationOperation;
use crate::errors::SGError;
use crate::serialization::SerializationFormat;
use crate::storage::BoundingBox;

use super::sparse_grid::{SparseGrid, SparseGridBase};

///
/// Regular sparse grid without boundary points, using piecewise-linear hat functions.
///
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LinearGrid(pub(crate) SparseGridBase);

impl LinearGrid
{
    ///
    /// Creates an empty grid on the unit cube. Call `generate_points` to populate it.
    ///
    pub fn new(num_inputs: usize, level: usize) -> Result<Self, SGError>
    {
        Ok(Self(SparseGridBase::new(num_inputs, level, BoundingBox::with_dim(num_inputs))?))
    }

    ///
    /// Creates an empty grid on `bounding_box`.
    ///
    pub fn with_domain(num_inputs: usize, level: usize, bounding_box: BoundingBox) -> Result<Self, SGError>
    {
        Ok(Self(SparseGridBase::new(num_inputs, level, bounding_box)?))
    }
}

impl SparseGrid for LinearGrid
{
    fn base(&self) -> &SparseGridBase {
        &self.0
    }

    fn base_mut(&mut self) -> &mut SparseGridBase {
        &mut self.0
    }

    fn hierarchize(&mut self) -> Result<(), SGError> {
        self.0.hierarchize(&LinearHierarchisationOperation)
    }

    fn dehierarchize(&mut self) -> Result<(), SGError> {
        self.0.dehierarchize(&LinearHierarchisationOperation)
    }

    fn read<Reader: std::io::Read>(reader: Reader, format: SerializationFormat) -> Result<Self, SGError> where Self: Sized {
        Ok(Self(SparseGridBase::read(reader, format)?))
    }

    fn read_buffer(buffer: &[u8], format: SerializationFormat) -> Result<Self, SGError> where Self: Sized {
        Ok(Self(SparseGridBase::read_buffer(buffer, format)?))
    }
}

impl Display for LinearGrid
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
