use std::fmt::Display;
use std::io::Write;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rayon::slice::ParallelSlice;
use serde::{Deserialize, Serialize};
use crate::algorithms::basis_evaluation::BasisEvaluation;
use crate::algorithms::hierarchisation::HierarchisationOperation;
use crate::algorithms::integration;
use crate::errors::SGError;
use crate::generators;
use crate::iterators::subspace_iterator::SubspaceIterator;
use crate::serialization::SerializationFormat;
use crate::storage::{BoundingBox, GridPoint, MultiIndex, SparseGridData, MAX_LEVEL};

pub trait SparseGrid
{
    /// Get the `SparseGridBase` for this grid.
    fn base(&self) -> &SparseGridBase;

    /// Get the `SparseGridBase` for this grid (mutable).
    fn base_mut(&mut self) -> &mut SparseGridBase;

    /// Convert the nodal values into hierarchical surpluses.
    fn hierarchize(&mut self) -> Result<(), SGError>;

    /// Recompute the nodal values from the hierarchical surpluses.
    fn dehierarchize(&mut self) -> Result<(), SGError>;

    fn num_inputs(&self) -> usize
    {
        self.base().storage.num_inputs()
    }

    fn level(&self) -> usize
    {
        self.base().storage.level()
    }

    fn bounding_box(&self) -> &BoundingBox
    {
        self.base().storage.bounding_box()
    }

    fn is_empty(&self) -> bool
    {
        self.base().storage.is_empty()
    }

    fn len(&self) -> usize
    {
        self.base().storage.len()
    }

    /// Generate the points of the regular sparse grid. Existing points and values are discarded.
    fn generate_points(&mut self) -> Result<(), SGError>
    {
        self.base_mut().generate_points()
    }

    /// Retrieve the underlying storage
    fn storage(&self) -> &SparseGridData
    {
        &self.base().storage
    }

    /// Indices of the grid points, in generation order.
    fn indices(&self) -> indexmap::map::Keys<'_, MultiIndex, GridPoint>
    {
        self.base().storage.indices()
    }

    /// Grid points with their indices, in generation order.
    fn points(&self) -> indexmap::map::Iter<'_, MultiIndex, GridPoint>
    {
        self.base().storage.iter()
    }

    fn point(&self, index: &MultiIndex) -> Option<&GridPoint>
    {
        self.base().storage.get(index)
    }

    /// Mutable access to a point. The grid is treated as no longer hierarchized.
    fn point_mut(&mut self, index: &MultiIndex) -> Option<&mut GridPoint>
    {
        let base = self.base_mut();
        base.hierarchized = false;
        base.storage.get_mut(index)
    }

    /// Has `hierarchize` run since the nodal values last changed?
    fn is_hierarchized(&self) -> bool
    {
        self.base().hierarchized
    }

    /// Set nodal values in generation order.
    fn set_values(&mut self, values: Vec<f64>) -> Result<(), SGError>
    {
        self.base_mut().set_values(values)
    }

    /// Sample `f` at every grid point and store the results as nodal values.
    fn update_values<F: Fn(&[f64]) -> f64>(&mut self, f: &F)
    {
        self.base_mut().update_values(f)
    }

    /// Same as `update_values`, evaluating `f` on the rayon thread pool.
    fn update_values_parallel<F: Fn(&[f64]) -> f64 + Send + Sync>(&mut self, f: &F)
    {
        self.base_mut().update_values_parallel(f)
    }

    /// Fails with the index of the first point that has no nodal value.
    fn check_values(&self) -> Result<(), SGError>
    {
        self.base().check_values()
    }

    /// Evaluate the interpolant at `x`. Checks that `x` lies within the bounding box.
    fn evaluate(&self, x: &[f64]) -> Result<f64, SGError>
    {
        self.base().evaluate(x)
    }

    /// Evaluate the interpolant at `x`, summing the subspaces in parallel.
    fn evaluate_parallel(&self, x: &[f64]) -> Result<f64, SGError>
    {
        self.base().evaluate_parallel(x)
    }

    /// Evaluate at many points stored contiguously, `num_inputs` coordinates each.
    fn evaluate_batch(&self, x: &[f64]) -> Result<Vec<f64>, SGError>
    {
        self.base().evaluate_batch(x)
    }

    /// Compute integral over grid.
    fn integrate(&self) -> f64
    {
        integration::integrate(&self.base().storage)
    }

    /// Hierarchical subspaces of this grid.
    fn subspaces(&self) -> SubspaceIterator
    {
        SubspaceIterator::new(self.num_inputs(), self.level())
    }

    fn write(&self, path: &str, format: SerializationFormat) -> Result<(), SGError>
    {
        self.base().write(path, format)
    }

    fn read<Reader: std::io::Read>(reader: Reader, format: SerializationFormat) -> Result<Self, SGError> where Self: Sized;

    fn read_buffer(buffer: &[u8], format: SerializationFormat) -> Result<Self, SGError> where Self: Sized;
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SparseGridBase
{
    pub(crate) storage: SparseGridData,
    pub(crate) hierarchized: bool,
}

impl SparseGridBase
{
    pub fn new(num_inputs: usize, level: usize, bounding_box: BoundingBox) -> Result<Self, SGError>
    {
        if num_inputs == 0
        {
            return Err(SGError::InvalidDimension);
        }
        if level == 0 || level > MAX_LEVEL
        {
            return Err(SGError::InvalidLevel);
        }
        bounding_box.validate(num_inputs)?;
        Ok(Self { storage: SparseGridData::new(num_inputs, level, bounding_box), hierarchized: false })
    }

    pub fn storage(&self) -> &SparseGridData
    {
        &self.storage
    }

    pub fn generate_points(&mut self) -> Result<(), SGError>
    {
        generators::regular(&mut self.storage)?;
        self.hierarchized = false;
        Ok(())
    }

    pub fn hierarchize<OP: HierarchisationOperation>(&mut self, op: &OP) -> Result<(), SGError>
    {
        op.hierarchize(&mut self.storage)?;
        self.hierarchized = true;
        Ok(())
    }

    pub fn dehierarchize<OP: HierarchisationOperation>(&mut self, op: &OP) -> Result<(), SGError>
    {
        op.dehierarchize(&mut self.storage)?;
        self.hierarchized = true;
        Ok(())
    }

    pub fn set_values(&mut self, values: Vec<f64>) -> Result<(), SGError>
    {
        if values.len() != self.storage.len()
        {
            return Err(SGError::NumberOfPointsAndValuesMismatch);
        }
        for ((_, point), value) in self.storage.iter_mut().zip(values)
        {
            point.set_value(value);
        }
        self.hierarchized = false;
        Ok(())
    }

    pub fn update_values<F: Fn(&[f64]) -> f64>(&mut self, f: &F)
    {
        for (_, point) in self.storage.iter_mut()
        {
            let value = f(&point.pos);
            point.set_value(value);
        }
        self.hierarchized = false;
    }

    pub fn update_values_parallel<F: Fn(&[f64]) -> f64 + Send + Sync>(&mut self, f: &F)
    {
        let points: Vec<&GridPoint> = self.storage.points.values().collect();
        let values: Vec<f64> = points.par_iter().map(|point| f(&point.pos)).collect();
        for ((_, point), value) in self.storage.iter_mut().zip(values)
        {
            point.set_value(value);
        }
        self.hierarchized = false;
    }

    pub fn check_values(&self) -> Result<(), SGError>
    {
        if self.storage.is_empty()
        {
            return Err(SGError::PointsNotGenerated);
        }
        match self.storage.iter().find(|(_, point)| !point.is_set())
        {
            Some((index, _)) => Err(SGError::UninitializedValue(index.clone())),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn evaluate(&self, x: &[f64]) -> Result<f64, SGError>
    {
        BasisEvaluation::new(&self.storage).eval(x)
    }

    #[inline]
    pub fn evaluate_parallel(&self, x: &[f64]) -> Result<f64, SGError>
    {
        BasisEvaluation::new(&self.storage).eval_parallel(x)
    }

    pub fn evaluate_batch(&self, x: &[f64]) -> Result<Vec<f64>, SGError>
    {
        if self.storage.is_empty()
        {
            return Err(SGError::PointsNotGenerated);
        }
        let num_inputs = self.storage.num_inputs;
        if x.len() % num_inputs != 0
        {
            return Err(SGError::DimensionMismatch);
        }
        let op = BasisEvaluation::new(&self.storage);
        x.par_chunks_exact(num_inputs).map(|point| op.eval(point)).collect()
    }

    ///
    /// Writes the grid, including nodal values and surpluses.
    ///
    pub fn write(&self, path: &str, format: SerializationFormat) -> Result<(), SGError>
    {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path).map_err(|_|SGError::FileIOError)?);
        let buffer = crate::serialization::serialize(self, format)?;
        file.write_all(&buffer).map_err(|_|SGError::WriteBufferFailed)?;
        file.flush().map_err(|_|SGError::WriteBufferFailed)?;
        Ok(())
    }

    ///
    /// Decodes a grid and rejects parameters or indices the constructor would not produce.
    ///
    pub fn read_buffer(buffer: &[u8], format: SerializationFormat) -> Result<Self, SGError>
    {
        let grid: Self = crate::serialization::deserialize(buffer, format)?;
        grid.storage.validate().map_err(|_| SGError::DeserializationFailed)?;
        Ok(grid)
    }

    pub fn read<Reader: std::io::Read>(mut reader: Reader, format: SerializationFormat) -> Result<Self, SGError>
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|_|SGError::ReadBufferFailed)?;
        Self::read_buffer(&bytes, format)
    }
}

impl Display for SparseGridBase
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (_, point) in self.storage.iter()
        {
            writeln!(f, "{}", point)?;
        }
        Ok(())
    }
}
