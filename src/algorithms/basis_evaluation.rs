use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use crate::{basis::{base::Basis, linear::LinearBasis}, errors::SGError, iterators::subspace_iterator::SubspaceIterator, storage::{MultiIndex, SparseGridData}};

///
/// The basis function that is active at a fixed point, for every dimension and level.
///
pub(crate) struct ActiveBasis
{
    /// `index[d][l - 1]` is the position of the active function on level `l` in dimension `d`.
    index: Vec<Vec<u32>>,
    value: Vec<Vec<f64>>,
}

impl ActiveBasis
{
    #[inline]
    fn get(&self, dim: usize, level: u8) -> (u32, f64)
    {
        let l = level as usize - 1;
        (self.index[dim][l], self.value[dim][l])
    }
}

pub struct BasisEvaluation<'a>(pub &'a SparseGridData, pub LinearBasis);

impl<'a> BasisEvaluation<'a>
{
    pub fn new(storage: &'a SparseGridData) -> Self
    {
        Self(storage, LinearBasis)
    }

    fn check(&self, point: &[f64]) -> Result<(), SGError>
    {
        if self.0.is_empty()
        {
            return Err(SGError::PointsNotGenerated);
        }
        if point.len() != self.0.num_inputs
        {
            return Err(SGError::DimensionMismatch);
        }
        if !self.0.bounding_box.contains(point)
        {
            return Err(SGError::OutOfDomain);
        }
        Ok(())
    }

    pub(crate) fn active_basis(&self, point: &[f64]) -> ActiveBasis
    {
        let unit_coord = self.0.bounding_box.to_unit_coordinate(point);
        let level = self.0.level as u32;
        let mut index: Vec<Vec<u32>> = Vec::with_capacity(unit_coord.len());
        let mut value: Vec<Vec<f64>> = Vec::with_capacity(unit_coord.len());
        for &x in &unit_coord
        {
            let active: Vec<u32> = (1..=level).map(|l| self.1.active_index(l, x)).collect();
            value.push((1..=level).zip(active.iter()).map(|(l, &i)| self.1.eval(l, i, x)).collect());
            index.push(active);
        }
        ActiveBasis { index, value }
    }

    ///
    /// Contribution of the subspace with per-dimension `levels` at the point described by `active`.
    ///
    #[inline]
    fn subspace_contribution(&self, active: &ActiveBasis, levels: &[u8]) -> Result<f64, SGError>
    {
        let mut node = MultiIndex { level: levels.to_vec(), index: Vec::with_capacity(levels.len()) };
        let mut value = 1.0;
        for (d, &l) in levels.iter().enumerate()
        {
            let (i, v) = active.get(d, l);
            node.index.push(i);
            value *= v;
        }
        Ok(self.0.try_get(&node)?.hv * value)
    }

    ///
    /// Evaluates the interpolant at `point` (physical coordinates) from the surpluses.
    ///
    pub fn eval(&self, point: &[f64]) -> Result<f64, SGError>
    {
        self.check(point)?;
        let active = self.active_basis(point);
        SubspaceIterator::new(self.0.num_inputs, self.0.level)
            .try_fold(0.0, |sum, levels| self.subspace_contribution(&active, &levels).map(|v| sum + v))
    }

    ///
    /// Same as `eval`, with the subspaces distributed over the rayon thread pool.
    /// The summation order is not fixed.
    ///
    pub fn eval_parallel(&self, point: &[f64]) -> Result<f64, SGError>
    {
        self.check(point)?;
        let active = self.active_basis(point);
        let subspaces: Vec<Vec<u8>> = SubspaceIterator::new(self.0.num_inputs, self.0.level).collect();
        subspaces.par_iter()
            .map(|levels| self.subspace_contribution(&active, levels))
            .try_reduce(|| 0.0, |a, b| Ok(a + b))
    }
}
