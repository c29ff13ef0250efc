use crate::{algorithms::sweep::{parent_value, sweep_1d_in_place, SweepFunction}, errors::SGError, storage::{MultiIndex, SparseGridData}};

pub trait HierarchisationOperation : Copy
{
    /// Converts the nodal values `fv` into hierarchical surpluses `hv`.
    fn hierarchize(&self, storage: &mut SparseGridData) -> Result<(), SGError>;
    /// Recomputes the nodal values `fv` from the surpluses `hv`.
    fn dehierarchize(&self, storage: &mut SparseGridData) -> Result<(), SGError>;
}

pub struct LinearHierarchisation;

impl SweepFunction for LinearHierarchisation
{
    fn fine_to_coarse(&self) -> bool
    {
        true
    }

    #[inline]
    fn execute_in_place(&mut self, storage: &mut SparseGridData, node: &MultiIndex, dimension: usize) -> Result<(), SGError>
    {
        let left = parent_value(storage, node.left_parent(dimension), |p| p.hv)?;
        let right = parent_value(storage, node.right_parent(dimension), |p| p.hv)?;
        storage.try_get_mut(node)?.hv -= 0.5 * (left + right);
        Ok(())
    }
}

pub struct LinearDehierarchisation;

impl SweepFunction for LinearDehierarchisation
{
    fn fine_to_coarse(&self) -> bool
    {
        false
    }

    #[inline]
    fn execute_in_place(&mut self, storage: &mut SparseGridData, node: &MultiIndex, dimension: usize) -> Result<(), SGError>
    {
        let left = parent_value(storage, node.left_parent(dimension), |p| p.fv)?;
        let right = parent_value(storage, node.right_parent(dimension), |p| p.fv)?;
        storage.try_get_mut(node)?.fv += 0.5 * (left + right);
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub struct LinearHierarchisationOperation;

impl HierarchisationOperation for LinearHierarchisationOperation
{
    fn hierarchize(&self, storage: &mut SparseGridData) -> Result<(), SGError>
    {
        if storage.is_empty()
        {
            return Err(SGError::PointsNotGenerated);
        }
        for (_, point) in storage.iter_mut()
        {
            point.hv = point.fv;
        }
        let mut func = LinearHierarchisation;
        for d in 0..storage.num_inputs
        {
            sweep_1d_in_place(&mut func, storage, d)?;
        }
        Ok(())
    }

    fn dehierarchize(&self, storage: &mut SparseGridData) -> Result<(), SGError>
    {
        if storage.is_empty()
        {
            return Err(SGError::PointsNotGenerated);
        }
        for (_, point) in storage.iter_mut()
        {
            point.fv = point.hv;
            point.is_set = true;
        }
        let mut func = LinearDehierarchisation;
        for d in 0..storage.num_inputs
        {
            sweep_1d_in_place(&mut func, storage, d)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{generators::regular, storage::BoundingBox};

    fn grid_1d(level: usize, f: impl Fn(f64) -> f64) -> SparseGridData
    {
        let mut storage = SparseGridData::new(1, level, BoundingBox::with_dim(1));
        regular(&mut storage).unwrap();
        for (_, point) in storage.iter_mut()
        {
            let x = point.pos[0];
            point.set_value(f(x));
        }
        storage
    }

    #[test]
    fn check_surpluses_1d()
    {
        // f(x) = 4x(1-x) on level 2: f(1/2) = 1, f(1/4) = f(3/4) = 3/4
        let mut storage = grid_1d(2, |x| 4.0 * x * (1.0 - x));
        LinearHierarchisationOperation.hierarchize(&mut storage).unwrap();
        assert_eq!(storage.get(&MultiIndex::new(&[1], &[1])).unwrap().hv(), 1.0);
        assert_eq!(storage.get(&MultiIndex::new(&[2], &[1])).unwrap().hv(), 0.25);
        assert_eq!(storage.get(&MultiIndex::new(&[2], &[3])).unwrap().hv(), 0.25);
    }

    #[test]
    fn check_linear_function_has_no_fine_surplus()
    {
        // a hat-shaped function is reproduced by the level one basis alone
        let mut storage = grid_1d(4, |x| 1.0 - (2.0 * x - 1.0).abs());
        LinearHierarchisationOperation.hierarchize(&mut storage).unwrap();
        for (index, point) in storage.iter()
        {
            if index.level[0] == 1
            {
                assert!((point.hv() - 1.0).abs() < 1e-15);
            }
            else
            {
                assert!(point.hv().abs() < 1e-15);
            }
        }
    }

    #[test]
    fn check_hierarchize_is_repeatable()
    {
        let mut storage = grid_1d(3, |x| x.sin());
        LinearHierarchisationOperation.hierarchize(&mut storage).unwrap();
        let first: Vec<f64> = storage.iter().map(|(_, p)| p.hv()).collect();
        LinearHierarchisationOperation.hierarchize(&mut storage).unwrap();
        let second: Vec<f64> = storage.iter().map(|(_, p)| p.hv()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn check_dehierarchize_inverts()
    {
        let mut storage = SparseGridData::new(3, 4, BoundingBox::with_dim(3));
        regular(&mut storage).unwrap();
        for (_, point) in storage.iter_mut()
        {
            let v: f64 = point.pos.iter().map(|x| x.exp()).sum();
            point.set_value(v);
        }
        let nodal: Vec<f64> = storage.iter().map(|(_, p)| p.fv()).collect();
        LinearHierarchisationOperation.hierarchize(&mut storage).unwrap();
        for (_, point) in storage.iter_mut()
        {
            point.fv = 0.0;
        }
        LinearHierarchisationOperation.dehierarchize(&mut storage).unwrap();
        for (expected, (_, point)) in nodal.iter().zip(storage.iter())
        {
            assert!((expected - point.fv()).abs() < 1e-12);
        }
    }

    #[test]
    fn check_empty_storage()
    {
        let mut storage = SparseGridData::new(2, 2, BoundingBox::with_dim(2));
        assert_eq!(LinearHierarchisationOperation.hierarchize(&mut storage), Err(SGError::PointsNotGenerated));
        assert_eq!(LinearHierarchisationOperation.dehierarchize(&mut storage), Err(SGError::PointsNotGenerated));
    }
}
