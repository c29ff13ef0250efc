use crate::{errors::SGError, generators::generate_indices, storage::{GridPoint, MultiIndex, SparseGridData}};

pub trait SweepFunction
{
    /// Levels of the swept dimension are visited from finest to coarsest when true.
    fn fine_to_coarse(&self) -> bool;
    fn execute_in_place(&mut self, storage: &mut SparseGridData, node: &MultiIndex, dimension: usize) -> Result<(), SGError>;
}

///
/// Value of a 1-D parent, zero if the parent is the domain boundary.
///
#[inline]
pub(crate) fn parent_value(storage: &SparseGridData, parent: Option<MultiIndex>, value: fn(&GridPoint) -> f64) -> Result<f64, SGError>
{
    match parent
    {
        Some(index) => Ok(value(storage.try_get(&index)?)),
        None => Ok(0.0),
    }
}

///
/// Applies `function` to every point of the grid along dimension `dim_sweep`,
/// one level at a time. For level `l` in the swept dimension the remaining
/// dimensions may still spend a budget of `level - l + 1`.
///
pub(crate) fn sweep_1d_in_place<F: SweepFunction>(function: &mut F, storage: &mut SparseGridData, dim_sweep: usize) -> Result<(), SGError>
{
    let ndim = storage.num_inputs;
    let level = storage.level;
    let levels: Vec<usize> = if function.fine_to_coarse()
    {
        (1..=level).rev().collect()
    }
    else
    {
        (1..=level).collect()
    };
    for l in levels
    {
        let others = generate_indices(ndim - 1, level - l + 1);
        for i in (1..(1_u32 << l)).step_by(2)
        {
            for other in &others
            {
                let node = other.insert(dim_sweep, l as u8, i);
                function.execute_in_place(storage, &node, dim_sweep)?;
            }
        }
    }
    Ok(())
}
