use crate::{errors::SGError, storage::{MultiIndex, SparseGridData, MAX_LEVEL}, utilities::multi_index_manipulation::cross};

///
/// All basis functions introduced on `level` in a single dimension: positions 1, 3, ..., 2^level - 1.
///
fn level_indices(level: u8) -> Vec<MultiIndex>
{
    (1..(1_u32 << level)).step_by(2).map(|i| MultiIndex::new(&[level], &[i])).collect()
}

///
/// Generates the multi-indices of a regular sparse grid over `dim` dimensions.
///
/// `budget` is the level available to the leading dimension. Assigning level
/// `k` to it leaves `budget - k + 1` for the remaining dimensions, which keeps
/// `sum(l_i) <= budget + dim - 1`. With zero dimensions the result is the
/// single empty index, so the other-dimension sets of a one-dimensional sweep
/// need no special case.
///
pub fn generate_indices(dim: usize, budget: usize) -> Vec<MultiIndex>
{
    if dim == 0
    {
        return vec![MultiIndex::default()];
    }
    let mut indices = Vec::new();
    for level in 1..=budget
    {
        let current = level_indices(level as u8);
        if dim == 1
        {
            indices.extend(current);
        }
        else
        {
            indices.extend(cross(&current, &generate_indices(dim - 1, budget - level + 1)));
        }
    }
    indices
}

///
/// Fills `storage` with a regular sparse grid without boundary points.
///
pub fn regular(storage: &mut SparseGridData) -> Result<(), SGError>
{
    if storage.num_inputs == 0
    {
        return Err(SGError::InvalidDimension);
    }
    if storage.level == 0 || storage.level > MAX_LEVEL
    {
        return Err(SGError::InvalidLevel);
    }
    storage.clear();
    for index in generate_indices(storage.num_inputs, storage.level)
    {
        storage.insert_point(index);
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::storage::BoundingBox;

    fn binomial(n: usize, k: usize) -> usize
    {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn test_regular_counts()
    {
        assert_eq!(generate_indices(2, 3).len(), 17);
        assert_eq!(generate_indices(3, 3).len(), 31);
        for n in 1..12
        {
            assert_eq!(generate_indices(1, n).len(), (1 << n) - 1);
        }
        // |G| = sum_{k<n} 2^k * binom(d - 1 + k, d - 1)
        for dim in 1..6
        {
            for level in 1..6
            {
                let expected: usize = (0..level).map(|k| (1 << k) * binomial(dim - 1 + k, dim - 1)).sum();
                assert_eq!(generate_indices(dim, level).len(), expected, "dim={dim}, level={level}");
            }
        }
    }

    #[test]
    fn test_admissibility()
    {
        for dim in 1..6
        {
            for level in 1..6
            {
                let indices = generate_indices(dim, level);
                let unique: std::collections::HashSet<_> = indices.iter().collect();
                assert_eq!(unique.len(), indices.len());
                for index in &indices
                {
                    assert_eq!(index.dim(), dim);
                    assert!(index.is_valid());
                    assert!(index.level_sum() <= level + dim - 1);
                }
            }
        }
    }

    #[test]
    fn test_generation_order()
    {
        let indices = generate_indices(2, 2);
        let expected = vec![
            MultiIndex::new(&[1, 1], &[1, 1]),
            MultiIndex::new(&[1, 2], &[1, 1]),
            MultiIndex::new(&[1, 2], &[1, 3]),
            MultiIndex::new(&[2, 1], &[1, 1]),
            MultiIndex::new(&[2, 1], &[3, 1]),
        ];
        assert_eq!(indices, expected);
        assert_eq!(generate_indices(0, 4), vec![MultiIndex::default()]);
        assert!(generate_indices(3, 0).is_empty());
    }

    #[test]
    fn test_regular_storage()
    {
        let mut storage = SparseGridData::new(3, 3, BoundingBox::with_dim(3));
        regular(&mut storage).unwrap();
        assert_eq!(storage.len(), 31);
        assert!(storage.contains(&MultiIndex::new(&[1, 1, 3], &[1, 1, 7])));
        assert!(!storage.contains(&MultiIndex::new(&[2, 1, 3], &[1, 1, 7])));
        // regenerating does not duplicate points
        regular(&mut storage).unwrap();
        assert_eq!(storage.len(), 31);
        let mut storage = SparseGridData::new(0, 3, BoundingBox::with_dim(0));
        assert_eq!(regular(&mut storage), Err(SGError::InvalidDimension));
        let mut storage = SparseGridData::new(2, 0, BoundingBox::with_dim(2));
        assert_eq!(regular(&mut storage), Err(SGError::InvalidLevel));
    }
}
