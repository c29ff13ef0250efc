///
/// Iterates over the hierarchical subspaces of a regular sparse grid, i.e. all
/// level vectors `(k_1, ..., k_d)` with `k_i >= 1` and `sum(k_i) <= level + d - 1`.
/// Subspaces are produced in lexicographic order with the first dimension varying slowest.
///
#[derive(Clone, Debug)]
pub struct SubspaceIterator
{
    level_bound: usize,
    index_head: Vec<u8>,
    first: bool,
}

impl SubspaceIterator
{
    pub fn new(num_inputs: usize, level: usize) -> Self
    {
        Self
        {
            level_bound: (level + num_inputs).saturating_sub(1),
            index_head: vec![1; num_inputs],
            first: num_inputs > 0 && level > 0,
        }
    }
}

impl Iterator for SubspaceIterator
{
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.first
        {
            self.first = false;
            return Some(self.index_head.clone());
        }
        let ndim = self.index_head.len();
        // Advance the rightmost dimension that can still grow once everything
        // after it is reset to level one.
        for dim in (0..ndim).rev()
        {
            let tail = ndim - 1 - dim;
            let head_sum: usize = self.index_head[..=dim].iter().map(|&l| l as usize).sum();
            if head_sum + 1 + tail <= self.level_bound
            {
                self.index_head[dim] += 1;
                for l in &mut self.index_head[dim + 1..]
                {
                    *l = 1;
                }
                return Some(self.index_head.clone());
            }
        }
        None
    }
}

#[test]
fn test_subspace_order()
{
    let subspaces: Vec<Vec<u8>> = SubspaceIterator::new(2, 3).collect();
    let expected: Vec<Vec<u8>> = vec![vec![1, 1], vec![1, 2], vec![1, 3], vec![2, 1], vec![2, 2], vec![3, 1]];
    assert_eq!(subspaces, expected);
}

#[test]
fn test_subspace_counts()
{
    // binom(level + dim - 1, dim) subspaces
    assert_eq!(SubspaceIterator::new(1, 5).count(), 5);
    assert_eq!(SubspaceIterator::new(3, 3).count(), 10);
    assert_eq!(SubspaceIterator::new(4, 4).count(), 35);
    assert_eq!(SubspaceIterator::new(0, 4).count(), 0);
    assert_eq!(SubspaceIterator::new(3, 0).count(), 0);
    for levels in SubspaceIterator::new(4, 4)
    {
        assert!(levels.iter().map(|&l| l as usize).sum::<usize>() <= 7);
        assert!(levels.iter().all(|&l| l >= 1));
    }
}
