use crate::storage::MultiIndex;

///
/// Index tuples that can be joined end to end.
///
pub trait Concat
{
    fn concat(&self, other: &Self) -> Self;
}

impl<T: Clone> Concat for Vec<T>
{
    fn concat(&self, other: &Self) -> Self
    {
        let mut r = Vec::with_capacity(self.len() + other.len());
        r.extend_from_slice(self);
        r.extend_from_slice(other);
        r
    }
}

impl Concat for MultiIndex
{
    fn concat(&self, other: &Self) -> Self
    {
        MultiIndex { level: [self.level.as_slice(), other.level.as_slice()].concat(), index: [self.index.as_slice(), other.index.as_slice()].concat() }
    }
}

///
/// Pairwise concatenation of two index collections. The result holds
/// `a.len() * b.len()` entries, outer loop over `a`, inner loop over `b`.
///
pub fn cross<T: Concat>(a: &[T], b: &[T]) -> Vec<T>
{
    let mut r = Vec::with_capacity(a.len() * b.len());
    for lhs in a
    {
        for rhs in b
        {
            r.push(lhs.concat(rhs));
        }
    }
    r
}

#[test]
fn check_cross_order()
{
    let a = vec![vec![1], vec![2]];
    let b = vec![vec![10], vec![20]];
    assert_eq!(cross(&a, &b), vec![vec![1, 10], vec![1, 20], vec![2, 10], vec![2, 20]]);
    assert!(cross(&a, &Vec::<Vec<i32>>::new()).is_empty());
}

#[test]
fn check_cross_multi_index()
{
    let a = vec![MultiIndex::new(&[1], &[1])];
    let b = vec![MultiIndex::new(&[2], &[1]), MultiIndex::new(&[2], &[3])];
    let r = cross(&a, &b);
    assert_eq!(r.len(), 2);
    assert_eq!(r[0], MultiIndex::new(&[1, 2], &[1, 1]));
    assert_eq!(r[1], MultiIndex::new(&[1, 2], &[1, 3]));
}
