use std::fmt::Display;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use crate::{basis::{base::Basis, linear::LinearBasis}, errors::SGError};

/// Largest supported level; positions are stored as `u32`.
pub const MAX_LEVEL: usize = 31;

pub type PointMap = IndexMap<MultiIndex, GridPoint, FxBuildHasher>;

///
/// Level and position of a grid point, one entry per dimension.
/// Positions are odd and lie in `[1, 2^level - 1]`.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultiIndex
{
    pub level: Vec<u8>,
    pub index: Vec<u32>,
}

impl MultiIndex
{
    pub fn new(level: &[u8], index: &[u32]) -> Self
    {
        Self { level: level.to_vec(), index: index.to_vec() }
    }

    ///
    /// Builds an index from the interleaved form `[l_1, p_1, ..., l_d, p_d]`.
    ///
    pub fn from_interleaved(values: &[u32]) -> Result<Self, SGError>
    {
        if values.len() % 2 != 0
        {
            return Err(SGError::InvalidIndex);
        }
        let mut r = Self { level: Vec::with_capacity(values.len() / 2), index: Vec::with_capacity(values.len() / 2) };
        for pair in values.chunks_exact(2)
        {
            let level = u8::try_from(pair[0]).map_err(|_| SGError::InvalidIndex)?;
            r.level.push(level);
            r.index.push(pair[1]);
        }
        if !r.is_valid()
        {
            return Err(SGError::InvalidIndex);
        }
        Ok(r)
    }

    pub fn interleaved(&self) -> Vec<u32>
    {
        self.level.iter().zip(self.index.iter()).flat_map(|(&l, &i)| [l as u32, i]).collect()
    }

    #[inline]
    pub fn dim(&self) -> usize
    {
        self.level.len()
    }

    #[inline]
    pub fn level_sum(&self) -> usize
    {
        self.level.iter().map(|&l| l as usize).sum()
    }

    ///
    /// Every level is at least one and every position is odd and inside its level.
    ///
    pub fn is_valid(&self) -> bool
    {
        self.level.len() == self.index.len() &&
        self.level.iter().zip(self.index.iter()).all(|(&l, &i)|
        {
            l >= 1 && l as usize <= MAX_LEVEL && i % 2 == 1 && (i as u64) < (1_u64 << l)
        })
    }

    ///
    /// Returns a copy with the pair (level, index) spliced in before dimension `dim`.
    ///
    pub fn insert(&self, dim: usize, level: u8, index: u32) -> MultiIndex
    {
        let mut r = self.clone();
        r.level.insert(dim, level);
        r.index.insert(dim, index);
        r
    }

    ///
    /// Walks up the hierarchy in `dim` until the position is odd. Level zero
    /// means the walk left the grid through the domain boundary.
    ///
    fn ancestor(&self, dim: usize, mut level: u8, mut index: u32) -> Option<MultiIndex>
    {
        while index % 2 == 0 && level > 0
        {
            level -= 1;
            index /= 2;
        }
        if level == 0
        {
            return None;
        }
        let mut r = self.clone();
        r.level[dim] = level;
        r.index[dim] = index;
        Some(r)
    }

    ///
    /// Nearest coarser point to the left in direction `dim`, `None` at the boundary.
    ///
    pub fn left_parent(&self, dim: usize) -> Option<MultiIndex>
    {
        if self.level[dim] == 0
        {
            return None;
        }
        self.ancestor(dim, self.level[dim] - 1, self.index[dim] / 2)
    }

    ///
    /// Nearest coarser point to the right in direction `dim`, `None` at the boundary.
    ///
    pub fn right_parent(&self, dim: usize) -> Option<MultiIndex>
    {
        if self.level[dim] == 0
        {
            return None;
        }
        self.ancestor(dim, self.level[dim] - 1, self.index[dim] / 2 + 1)
    }

    pub fn unit_coordinate(&self) -> Vec<f64>
    {
        self.level.iter().zip(self.index.iter()).map(|(&l, &i)| LinearBasis.node(l as u32, i)).collect()
    }
}

impl Display for MultiIndex
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.interleaved())
    }
}

///
/// A single grid node: physical coordinates, nodal value `fv` and
/// hierarchical surplus `hv`.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPoint
{
    pub(crate) pos: Vec<f64>,
    pub(crate) fv: f64,
    pub(crate) hv: f64,
    pub(crate) is_set: bool,
}

impl GridPoint
{
    ///
    /// Places the point for `index` inside `bounding_box`, or inside the unit cube if `None`.
    ///
    pub fn new(index: &MultiIndex, bounding_box: Option<&BoundingBox>) -> Self
    {
        let unit = index.unit_coordinate();
        let pos = match bounding_box
        {
            Some(bbox) => bbox.to_real_coordinate(&unit),
            None => unit,
        };
        Self { pos, fv: 0.0, hv: 0.0, is_set: false }
    }
    #[inline]
    pub fn pos(&self) -> &[f64]
    {
        &self.pos
    }
    #[inline]
    pub fn fv(&self) -> f64
    {
        self.fv
    }
    #[inline]
    pub fn hv(&self) -> f64
    {
        self.hv
    }
    /// Assign the nodal value.
    #[inline]
    pub fn set_value(&mut self, value: f64)
    {
        self.fv = value;
        self.is_set = true;
    }
    /// Overwrite the hierarchical surplus.
    #[inline]
    pub fn set_surplus(&mut self, value: f64)
    {
        self.hv = value;
    }
    /// Has a nodal value been assigned?
    #[inline]
    pub fn is_set(&self) -> bool
    {
        self.is_set
    }
}

impl Display for GridPoint
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for x in &self.pos
        {
            write!(f, "{}\t", x)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox
{
    pub lower: Vec<f64>,
    pub upper: Vec<f64>
}

impl Default for BoundingBox
{
    #[inline]
    fn default() -> Self {
        Self { lower: vec![], upper: vec![] }
    }
}
impl BoundingBox
{
    #[inline]
    pub fn new(lower: &[f64], upper: &[f64]) -> Self
    {
        Self { lower: lower.to_vec(), upper: upper.to_vec() }
    }
    pub fn with_dim(num_inputs: usize) -> Self
    {
        Self { lower: vec![0.0; num_inputs], upper: vec![1.0; num_inputs] }
    }
    ///
    /// Builds a box from `(lower, upper)` pairs, one per dimension.
    ///
    pub fn from_intervals(intervals: &[(f64, f64)]) -> Self
    {
        Self { lower: intervals.iter().map(|i| i.0).collect(), upper: intervals.iter().map(|i| i.1).collect() }
    }
    #[inline]
    pub fn num_inputs(&self) -> usize
    {
        self.lower.len()
    }
    #[inline]
    pub fn interval(&self, dim: usize) -> (f64, f64)
    {
        (self.lower[dim], self.upper[dim])
    }
    #[inline]
    pub fn width(&self, dim: usize) -> f64
    {
        self.upper[dim] - self.lower[dim]
    }

    ///
    /// Volume of hypercube (width(dim1)*...*width(dim_n))
    ///
    #[inline]
    pub fn volume(&self) -> f64
    {
        (0..self.lower.len()).map(|d| self.width(d)).product()
    }

    ///
    /// Checks that the box has `num_inputs` finite, non-empty intervals.
    ///
    pub fn validate(&self, num_inputs: usize) -> Result<(), SGError>
    {
        if self.lower.len() != num_inputs || self.upper.len() != num_inputs
        {
            return Err(SGError::DimensionMismatch);
        }
        for d in 0..num_inputs
        {
            if !self.lower[d].is_finite() || !self.upper[d].is_finite() || self.lower[d] >= self.upper[d]
            {
                return Err(SGError::InvalidDomain);
            }
        }
        Ok(())
    }
    #[inline]
    pub fn to_unit_coordinate(&self, point: &[f64]) -> Vec<f64>
    {
        point.iter().enumerate().map(|(i, x)| (x - self.lower[i]) / self.width(i)).collect()
    }
    #[inline]
    pub fn to_real_coordinate(&self, point: &[f64]) -> Vec<f64>
    {
        point.iter().enumerate().map(|(i, t)| self.lower[i] + self.width(i) * t).collect()
    }
    ///
    /// NaN coordinates are never contained.
    ///
    #[inline]
    pub fn contains(&self, point: &[f64]) -> bool
    {
        point.iter().enumerate().all(|(d, &x)| self.lower[d] <= x && x <= self.upper[d])
    }
}

///
/// Index set of a regular sparse grid together with the point stored for each index.
/// Iteration follows insertion order.
///
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SparseGridData
{
    pub bounding_box: BoundingBox,
    pub(crate) num_inputs: usize,
    pub(crate) level: usize,
    pub(crate) points: PointMap,
}

impl SparseGridData
{
    pub fn new(num_inputs: usize, level: usize, bounding_box: BoundingBox) -> Self
    {
        Self { bounding_box, num_inputs, level, points: PointMap::default() }
    }
    #[inline]
    pub fn num_inputs(&self) -> usize
    {
        self.num_inputs
    }
    #[inline]
    pub fn level(&self) -> usize
    {
        self.level
    }
    #[inline]
    pub fn len(&self) -> usize
    {
        self.points.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool
    {
        self.points.is_empty()
    }
    pub fn clear(&mut self)
    {
        self.points.clear();
    }

    ///
    /// Creates the point for `index`. An existing point is left untouched.
    ///
    pub fn insert_point(&mut self, index: MultiIndex)
    {
        if !self.points.contains_key(&index)
        {
            let point = GridPoint::new(&index, Some(&self.bounding_box));
            self.points.insert(index, point);
        }
    }
    #[inline]
    pub fn contains(&self, index: &MultiIndex) -> bool
    {
        self.points.contains_key(index)
    }
    #[inline]
    pub fn get(&self, index: &MultiIndex) -> Option<&GridPoint>
    {
        self.points.get(index)
    }
    #[inline]
    pub fn get_mut(&mut self, index: &MultiIndex) -> Option<&mut GridPoint>
    {
        self.points.get_mut(index)
    }
    ///
    /// Lookup for indices computed by the grid algorithms; a miss is a bug in index bookkeeping.
    ///
    #[inline]
    pub(crate) fn try_get(&self, index: &MultiIndex) -> Result<&GridPoint, SGError>
    {
        self.points.get(index).ok_or_else(|| SGError::InternalInvariantViolation(index.clone()))
    }
    #[inline]
    pub(crate) fn try_get_mut(&mut self, index: &MultiIndex) -> Result<&mut GridPoint, SGError>
    {
        self.points.get_mut(index).ok_or_else(|| SGError::InternalInvariantViolation(index.clone()))
    }
    pub fn indices(&self) -> indexmap::map::Keys<'_, MultiIndex, GridPoint>
    {
        self.points.keys()
    }
    pub fn iter(&self) -> indexmap::map::Iter<'_, MultiIndex, GridPoint>
    {
        self.points.iter()
    }
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, MultiIndex, GridPoint>
    {
        self.points.iter_mut()
    }
    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox
    {
        &self.bounding_box
    }

    ///
    /// Checks the grid parameters and that every stored index is admissible.
    /// Used on data that did not come from the constructor.
    ///
    pub fn validate(&self) -> Result<(), SGError>
    {
        if self.num_inputs == 0
        {
            return Err(SGError::InvalidDimension);
        }
        if self.level == 0 || self.level > MAX_LEVEL
        {
            return Err(SGError::InvalidLevel);
        }
        self.bounding_box.validate(self.num_inputs)?;
        let budget = self.level + self.num_inputs - 1;
        for (index, point) in self.points.iter()
        {
            if !index.is_valid() || index.dim() != self.num_inputs || index.level_sum() > budget || point.pos.len() != self.num_inputs
            {
                return Err(SGError::InvalidIndex);
            }
        }
        Ok(())
    }
}

#[test]
fn check_parents()
{
    // (3, 3) sits at 3/8, neighbours 1/4 = (2, 1) and 1/2 = (1, 1)
    let index = MultiIndex::new(&[3], &[3]);
    assert_eq!(index.left_parent(0), Some(MultiIndex::new(&[2], &[1])));
    assert_eq!(index.right_parent(0), Some(MultiIndex::new(&[1], &[1])));
    // (3, 1) sits at 1/8, left neighbour is the boundary
    let index = MultiIndex::new(&[3, 2], &[1, 3]);
    assert_eq!(index.left_parent(0), None);
    assert_eq!(index.right_parent(0), Some(MultiIndex::new(&[2, 2], &[1, 3])));
    // (3, 7) sits at 7/8, right neighbour is the boundary
    let index = MultiIndex::new(&[3], &[7]);
    assert_eq!(index.left_parent(0), Some(MultiIndex::new(&[2], &[3])));
    assert_eq!(index.right_parent(0), None);
    // the root has no parents
    let index = MultiIndex::new(&[1, 1], &[1, 1]);
    assert_eq!(index.left_parent(1), None);
    assert_eq!(index.right_parent(1), None);
}

#[test]
fn check_interleaved()
{
    let index = MultiIndex::from_interleaved(&[1, 1, 3, 5]).unwrap();
    assert_eq!(index, MultiIndex::new(&[1, 3], &[1, 5]));
    assert_eq!(index.interleaved(), vec![1, 1, 3, 5]);
    assert_eq!(index.insert(1, 2, 3), MultiIndex::new(&[1, 2, 3], &[1, 3, 5]));
    assert_eq!(MultiIndex::from_interleaved(&[1, 1, 3]), Err(SGError::InvalidIndex));
    assert_eq!(MultiIndex::from_interleaved(&[2, 2]), Err(SGError::InvalidIndex));
    assert_eq!(MultiIndex::from_interleaved(&[2, 5]), Err(SGError::InvalidIndex));
    assert_eq!(MultiIndex::from_interleaved(&[0, 1]), Err(SGError::InvalidIndex));
}

#[test]
fn check_point_position()
{
    let index = MultiIndex::new(&[2, 3], &[3, 1]);
    let point = GridPoint::new(&index, None);
    assert_eq!(point.pos(), &[0.75, 0.125]);
    assert!(!point.is_set());
    let bbox = BoundingBox::from_intervals(&[(-1.0, 1.0), (2.0, 10.0)]);
    let point = GridPoint::new(&index, Some(&bbox));
    assert_eq!(point.pos(), &[0.5, 3.0]);
    assert_eq!(point.to_string(), "0.5\t3\t");
}

#[test]
fn check_point_position_is_affine_and_increasing()
{
    let (lo, hi) = (-3.0, 5.0);
    let bbox = BoundingBox::from_intervals(&[(lo, hi)]);
    for level in 1..=6_u8
    {
        let mut previous = f64::NEG_INFINITY;
        for p in (1..1_u32 << level).step_by(2)
        {
            let x = GridPoint::new(&MultiIndex::new(&[level], &[p]), Some(&bbox)).pos()[0];
            let expected = lo + (hi - lo) * p as f64 / (1_u32 << level) as f64;
            assert!((x - expected).abs() < 1e-12, "level {level} index {p}: {x} != {expected}");
            assert!(x > previous);
            assert!(lo < x && x < hi);
            previous = x;
        }
    }
}

#[test]
fn check_storage_validation()
{
    let mut storage = SparseGridData::new(2, 2, BoundingBox::with_dim(2));
    storage.insert_point(MultiIndex::new(&[1, 2], &[1, 3]));
    assert_eq!(storage.validate(), Ok(()));
    storage.insert_point(MultiIndex::new(&[2, 2], &[1, 3]));
    assert_eq!(storage.validate(), Err(SGError::InvalidIndex));

    let mut storage = SparseGridData::new(2, 2, BoundingBox::with_dim(2));
    storage.insert_point(MultiIndex::new(&[1], &[1]));
    assert_eq!(storage.validate(), Err(SGError::InvalidIndex));

    let mut storage = SparseGridData::new(2, 2, BoundingBox::with_dim(2));
    storage.insert_point(MultiIndex::new(&[2, 1], &[2, 1]));
    assert_eq!(storage.validate(), Err(SGError::InvalidIndex));

    assert_eq!(SparseGridData::new(0, 2, BoundingBox::with_dim(0)).validate(), Err(SGError::InvalidDimension));
    assert_eq!(SparseGridData::new(2, 32, BoundingBox::with_dim(2)).validate(), Err(SGError::InvalidLevel));
    assert_eq!(SparseGridData::new(2, 2, BoundingBox::with_dim(1)).validate(), Err(SGError::DimensionMismatch));
}

#[test]
fn check_bounding_box()
{
    let bbox = BoundingBox::from_intervals(&[(0.0, 2.0), (-1.0, 1.0)]);
    assert_eq!(bbox.volume(), 4.0);
    assert!(bbox.contains(&[2.0, -1.0]));
    assert!(!bbox.contains(&[2.1, 0.0]));
    assert!(!bbox.contains(&[f64::NAN, 0.0]));
    assert_eq!(bbox.to_unit_coordinate(&[1.0, 0.0]), vec![0.5, 0.5]);
    assert_eq!(bbox.validate(2), Ok(()));
    assert_eq!(bbox.validate(3), Err(SGError::DimensionMismatch));
    assert_eq!(BoundingBox::from_intervals(&[(1.0, 1.0)]).validate(1), Err(SGError::InvalidDomain));
    assert_eq!(BoundingBox::from_intervals(&[(0.0, f64::INFINITY)]).validate(1), Err(SGError::InvalidDomain));
}
