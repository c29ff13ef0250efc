use crate::{basis::{base::Basis, linear::LinearBasis}, storage::SparseGridData};

///
/// Integral of the interpolant over the bounding box. Each hat function
/// integrates to `2^-l` per dimension on the unit cube.
///
pub fn integrate(storage: &SparseGridData) -> f64
{
    let basis = LinearBasis;
    let mut integral = 0.0;
    for (index, point) in storage.iter()
    {
        let weight: f64 = index.level.iter().zip(index.index.iter()).map(|(&l, &i)| basis.integral(l as u32, i)).product();
        integral += point.hv * weight;
    }
    integral * storage.bounding_box().volume()
}

#[test]
fn check_integral_of_single_surplus()
{
    use crate::{generators::regular, storage::{BoundingBox, MultiIndex}};
    let mut storage = SparseGridData::new(2, 3, BoundingBox::from_intervals(&[(0.0, 2.0), (1.0, 4.0)]));
    regular(&mut storage).unwrap();
    storage.get_mut(&MultiIndex::new(&[1, 2], &[1, 3])).unwrap().set_surplus(8.0);
    // 8 * 2^-3 * volume 6
    assert!((integrate(&storage) - 6.0).abs() < 1e-15);
}
