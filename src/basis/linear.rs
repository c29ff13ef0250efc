use super::base::Basis;

///
/// One-dimensional hat function centered at `index / 2^level`, evaluated at `x`.
/// If `interval` is given, `x` is first mapped from `interval` to the unit interval.
/// The result is not clipped: values `<= 0` lie outside the support.
///
#[inline]
pub fn hat(x: f64, level: u32, index: u32, interval: Option<(f64, f64)>) -> f64
{
    let t = match interval
    {
        Some((lower, upper)) => (x - lower) / (upper - lower),
        None => x,
    };
    1.0 - f64::abs(t * (1_u64 << level) as f64 - index as f64)
}

#[derive(Copy, Clone, Debug, Default)]
pub struct LinearBasis;

impl Basis for LinearBasis
{
    #[inline]
    fn eval(&self, level: u32, index: u32, x: f64) -> f64
    {
        0.0_f64.max(hat(x, level, index, None))
    }

    #[inline]
    fn node(&self, level: u32, index: u32) -> f64
    {
        index as f64 / (1_u64 << level) as f64
    }

    #[inline]
    fn integral(&self, level: u32, _index: u32) -> f64
    {
        1.0 / (1_u64 << level) as f64
    }

    #[inline]
    fn active_index(&self, level: u32, x: f64) -> u32
    {
        let max_index = ((1_u64 << level) - 1) as f64;
        let index = (x * (1_u64 << (level - 1)) as f64).ceil() * 2.0 - 1.0;
        // x == 0 lands on index -1; the first hat function still covers it.
        if index < 1.0
        {
            1
        }
        else
        {
            index.min(max_index) as u32
        }
    }
}
