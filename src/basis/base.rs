pub trait Basis
{
    /// Value of basis function (level, index) at the unit coordinate `x`.
    fn eval(&self, level: u32, index: u32, x: f64) -> f64;
    /// Unit coordinate of the node carrying basis function (level, index).
    fn node(&self, level: u32, index: u32) -> f64;
    fn integral(&self, level: u32, index: u32) -> f64;
    ///
    /// Index of the single basis function on `level` whose support covers
    /// the unit coordinate `x`.
    ///
    fn active_index(&self, level: u32, x: f64) -> u32;
}
