use std::fmt::Display;

use crate::storage::MultiIndex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SGError
{
    InvalidDimension,
    InvalidLevel,
    InvalidDomain,
    DimensionMismatch,
    OutOfDomain,
    PointsNotGenerated,
    NumberOfPointsAndValuesMismatch,
    InvalidIndex,
    /// A nodal value was never assigned to this point.
    UninitializedValue(MultiIndex),
    /// An index produced by the grid algorithms is missing from the grid.
    InternalInvariantViolation(MultiIndex),
    LZ4DecompressionFailed,
    ReadBufferFailed,
    WriteBufferFailed,
    SerializationFailed,
    DeserializationFailed,
    FileIOError,
}
impl std::error::Error for SGError {}

impl Display for SGError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self
        {
            SGError::UninitializedValue(index) => write!(f, "UninitializedValue at {}", index),
            SGError::InternalInvariantViolation(index) => write!(f, "InternalInvariantViolation: missing grid point {}", index),
            _ => write!(f, "{:?}", self),
        }
    }
}

#[test]
fn check_error_display()
{
    let index = MultiIndex::new(&[1, 2], &[1, 3]);
    assert_eq!(SGError::OutOfDomain.to_string(), "OutOfDomain");
    assert_eq!(SGError::InternalInvariantViolation(index).to_string(), "InternalInvariantViolation: missing grid point [1, 1, 2, 3]");
}
