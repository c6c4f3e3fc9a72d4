/// Modeling errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelError
{
    /// Number of values does not match the parameter block.
    ParamLength {
        expected: usize,
        actual: usize,
    },
    /// Norm cost with a negative weight, which is not convex.
    NegativeWeight,
    /// NaN or infinite value.
    NonFinite,
}

impl core::fmt::Display for ModelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self {
            ModelError::ParamLength {expected, actual} => write!(f, "ParamLength: expected {} values, got {}", expected, actual),
            ModelError::NegativeWeight => write!(f, "NegativeWeight: norm cost weight must be nonnegative"),
            ModelError::NonFinite      => write!(f, "NonFinite: value must be finite"),
        }
    }
}

impl std::error::Error for ModelError {}
