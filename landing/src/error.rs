use totsu_core::solver::SolverError;
use landing_model::ModelError;

/// Landing problem errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LandingError
{
    /// Precondition on a physical parameter or boundary value violated.
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    /// Rejected by the modeling layer.
    Model(ModelError),

    /// No trajectory satisfies the constraints for the boundary condition.
    Infeasible,
    /// Found an unbounded certificate.
    Unbounded,
    /// The solver could not certify a result.
    NumericalError(SolverError),
}

impl LandingError
{
    /// `true` if solving again with other solver parameters may succeed.
    pub fn is_retryable(&self) -> bool
    {
        matches!(self, LandingError::NumericalError(_))
    }
}

impl core::fmt::Display for LandingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self {
            LandingError::InvalidParameter {name, reason} => write!(f, "InvalidParameter: {} {}", name, reason),
            LandingError::Model(e)          => write!(f, "Model: {}", e),
            LandingError::Infeasible        => write!(f, "Infeasible: no trajectory satisfies the constraints"),
            LandingError::Unbounded         => write!(f, "Unbounded: found an unbounded certificate"),
            LandingError::NumericalError(e) => write!(f, "NumericalError: {}", e),
        }
    }
}

impl std::error::Error for LandingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            LandingError::Model(e) => Some(e),
            LandingError::NumericalError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SolverError> for LandingError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Infeasible => LandingError::Infeasible,
            SolverError::Unbounded  => LandingError::Unbounded,
            _ => LandingError::NumericalError(e),
        }
    }
}

impl From<ModelError> for LandingError {
    fn from(e: ModelError) -> Self {
        LandingError::Model(e)
    }
}

//

#[test]
fn test_landing_error_from1()
{
    assert_eq!(LandingError::from(SolverError::Infeasible), LandingError::Infeasible);
    assert_eq!(LandingError::from(SolverError::Unbounded), LandingError::Unbounded);

    for e in [SolverError::ExcessIter, SolverError::InvalidOp, SolverError::WorkShortage, SolverError::ConeFailure] {
        let le = LandingError::from(e);
        assert_eq!(le, LandingError::NumericalError(e));
        assert!(le.is_retryable());
        assert!(std::error::Error::source(&le).is_some());
    }

    assert!(!LandingError::Infeasible.is_retryable());
    assert!(!LandingError::Unbounded.is_retryable());

    let le = LandingError::from(ModelError::NonFinite);
    assert_eq!(le, LandingError::Model(ModelError::NonFinite));
    assert!(!le.is_retryable());
    assert_eq!(le.to_string(), "Model: NonFinite: value must be finite");
}
