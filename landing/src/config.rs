use totsu_core::solver::SolverParam;

/// Default iteration cap of every attempt, so that a solve always terminates.
pub const DEFAULT_MAX_ITER: usize = 100_000;

/// Solver configuration of a [`crate::LandingProblem`].
///
/// Holds solver parameters tried in order.
/// A later attempt runs only when the previous one ended in
/// [`crate::LandingError::NumericalError`]; infeasibility and unboundedness are returned at once.
#[derive(Debug, Clone)]
pub struct SolveConfig
{
    attempts: Vec<SolverParam<f64>>,
}

impl Default for SolveConfig
{
    fn default() -> Self
    {
        let mut par = SolverParam::default();
        par.max_iter = Some(DEFAULT_MAX_ITER);

        SolveConfig {
            attempts: vec![par],
        }
    }
}

impl SolveConfig
{
    /// Changes the parameters of the first attempt.
    ///
    /// Returns [`SolveConfig`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<f64>)
    {
        f(&mut self.attempts[0]);
        self
    }

    /// Appends a fallback attempt, starting from a copy of the last attempt's parameters.
    ///
    /// Returns [`SolveConfig`] with the attempt appended.
    /// * `f` is a function to change parameters given by its argument.
    pub fn fallback<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<f64>)
    {
        let mut par = self.last().clone();
        f(&mut par);
        self.attempts.push(par);
        self
    }

    /// Solver parameters of every attempt, in order.
    pub fn attempts(&self) -> &[SolverParam<f64>]
    {
        &self.attempts
    }

    fn last(&self) -> &SolverParam<f64>
    {
        &self.attempts[self.attempts.len() - 1]
    }
}

//

#[test]
fn test_config1()
{
    let cfg = SolveConfig::default()
        .par(|p| {
            p.eps_acc = 1e-5;
        })
        .fallback(|p| {
            p.max_iter = Some(400_000);
        })
        .fallback(|p| {
            p.eps_acc = 1e-3;
        });

    let a = cfg.attempts();
    assert_eq!(a.len(), 3);
    assert_eq!(a[0].max_iter, Some(DEFAULT_MAX_ITER));
    assert_eq!(a[0].eps_acc, 1e-5);
    assert_eq!(a[1].max_iter, Some(400_000));
    assert_eq!(a[1].eps_acc, 1e-5);
    assert_eq!(a[2].max_iter, Some(400_000));
    assert_eq!(a[2].eps_acc, 1e-3);
}
