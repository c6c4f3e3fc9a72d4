use crate::Var;

/// Optimal point of a [`crate::ConvexProgram`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<F>
{
    x: Vec<F>,
    objective: F,
}

impl<F: Copy> Solution<F>
{
    pub(crate) fn new(x: Vec<F>, objective: F) -> Self
    {
        Solution {
            x,
            objective,
        }
    }

    /// Values of a block of unknowns.
    pub fn value(&self, v: Var) -> &[F]
    {
        &self.x[v.offset..v.offset + v.len]
    }

    /// Values of all unknowns, epigraph variables of norm costs excluded.
    pub fn x(&self) -> &[F]
    {
        &self.x
    }

    /// Objective evaluated at the optimal point, norm costs taken as the norms themselves.
    pub fn objective(&self) -> F
    {
        self.objective
    }
}
