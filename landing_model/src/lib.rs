/*!
Parameterized second-order cone programs that can be solved by [`totsu_core`].

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

# General usage

1. Declare unknowns with [`ConvexProgram::new_var`] and parameters with [`ConvexProgram::new_param`].
1. State constraints as [`AffExpr`]s: linear equalities, linear inequalities and second-order cones.
1. State the objective as a linear part plus a nonnegatively weighted sum of euclidean norms.
1. [`ConvexProgram::bind`] parameter values, then [`ConvexProgram::solve`] with a [`prelude::Solver`].
1. Rebind and solve again as many times as needed; the conic form is not rebuilt.

# Examples

Projection of a parameter point \\(\theta\\) onto the half-plane \\(x_0 \ge 1\\):
\\[
\begin{array}{ll}
{\rm minimize} & \\| x - \theta \\|_2 \\\\
{\rm subject \ to} & x_0 - 1 \ge 0
\end{array}
\\]

```
use float_eq::assert_float_eq;
use landing_model::prelude::*;
use landing_model::*;

type La = FloatGeneric<f64>;

let mut prog = ConvexProgram::<La>::new();
let x = prog.new_var(2);
let th = prog.new_param(2);

prog.add_nonneg(x.at(0) - AffExpr::constant(1.));
prog.add_norm_cost(1., vec![
    x.at(0) - th.at(0),
    x.at(1) - th.at(1),
]).unwrap();

prog.bind(th, &[-1., 2.]).unwrap();
let sol = prog.solve(Solver::new()).unwrap();

assert_float_eq!(sol.value(x), [1., 2.].as_ref(), abs_all <= 1e-3);
assert_float_eq!(sol.objective(), 2., abs <= 1e-3);
```
*/

mod expr;

pub use expr::*;

//

mod error;
mod solution;
mod program;

pub use error::*;
pub use solution::*;
pub use program::*;

//

mod csr;
mod cone;

pub use csr::*;
pub use cone::*;

//

/// Prelude
pub mod prelude
{
    pub use totsu_core::solver::{Solver, SolverError, SolverParam};
    pub use totsu_core::FloatGeneric;
}
