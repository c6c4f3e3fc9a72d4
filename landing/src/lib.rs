/*!
Fuel-optimal powered-descent trajectories as second-order cone programs.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

A point-mass vehicle with position \\(P_t\\), velocity \\(V_t\\) and thrust \\(F_t\\)
is steered over \\(K\\) steps of length \\(h\\) from a given initial state to rest at a target,
minimizing \\(\gamma \sum_t \\| F_t \\|_2\\).
The program is built once by [`LandingProblem`] from [`PhysicalParameters`]
and solved with [`totsu_core`] for any number of [`BoundaryCondition`]s.

# Examples

```
use nalgebra::Vector3;
use landing::*;

let params = PhysicalParameters {
    h: 0.5,
    g: 9.81,
    m: 1.,
    f_max: 20.,
    p_target: Vector3::zeros(),
    alpha: 0.5,
    gamma: 1.,
    k: 10,
};

let mut problem = LandingProblem::new(params).unwrap()
    .with_config(SolveConfig::default().par(|p| {
        p.eps_acc = 1e-5;
        p.max_iter = Some(200_000);
    }));

let bc = BoundaryCondition::new(Vector3::new(10., 5., 30.), Vector3::new(0., 0., -5.));
let traj = problem.solve(&bc).unwrap();

assert!(traj.residuals(problem.params()).max() < 1e-2);

let cmd = ThrustCommand::from_thrust(&traj.first_thrust(), problem.params().f_max);
assert!(cmd.throttle <= 1.);
```
*/

mod error;
mod params;
mod config;

pub use error::*;
pub use params::*;
pub use config::*;

//

mod problem;
mod trajectory;

pub use problem::*;
pub use trajectory::*;

//

mod guidance;

pub use guidance::*;
