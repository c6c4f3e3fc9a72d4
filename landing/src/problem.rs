use std::time::Instant;
use nalgebra::Vector3;
use totsu_core::FloatGeneric;
use totsu_core::solver::{Solver, SolverError};
use landing_model::{ConvexProgram, AffExpr, Var, Param, Solution};
use crate::{PhysicalParameters, LandingOptions, BoundaryCondition, SolveConfig, Trajectory, LandingError};

type La = FloatGeneric<f64>;

/// Relative tolerance of the checks on values fixed by the boundary condition.
const FIXED_TOL: f64 = 1e-9;

// lhs <= rhs up to FIXED_TOL
fn within(lhs: f64, rhs: f64) -> bool
{
    lhs <= rhs + FIXED_TOL * (1. + lhs.abs().max(rhs.abs()))
}

//

/// Fuel-optimal landing problem
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// The problem is
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & \gamma \sum_{t=0}^{K-1} \\| F_t \\|_2 \\\\
/// {\rm subject \ to} & V_0 = v_0,\ P_0 = p_0,\ V_K = 0,\ P_K = p_{\rm target} \\\\
/// & V_{t+1} = V_t + h \left( F_t / m - g e_z \right) \\\\
/// & P_{t+1} = P_t + {h \over 2} \left( V_t + V_{t+1} \right) \\\\
/// & (P_t)_z \ge (p_{\rm target})_z \\\\
/// & \tan\alpha \\, \\| (P_t)_{xy} \\|_2 \le (P_t)_z \\\\
/// & \\| F_t \\|_2 \le F_{\max},
/// \end{array}
/// \\]
/// where \\(p_0, v_0\\) are parameters rebound on every [`LandingProblem::solve`].
///
/// The program is stated in units of one step:
/// \\(u_t = F_t / F_{\max}\\), \\(\hat V_t = V_t / \bar v\\) and \\(\hat P_t = P_t / \bar p\\)
/// with \\(\bar v = h F_{\max} / m\\) and \\(\bar p = h \bar v\\),
/// so that every recurrence has unit coefficients
/// \\[
/// \hat V_{t+1} = \hat V_t + u_t - {g m \over F_{\max}} e_z, \quad
/// \hat P_{t+1} = \hat P_t + {1 \over 2} \left( \hat V_t + \hat V_{t+1} \right).
/// \\]
pub struct LandingProblem
{
    params: PhysicalParameters,
    options: LandingOptions,
    config: SolveConfig,

    vel_unit: f64,
    len_unit: f64,

    prog: ConvexProgram<La>,
    p0: Param,
    v0: Param,
    vel: Var,
    pos: Var,
    thr: Var,
}

// i-th component of the 3-vector at step t
fn el(v: Var, t: usize, i: usize) -> AffExpr<f64>
{
    v.at(3 * t + i)
}

impl LandingProblem
{
    /// Builds the problem without optional path constraints.
    ///
    /// Returns `Err` with [`LandingError::InvalidParameter`] if `params` violates a precondition.
    pub fn new(params: PhysicalParameters) -> Result<Self, LandingError>
    {
        Self::with_options(params, LandingOptions::default())
    }

    /// Builds the problem.
    ///
    /// Returns `Err` with [`LandingError::InvalidParameter`] if `params` violates a precondition.
    /// * `params` are fixed for the lifetime of the problem.
    /// * `options` selects optional path constraints.
    pub fn with_options(params: PhysicalParameters, options: LandingOptions) -> Result<Self, LandingError>
    {
        params.validate()?;

        let k = params.k;
        let vel_unit = params.h * params.f_max / params.m;
        let len_unit = params.h * vel_unit;
        let dv_gravity = params.h * params.g / vel_unit;
        let target = params.p_target / len_unit;
        let tan_alpha = params.alpha.tan();

        let mut prog = ConvexProgram::new();

        let p0 = prog.new_param(3);
        let v0 = prog.new_param(3);

        let vel = prog.new_var(3 * (k + 1));
        let pos = prog.new_var(3 * (k + 1));
        let thr = prog.new_var(3 * k);

        // boundary
        for i in 0.. 3 {
            prog.add_eq(el(vel, 0, i) - v0.at(i));
            prog.add_eq(el(pos, 0, i) - p0.at(i));
            prog.add_eq(el(vel, k, i));
            prog.add_eq(el(pos, k, i) - AffExpr::constant(target[i]));
        }

        // dynamics
        for t in 0.. k {
            for i in 0.. 3 {
                let mut v_next = el(vel, t, i) + el(thr, t, i);
                if i == 2 {
                    v_next = v_next - AffExpr::constant(dv_gravity);
                }
                prog.add_eq(el(vel, t + 1, i) - v_next);

                let p_next = el(pos, t, i) + (el(vel, t, i) + el(vel, t + 1, i)) * 0.5;
                prog.add_eq(el(pos, t + 1, i) - p_next);
            }
        }

        // altitude floor and glide cone
        for t in 0..= k {
            prog.add_nonneg(el(pos, t, 2) - AffExpr::constant(target.z));
            prog.add_soc(
                vec![el(pos, t, 0) * tan_alpha, el(pos, t, 1) * tan_alpha],
                el(pos, t, 2)
            );
        }

        // thrust limit, |u| <= 1
        for t in 0.. k {
            prog.add_soc(
                (0.. 3).map(|i| el(thr, t, i)).collect(),
                AffExpr::constant(1.)
            );
        }

        if options.upward_thrust {
            for t in 0.. k {
                prog.add_nonneg(el(thr, t, 2));
            }
        }
        if options.descent_only {
            for t in 0..= k {
                prog.add_nonneg(-el(vel, t, 2));
            }
        }

        // fuel, in units of gamma * F_max
        for t in 0.. k {
            prog.add_norm_cost(1., (0.. 3).map(|i| el(thr, t, i)).collect())?;
        }

        log::debug!("landing problem: k {}, {} unknowns, {} rows, {} nonzeros, units {:.3e} m/s {:.3e} m",
            k, prog.num_vars(), prog.num_rows(), prog.num_nonzeros(), vel_unit, len_unit
        );

        Ok(LandingProblem {
            params,
            options,
            config: SolveConfig::default(),
            vel_unit,
            len_unit,
            prog,
            p0,
            v0,
            vel,
            pos,
            thr,
        })
    }

    /// Replaces the solver configuration.
    pub fn with_config(mut self, config: SolveConfig) -> Self
    {
        self.config = config;
        self
    }

    pub fn params(&self) -> &PhysicalParameters
    {
        &self.params
    }

    pub fn options(&self) -> &LandingOptions
    {
        &self.options
    }

    pub fn config(&self) -> &SolveConfig
    {
        &self.config
    }

    /// Solves for one boundary condition.
    ///
    /// Returns `Ok` with the optimal [`Trajectory`],
    /// or `Err` with [`LandingError::Infeasible`], [`LandingError::Unbounded`] or [`LandingError::NumericalError`].
    /// Attempts of the [`SolveConfig`] are tried in order while the result is a numerical error.
    ///
    /// Constraints on values that `bc` alone fixes are checked before the solver runs,
    /// and violating them is [`LandingError::Infeasible`].
    /// With a single step the equalities leave no freedom at all,
    /// so that trajectory is computed directly.
    /// * `bc` is the initial position and velocity, rebound into the program without rebuilding it.
    pub fn solve(&mut self, bc: &BoundaryCondition) -> Result<Trajectory, LandingError>
    {
        bc.validate()?;
        self.check_fixed(bc)?;

        if self.params.k == 1 {
            return self.solve_one_step(bc);
        }

        let p0 = bc.p0 / self.len_unit;
        let v0 = bc.v0 / self.vel_unit;
        self.prog.bind(self.p0, p0.as_slice())?;
        self.prog.bind(self.v0, v0.as_slice())?;

        let mut rslt = Err(LandingError::NumericalError(SolverError::ExcessIter));

        for (i, par) in self.config.attempts().iter().enumerate() {
            let s = Solver::new().par(|p| {
                *p = par.clone();
            });

            let start = Instant::now();
            rslt = self.prog.solve(s).map_err(LandingError::from);
            log::debug!("attempt {}: {:?} in {:.3?}", i, rslt.as_ref().map(|sol| sol.objective()), start.elapsed());

            match &rslt {
                Err(e) if e.is_retryable() => {
                    log::warn!("attempt {} failed: {}", i, e);
                },
                _ => break,
            }
        }

        rslt.map(|sol| self.trajectory(&sol, bc))
    }

    // Initial state against the path constraints, and the target against the glide cone.
    fn check_fixed(&self, bc: &BoundaryCondition) -> Result<(), LandingError>
    {
        let tan_alpha = self.params.alpha.tan();
        let target = &self.params.p_target;

        let fixed_ok = within(self.params.p_min(), bc.p0.z)
            && within(tan_alpha * bc.p0.xy().norm(), bc.p0.z)
            && within(tan_alpha * target.xy().norm(), target.z)
            && (!self.options.descent_only || within(bc.v0.z, 0.));

        if fixed_ok {
            Ok(())
        }
        else {
            log::debug!("boundary condition violates a path constraint: {:?}", bc);
            Err(LandingError::Infeasible)
        }
    }

    fn solve_one_step(&self, bc: &BoundaryCondition) -> Result<Trajectory, LandingError>
    {
        let par = &self.params;

        // V[1] = 0 and P[1] = target
        let p1 = bc.p0 + bc.v0 * (par.h / 2.);
        let f0 = (Vector3::new(0., 0., par.g) - bc.v0 / par.h) * par.m;

        let scale = 1. + bc.p0.amax().max(par.p_target.amax());
        let ok = (p1 - par.p_target).amax() <= FIXED_TOL * scale
            && within(f0.norm(), par.f_max)
            && (!self.options.upward_thrust || within(0., f0.z));

        if !ok {
            log::debug!("one-step trajectory violates a constraint: p1 {:?}, f0 {:?}", p1.as_slice(), f0.as_slice());
            return Err(LandingError::Infeasible);
        }

        Ok(Trajectory {
            velocity: vec![bc.v0, Vector3::zeros()],
            position: vec![bc.p0, par.p_target],
            thrust: vec![f0],
            fuel: par.gamma * f0.norm(),
            boundary: *bc,
        })
    }

    fn trajectory(&self, sol: &Solution<f64>, bc: &BoundaryCondition) -> Trajectory
    {
        let vecs = |v: Var, unit: f64| -> Vec<Vector3<f64>> {
            sol.value(v).chunks(3)
                .map(|c| Vector3::new(c[0], c[1], c[2]) * unit)
                .collect()
        };

        Trajectory {
            velocity: vecs(self.vel, self.vel_unit),
            position: vecs(self.pos, self.len_unit),
            thrust: vecs(self.thr, self.params.f_max),
            fuel: self.params.gamma * self.params.f_max * sol.objective(),
            boundary: *bc,
        }
    }
}
