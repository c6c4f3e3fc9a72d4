use core::fmt::{Debug, LowerExp};
use num_traits::{Float, Zero, One};
use totsu_core::solver::{Solver, SolverError, Operator};
use totsu_core::{LinAlgEx, MatOp, MatType};
use crate::{AffExpr, Var, Param, ModelError, Solution};
use crate::csr::{CsrMat, CsrOp};
use crate::cone::{ConeLayout, ProgCone};

//

struct Soc<F>
{
    bound: AffExpr<F>,
    args: Vec<AffExpr<F>>,
}

struct NormCost<F>
{
    weight: F,
    args: Vec<AffExpr<F>>,
}

// Program as the caller states it, before canonicalization.
struct Model<F>
{
    n_vars: usize,
    theta: Vec<F>,
    eqs: Vec<AffExpr<F>>,
    nonnegs: Vec<AffExpr<F>>,
    socs: Vec<Soc<F>>,
    cost: AffExpr<F>,
    norm_costs: Vec<NormCost<F>>,
}

impl<F: Float> Model<F>
{
    fn objective_at(&self, x: &[F]) -> F
    {
        let norms = self.norm_costs.iter().fold(F::zero(), |acc, nc| {
            let sq = nc.args.iter().fold(F::zero(), |acc, e| {
                let v = e.eval(x, &self.theta);
                acc + v * v
            });
            acc + nc.weight * sq.sqrt()
        });

        self.cost.eval(x, &self.theta) + norms
    }
}

//

// Canonical form: minimize c^T x, subject to A x + s = b0 + M theta, s in the layout cone.
struct Canon<L: LinAlgEx>
{
    vec_c: Vec<L::F>,
    mat_a: CsrMat<L>,
    vec_b0: Vec<L::F>,
    b_param: Vec<(usize, usize, L::F)>,
    vec_b: Vec<L::F>,
    layout: ConeLayout,
}

impl<L: LinAlgEx> Canon<L>
{
    fn compile(model: &Model<L::F>) -> Self
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();

        let n = model.n_vars + model.norm_costs.len();

        let mut canon = Canon {
            vec_c: vec![f0; n],
            mat_a: CsrMat::new(n),
            vec_b0: Vec::new(),
            b_param: Vec::new(),
            vec_b: Vec::new(),
            layout: ConeLayout::default(),
        };

        // e == 0  ->  e_x^T x + s = -e_0,  s = 0
        for e in &model.eqs {
            canon.push_row(e, f1, model.n_vars);
        }
        canon.layout.n_zero = model.eqs.len();

        // e >= 0  ->  -e_x^T x + s = e_0,  s >= 0
        for e in &model.nonnegs {
            canon.push_row(e, -f1, model.n_vars);
        }
        canon.layout.n_rpos = model.nonnegs.len();

        // |args| <= bound  ->  -[bound_x; args_x] x + s = [bound_0; args_0],  s in Q
        for soc in &model.socs {
            canon.push_row(&soc.bound, -f1, model.n_vars);
            for e in &soc.args {
                canon.push_row(e, -f1, model.n_vars);
            }
            canon.layout.soc_dims.push(1 + soc.args.len());
        }

        // epigraph t_i of each weighted norm: |args| <= t_i, minimize w_i t_i
        for (i, nc) in model.norm_costs.iter().enumerate() {
            let t = model.n_vars + i;

            canon.vec_c[t] = nc.weight;
            canon.mat_a.push_row([(t, -f1)]);
            canon.vec_b0.push(f0);
            for e in &nc.args {
                canon.push_row(e, -f1, model.n_vars);
            }
            canon.layout.soc_dims.push(1 + nc.args.len());
        }

        for &(j, a) in model.cost.var_terms() {
            canon.vec_c[j] = canon.vec_c[j] + a;
        }

        canon.vec_b = canon.vec_b0.clone();

        assert_eq!(canon.mat_a.size().0, canon.layout.len());
        assert_eq!(canon.vec_b0.len(), canon.layout.len());

        log::debug!("canonicalized: {} unknowns ({} epigraph), {} rows (zero {}, rpos {}, soc {} cones), {} nonzeros",
            n, model.norm_costs.len(), canon.layout.len(),
            canon.layout.n_zero, canon.layout.n_rpos, canon.layout.soc_dims.len(),
            canon.mat_a.nnz()
        );

        canon
    }

    // Appends sign * e as a row of A; the constant part goes to b with the opposite sign.
    fn push_row(&mut self, e: &AffExpr<L::F>, sign: L::F, n_vars: usize)
    {
        let row = self.vec_b0.len();

        for &(j, _) in e.var_terms() {
            assert!(j < n_vars);
        }

        self.mat_a.push_row(e.var_terms().iter().map(|&(j, a)| (j, sign * a)));
        self.vec_b0.push(-sign * e.constant_term());
        for &(k, p) in e.param_terms() {
            self.b_param.push((row, k, -sign * p));
        }
    }

    fn refresh_b(&mut self, theta: &[L::F])
    {
        self.vec_b.copy_from_slice(&self.vec_b0);
        for &(row, k, p) in &self.b_param {
            self.vec_b[row] = self.vec_b[row] + p * theta[k];
        }
    }
}

//

/// Parameterized second-order cone program
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// The problem is
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & a^T x + \sum_i w_i \\| E_i x + e_i(\theta) \\|_2 \\\\
/// {\rm subject \ to} & G x + g(\theta) = 0 \\\\
/// & H x + h(\theta) \ge 0 \\\\
/// & \\| C_j x + c_j(\theta) \\|_2 \le d_j^T x + f_j(\theta) \quad (j = 0, \ldots, r - 1),
/// \end{array}
/// \\]
/// where every constant part is affine in parameters \\(\theta\\) and \\(w_i \ge 0\\).
///
/// The representation as a conic linear program is as follows:
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & a^T x + w^T t \\\\
/// {\rm subject \ to} &
///   \left[ \begin{array}{c}
///   G \\\\ -H \\\\
///   -d_j^T \\\\ -C_j \\\\
///   \vdots \\\\
///   -1 \\\\ -E_i \\\\
///   \vdots
///   \end{array} \right]
///   \left[ \begin{array}{c} x \\\\ t \end{array} \right] + s =
///   \left[ \begin{array}{c}
///   -g(\theta) \\\\ h(\theta) \\\\
///   f_j(\theta) \\\\ c_j(\theta) \\\\
///   \vdots \\\\
///   0 \\\\ e_i(\theta) \\\\
///   \vdots
///   \end{array} \right] \\\\
/// & s \in \lbrace 0 \rbrace^p \times \mathbb{R}_+^q \times \mathcal{Q}^{\cdots} \times \cdots.
/// \end{array}
/// \\]
///
/// The conic form is compiled once, on the first solve after the last added constraint or cost.
/// Only its right-hand side is recomputed when parameters are rebound,
/// so a program built once can be solved repeatedly for different parameter values.
pub struct ConvexProgram<L: LinAlgEx>
{
    model: Model<L::F>,
    canon: Option<Canon<L>>,
    w_solver: Vec<L::F>,
}

impl<L: LinAlgEx> ConvexProgram<L>
{
    /// Creates an empty program.
    pub fn new() -> Self
    {
        ConvexProgram {
            model: Model {
                n_vars: 0,
                theta: Vec::new(),
                eqs: Vec::new(),
                nonnegs: Vec::new(),
                socs: Vec::new(),
                cost: AffExpr::zero(),
                norm_costs: Vec::new(),
            },
            canon: None,
            w_solver: Vec::new(),
        }
    }

    /// Adds a block of `len` unknowns.
    pub fn new_var(&mut self, len: usize) -> Var
    {
        let v = Var {
            offset: self.model.n_vars,
            len,
        };
        self.model.n_vars += len;
        self.canon = None;
        v
    }

    /// Adds a block of `len` parameters, initially bound to zero.
    pub fn new_param(&mut self, len: usize) -> Param
    {
        let p = Param {
            offset: self.model.theta.len(),
            len,
        };
        self.model.theta.resize(p.offset + len, L::F::zero());
        p
    }

    /// Linear equality `e == 0`.
    pub fn add_eq(&mut self, e: AffExpr<L::F>)
    {
        self.model.eqs.push(e);
        self.canon = None;
    }

    /// Linear inequality `e >= 0`.
    pub fn add_nonneg(&mut self, e: AffExpr<L::F>)
    {
        self.model.nonnegs.push(e);
        self.canon = None;
    }

    /// Second-order cone constraint `|args|_2 <= bound`.
    pub fn add_soc(&mut self, args: Vec<AffExpr<L::F>>, bound: AffExpr<L::F>)
    {
        self.model.socs.push(Soc {bound, args});
        self.canon = None;
    }

    /// Adds `e` to the objective.
    pub fn add_linear_cost(&mut self, e: AffExpr<L::F>)
    {
        let cost = core::mem::replace(&mut self.model.cost, AffExpr::zero());
        self.model.cost = cost + e;
        self.canon = None;
    }

    /// Adds `weight * |args|_2` to the objective.
    ///
    /// Returns `Err` with [`ModelError::NegativeWeight`] if `weight` is negative,
    /// or [`ModelError::NonFinite`] if it is not finite.
    pub fn add_norm_cost(&mut self, weight: L::F, args: Vec<AffExpr<L::F>>) -> Result<(), ModelError>
    {
        if !weight.is_finite() {
            return Err(ModelError::NonFinite);
        }
        if weight < L::F::zero() {
            return Err(ModelError::NegativeWeight);
        }

        self.model.norm_costs.push(NormCost {weight, args});
        self.canon = None;
        Ok(())
    }

    /// Binds values to a parameter block.
    ///
    /// Does not invalidate the compiled conic form.
    pub fn bind(&mut self, param: Param, values: &[L::F]) -> Result<(), ModelError>
    {
        if values.len() != param.len {
            return Err(ModelError::ParamLength {
                expected: param.len,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        self.model.theta[param.offset..param.offset + param.len].copy_from_slice(values);
        Ok(())
    }

    /// Values currently bound to a parameter block.
    pub fn param_value(&self, param: Param) -> &[L::F]
    {
        &self.model.theta[param.offset..param.offset + param.len]
    }

    /// Number of unknowns declared by [`ConvexProgram::new_var`].
    pub fn num_vars(&self) -> usize
    {
        self.model.n_vars
    }

    /// Number of constraint rows of the conic form.
    pub fn num_rows(&mut self) -> usize
    {
        self.compiled().layout.len()
    }

    /// Number of stored nonzeros of the conic form.
    pub fn num_nonzeros(&mut self) -> usize
    {
        self.compiled().mat_a.nnz()
    }

    fn compiled(&mut self) -> &mut Canon<L>
    {
        let model = &self.model;
        self.canon.get_or_insert_with(|| Canon::compile(model))
    }

    /// Generates the problem data structures to be fed to [`Solver::solve`].
    ///
    /// Returns a tuple of operators, a cone and a work slice.
    pub fn problem(&mut self) -> (MatOp<'_, L>, CsrOp<'_, L>, MatOp<'_, L>, ProgCone<'_, L>, &mut[L::F])
    {
        let canon = {
            let model = &self.model;
            let canon = self.canon.get_or_insert_with(|| Canon::compile(model));
            canon.refresh_b(&model.theta);
            &*canon
        };

        let (m, n) = canon.mat_a.size();

        let op_c = MatOp::new(MatType::General(n, 1), &canon.vec_c);
        let op_a = canon.mat_a.as_op();
        let op_b = MatOp::new(MatType::General(m, 1), &canon.vec_b);
        let cone = ProgCone::new(&canon.layout);

        self.w_solver.resize(Solver::<L>::query_worklen(op_a.size()), L::F::zero());

        (op_c, op_a, op_b, cone, self.w_solver.as_mut())
    }
}

impl<L: LinAlgEx> ConvexProgram<L>
where L::F: Debug + LowerExp
{
    /// Solves the program with the currently bound parameter values.
    ///
    /// Returns `Ok` with the [`Solution`], or `Err` with [`SolverError`] as reported by the solver.
    /// * `solver` is a [`Solver`] instance with its parameters set.
    pub fn solve(&mut self, solver: Solver<L>) -> Result<Solution<L::F>, SolverError>
    {
        let n_vars = self.model.n_vars;

        let x = {
            let (x, _) = solver.solve(self.problem())?;
            x[..n_vars].to_vec()
        };
        let objective = self.model.objective_at(&x);

        Ok(Solution::new(x, objective))
    }
}

impl<L: LinAlgEx> Default for ConvexProgram<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}
