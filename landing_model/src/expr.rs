use std::ops::{Add, Sub, Mul, Neg};
use num_traits::Float;

//

/// Handle to a block of scalar unknowns of a [`crate::ConvexProgram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Var
{
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl Var
{
    /// Number of scalar unknowns in the block.
    pub fn len(&self) -> usize
    {
        self.len
    }

    pub fn is_empty(&self) -> bool
    {
        self.len == 0
    }

    /// Column of the `i`-th unknown in the whole program.
    pub fn index(&self, i: usize) -> usize
    {
        assert!(i < self.len);
        self.offset + i
    }

    /// The `i`-th unknown as an affine expression.
    pub fn at<F: Float>(&self, i: usize) -> AffExpr<F>
    {
        AffExpr::var(*self, i)
    }
}

//

/// Handle to a block of scalar parameters of a [`crate::ConvexProgram`].
///
/// Parameters are left unbound while the program is built
/// and receive values by [`crate::ConvexProgram::bind`] before each solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param
{
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl Param
{
    /// Number of scalar parameters in the block.
    pub fn len(&self) -> usize
    {
        self.len
    }

    pub fn is_empty(&self) -> bool
    {
        self.len == 0
    }

    /// Slot of the `i`-th parameter in the whole program.
    pub fn index(&self, i: usize) -> usize
    {
        assert!(i < self.len);
        self.offset + i
    }

    /// The `i`-th parameter as an affine expression.
    pub fn at<F: Float>(&self, i: usize) -> AffExpr<F>
    {
        AffExpr::param(*self, i)
    }
}

//

/// Affine expression
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \sum_j a_j x_j + \sum_k p_k \theta_k + c
/// \\]
/// where \\(x\\) are unknowns and \\(\theta\\) are parameters.
/// Parameters only ever appear in the constant part,
/// so binding new values never changes the coefficients of unknowns.
///
/// Terms referring to the same unknown may appear more than once; they are summed up.
#[derive(Debug, Clone, PartialEq)]
pub struct AffExpr<F>
{
    vars: Vec<(usize, F)>,
    params: Vec<(usize, F)>,
    constant: F,
}

impl<F: Float> AffExpr<F>
{
    pub fn zero() -> Self
    {
        AffExpr {
            vars: Vec::new(),
            params: Vec::new(),
            constant: F::zero(),
        }
    }

    pub fn constant(c: F) -> Self
    {
        AffExpr {
            constant: c,
            .. Self::zero()
        }
    }

    pub fn var(v: Var, i: usize) -> Self
    {
        AffExpr {
            vars: vec![(v.index(i), F::one())],
            .. Self::zero()
        }
    }

    pub fn param(p: Param, i: usize) -> Self
    {
        AffExpr {
            params: vec![(p.index(i), F::one())],
            .. Self::zero()
        }
    }

    /// Multiplies every term and the constant by `k`.
    pub fn scale(mut self, k: F) -> Self
    {
        for (_, a) in self.vars.iter_mut() {
            *a = *a * k;
        }
        for (_, p) in self.params.iter_mut() {
            *p = *p * k;
        }
        self.constant = self.constant * k;
        self
    }

    /// Terms of unknowns as pairs of a column and a coefficient.
    pub fn var_terms(&self) -> &[(usize, F)]
    {
        &self.vars
    }

    /// Terms of parameters as pairs of a slot and a coefficient.
    pub fn param_terms(&self) -> &[(usize, F)]
    {
        &self.params
    }

    pub fn constant_term(&self) -> F
    {
        self.constant
    }

    /// Constant part with parameter values `theta` substituted.
    pub fn offset(&self, theta: &[F]) -> F
    {
        self.params.iter().fold(self.constant, |acc, &(k, p)| acc + p * theta[k])
    }

    /// Value of the expression at unknowns `x` and parameters `theta`.
    pub fn eval(&self, x: &[F], theta: &[F]) -> F
    {
        self.vars.iter().fold(self.offset(theta), |acc, &(j, a)| acc + a * x[j])
    }
}

impl<F: Float> Add for AffExpr<F>
{
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self
    {
        self.vars.extend(rhs.vars);
        self.params.extend(rhs.params);
        self.constant = self.constant + rhs.constant;
        self
    }
}

impl<F: Float> Sub for AffExpr<F>
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self
    {
        self + (-rhs)
    }
}

impl<F: Float> Neg for AffExpr<F>
{
    type Output = Self;

    fn neg(self) -> Self
    {
        self.scale(-F::one())
    }
}

impl<F: Float> Mul<F> for AffExpr<F>
{
    type Output = Self;

    fn mul(self, k: F) -> Self
    {
        self.scale(k)
    }
}

//

#[test]
fn test_affexpr1()
{
    use float_eq::assert_float_eq;

    let x = Var {offset: 0, len: 3};
    let th = Param {offset: 0, len: 2};

    // 2*x1 - (x1 - 3*th0) * 0.5 + 4 + x2
    let e = x.at(1) * 2. - (x.at(1) - th.at(0) * 3.) * 0.5 + AffExpr::constant(4.) + x.at(2);

    let xv = [10., 1., -2.];
    let thv = [2., 7.];

    assert_float_eq!(e.offset(&thv), 4. + 1.5 * 2., abs <= 1e-12);
    assert_float_eq!(e.eval(&xv, &thv), 2. - 0.5 + 3. + 4. - 2., abs <= 1e-12);
    assert_eq!(e.var_terms().len(), 3);
    assert_eq!(e.param_terms(), &[(0, 1.5)]);
}
