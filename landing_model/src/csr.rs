use num_traits::{Float, Zero};
use totsu_core::solver::{LinAlg, SliceLike, Operator};

//

/// Sparse matrix builder
///
/// Matrix struct which owns its nonzero entries in compressed sparse row form
/// and is able to be converted as [`CsrOp`].
/// Rows are appended one by one, which is how constraints are canonicalized.
#[derive(Debug, Clone)]
pub struct CsrMat<L: LinAlg>
{
    n_col: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    vals: Vec<L::F>,
}

impl<L: LinAlg> CsrMat<L>
{
    /// Creates an instance.
    ///
    /// Returns the [`CsrMat`] instance with no rows.
    /// * `n_col` is a number of columns.
    pub fn new(n_col: usize) -> Self
    {
        CsrMat {
            n_col,
            row_ptr: vec![0],
            col_idx: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Size of the matrix.
    ///
    /// Returns a tuple of a number of rows and columns.
    pub fn size(&self) -> (usize, usize)
    {
        (self.row_ptr.len() - 1, self.n_col)
    }

    /// Number of stored nonzero entries.
    pub fn nnz(&self) -> usize
    {
        self.vals.len()
    }

    /// Appends a row.
    ///
    /// * `entries` are pairs of a column and a value.
    ///   Entries of the same column are summed up and zeros are not stored.
    pub fn push_row<I>(&mut self, entries: I)
    where I: IntoIterator<Item=(usize, L::F)>
    {
        let mut row: Vec<(usize, L::F)> = entries.into_iter().collect();
        row.sort_by_key(|&(c, _)| c);

        let mut iter = row.into_iter().peekable();
        while let Some((c, mut v)) = iter.next() {
            assert!(c < self.n_col);

            while let Some(&(c_next, v_next)) = iter.peek() {
                if c_next != c {
                    break;
                }
                v = v + v_next;
                iter.next();
            }

            if !v.is_zero() {
                self.col_idx.push(c);
                self.vals.push(v);
            }
        }

        self.row_ptr.push(self.vals.len());
    }

    /// Element at a row and a column, zero if not stored.
    pub fn get(&self, r: usize, c: usize) -> L::F
    {
        let (nr, nc) = self.size();
        assert!(r < nr);
        assert!(c < nc);

        let range = self.row_ptr[r]..self.row_ptr[r + 1];
        self.col_idx[range.clone()].iter().zip(&self.vals[range])
            .find(|(&col, _)| col == c)
            .map_or(L::F::zero(), |(_, &v)| v)
    }

    /// Converted as [`CsrOp`].
    ///
    /// Returns the [`CsrOp`] borrowing the internal data arrays.
    pub fn as_op(&self) -> CsrOp<'_, L>
    {
        CsrOp {
            mat: self,
        }
    }

    fn row(&self, r: usize) -> impl Iterator<Item=(usize, L::F)> + '_
    {
        let range = self.row_ptr[r]..self.row_ptr[r + 1];
        self.col_idx[range.clone()].iter().copied().zip(self.vals[range].iter().copied())
    }
}

//

/// Sparse matrix operator
///
/// Borrows a [`CsrMat`] and implements [`Operator`].
pub struct CsrOp<'a, L: LinAlg>
{
    mat: &'a CsrMat<L>,
}

impl<'a, L: LinAlg> core::fmt::Debug for CsrOp<'a, L>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        f.debug_struct("CsrOp")
         .field("size", &self.mat.size())
         .field("nnz", &self.mat.nnz())
         .finish()
    }
}

impl<'a, L: LinAlg> Operator<L> for CsrOp<'a, L>
{
    fn size(&self) -> (usize, usize)
    {
        self.mat.size()
    }

    fn op(&self, alpha: L::F, x: &L::Sl, beta: L::F, y: &mut L::Sl)
    {
        let (nr, nc) = self.size();
        assert_eq!(x.len(), nc);
        assert_eq!(y.len(), nr);

        let x = x.get_ref();
        let y = y.get_mut();

        for (r, e) in y.iter_mut().enumerate() {
            let sum = self.mat.row(r).fold(L::F::zero(), |acc, (c, v)| acc + v * x[c]);

            // beta = 0 overwrites y as BLAS does
            *e = if beta.is_zero() {
                alpha * sum
            }
            else {
                alpha * sum + beta * *e
            };
        }
    }

    fn trans_op(&self, alpha: L::F, x: &L::Sl, beta: L::F, y: &mut L::Sl)
    {
        let (nr, nc) = self.size();
        assert_eq!(x.len(), nr);
        assert_eq!(y.len(), nc);

        if beta.is_zero() {
            for e in y.get_mut() {
                *e = L::F::zero();
            }
        }
        else {
            L::scale(beta, y);
        }

        let x = x.get_ref();
        let y = y.get_mut();

        for (r, &xr) in x.iter().enumerate() {
            for (c, v) in self.mat.row(r) {
                y[c] = y[c] + alpha * v * xr;
            }
        }
    }

    fn absadd_cols(&self, tau: &mut L::Sl)
    {
        assert_eq!(tau.len(), self.mat.n_col);

        let tau = tau.get_mut();

        for (&c, &v) in self.mat.col_idx.iter().zip(&self.mat.vals) {
            tau[c] = tau[c] + v.abs();
        }
    }

    fn absadd_rows(&self, sigma: &mut L::Sl)
    {
        let (nr, _) = self.size();
        assert_eq!(sigma.len(), nr);

        let sigma = sigma.get_mut();

        for (r, e) in sigma.iter_mut().enumerate() {
            *e = self.mat.row(r).fold(*e, |acc, (_, v)| acc + v.abs());
        }
    }
}

//

#[test]
fn test_csrmat1()
{
    use float_eq::assert_float_eq;
    use totsu_core::FloatGeneric;

    type L = FloatGeneric<f64>;

    // [ 1  0 -2 ]
    // [ 0  0  0 ]
    // [ 0  3  4 ]
    let mut m = CsrMat::<L>::new(3);
    m.push_row([(2, -1.), (0, 1.), (2, -1.)]);
    m.push_row([(1, 5.), (1, -5.)]);
    m.push_row([(1, 3.), (2, 4.)]);

    assert_eq!(m.size(), (3, 3));
    assert_eq!(m.nnz(), 4);
    assert_float_eq!(m.get(0, 2), -2., abs <= 1e-12);
    assert_float_eq!(m.get(1, 1), 0., abs <= 1e-12);

    let op = m.as_op();

    let x = [1., 2., 3.];
    let mut y = [1., 1., 1.];
    op.op(2., &x, 1., &mut y);
    assert_float_eq!(y.as_ref(), [2. * -5. + 1., 1., 2. * 18. + 1.].as_ref(), abs_all <= 1e-12);

    let mut z = [f64::NAN; 3];
    op.trans_op(1., &x, 0., &mut z);
    assert_float_eq!(z.as_ref(), [1., 9., 10.].as_ref(), abs_all <= 1e-12);

    let mut tau = [0.; 3];
    op.absadd_cols(&mut tau);
    assert_float_eq!(tau.as_ref(), [1., 3., 6.].as_ref(), abs_all <= 1e-12);

    let mut sigma = [1.; 3];
    op.absadd_rows(&mut sigma);
    assert_float_eq!(sigma.as_ref(), [4., 1., 8.].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_csrop_debug1()
{
    use totsu_core::FloatGeneric;

    type L = FloatGeneric<f64>;

    let mut m = CsrMat::<L>::new(2);
    m.push_row([(0, 1.), (1, 2.)]);

    assert_eq!(format!("{:?}", m.as_op()), "CsrOp { size: (1, 2), nnz: 2 }");
}
