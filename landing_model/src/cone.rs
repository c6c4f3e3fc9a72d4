use totsu_core::solver::{LinAlg, SliceLike, Cone};
use totsu_core::{ConeZero, ConeRPos, ConeSOC, splitm_mut};

//

/// Cone layout of a canonicalized program.
///
/// Rows are ordered as equalities, nonnegative rows, then second-order cones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConeLayout
{
    /// Number of rows in \\(\lbrace 0 \rbrace^p\\).
    pub n_zero: usize,
    /// Number of rows in \\(\mathbb{R}_+^q\\).
    pub n_rpos: usize,
    /// Dimension \\(n_i\\) of each \\(\mathcal{Q}^{n_i}\\).
    pub soc_dims: Vec<usize>,
}

impl ConeLayout
{
    /// Total number of rows.
    pub fn len(&self) -> usize
    {
        self.n_zero + self.n_rpos + self.soc_dims.iter().sum::<usize>()
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }
}

//

/// Product cone
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \lbrace 0 \rbrace^p \times \mathbb{R}_+^q \times \mathcal{Q}^{n_0} \times \cdots \times \mathcal{Q}^{n_{r-1}}
/// \\]
/// laid out by a [`ConeLayout`].
pub struct ProgCone<'a, L: LinAlg>
{
    layout: &'a ConeLayout,
    cone_zero: ConeZero<L>,
    cone_rpos: ConeRPos<L>,
    cone_soc: ConeSOC<L>,
}

impl<'a, L: LinAlg> ProgCone<'a, L>
{
    pub fn new(layout: &'a ConeLayout) -> Self
    {
        ProgCone {
            layout,
            cone_zero: ConeZero::new(),
            cone_rpos: ConeRPos::new(),
            cone_soc: ConeSOC::new(),
        }
    }
}

impl<'a, L: LinAlg> Cone<L> for ProgCone<'a, L>
{
    fn proj(&mut self, dual_cone: bool, x: &mut L::Sl) -> Result<(), ()>
    {
        let n_zero = self.layout.n_zero;
        let n_rpos = self.layout.n_rpos;

        {
            splitm_mut!(x, (x_zero; n_zero), (x_rpos; n_rpos));

            self.cone_zero.proj(dual_cone, &mut x_zero)?;
            self.cone_rpos.proj(dual_cone, &mut x_rpos)?;
        }

        let mut done = n_zero + n_rpos;

        for &ni in &self.layout.soc_dims {
            splitm_mut!(x, (_x_done; done), (x_ni; ni));
            done += ni;

            self.cone_soc.proj(dual_cone, &mut x_ni)?;
        }

        Ok(())
    }

    fn product_group<G: Fn(&mut L::Sl) + Copy>(&self, dp_tau: &mut L::Sl, group: G)
    {
        let n_zero = self.layout.n_zero;
        let n_rpos = self.layout.n_rpos;

        {
            splitm_mut!(dp_tau, (t_zero; n_zero), (t_rpos; n_rpos));

            self.cone_zero.product_group(&mut t_zero, group);
            self.cone_rpos.product_group(&mut t_rpos, group);
        }

        let mut done = n_zero + n_rpos;

        for &ni in &self.layout.soc_dims {
            splitm_mut!(dp_tau, (_t_done; done), (t_ni; ni));
            done += ni;

            self.cone_soc.product_group(&mut t_ni, group);
        }
    }
}

//

#[test]
fn test_progcone1()
{
    use float_eq::assert_float_eq;
    use totsu_core::FloatGeneric;

    type L = FloatGeneric<f64>;

    let layout = ConeLayout {
        n_zero: 1,
        n_rpos: 2,
        soc_dims: vec![3],
    };
    assert_eq!(layout.len(), 6);

    let mut cone = ProgCone::<L>::new(&layout);

    // primal: zero row cleared, negative row clipped, (0, 3, 4) projected onto the cone boundary
    let mut x = [5., -1., 2., 0., 3., 4.];
    cone.proj(false, &mut x).unwrap();
    assert_float_eq!(x.as_ref(), [0., 0., 2., 2.5, 1.5, 2.].as_ref(), abs_all <= 1e-12);

    // dual of zero is free
    let mut x = [5., -1., 2., 2., 1., 1.];
    cone.proj(true, &mut x).unwrap();
    assert_float_eq!(x.as_ref(), [5., 0., 2., 2., 1., 1.].as_ref(), abs_all <= 1e-12);
}
