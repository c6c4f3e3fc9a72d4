use float_eq::assert_float_eq;
use landing_model::prelude::*;
use landing_model::*;

type La = FloatGeneric<f64>;

type AProgram = ConvexProgram<La>;
type ASolver = Solver<La>;

//

#[test]
fn test_prog_lp1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize x0 + 2 x1
    // x0 + x1 == 3, x0 <= 2, x1 >= 0
    // expected x=(2, 1)
    let mut prog = AProgram::new();
    let x = prog.new_var(2);

    prog.add_linear_cost(x.at(0) + x.at(1) * 2.);
    prog.add_eq(x.at(0) + x.at(1) - AffExpr::constant(3.));
    prog.add_nonneg(AffExpr::constant(2.) - x.at(0));
    prog.add_nonneg(x.at(1));

    let s = ASolver::new().par(|p| {p.max_iter = Some(100_000)});
    let sol = prog.solve(s).unwrap();
    println!("{:?}", sol);

    assert_float_eq!(sol.value(x), [2., 1.].as_ref(), abs_all <= 1e-3);
    assert_float_eq!(sol.objective(), 4., abs <= 1e-3);
}

//

#[test]
fn test_prog_lp_infeas()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize x
    // x <= -5, x >= 10
    let mut prog = AProgram::new();
    let x = prog.new_var(1);

    prog.add_linear_cost(x.at(0));
    prog.add_nonneg(AffExpr::constant(-5.) - x.at(0));
    prog.add_nonneg(x.at(0) - AffExpr::constant(10.));

    let s = ASolver::new().par(|p| {p.max_iter = Some(100_000)});
    let rslt = prog.solve(s).unwrap_err();
    println!("{}", rslt);

    assert_eq!(rslt, SolverError::Infeasible);
}

//

#[test]
fn test_prog_socp_vs_totsu()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize x0 + x1
    // |x|_2 <= sqrt(2)
    // expected x=(-1, -1)
    let mut prog = AProgram::new();
    let x = prog.new_var(2);

    prog.add_linear_cost(x.at(0) + x.at(1));
    prog.add_soc(vec![x.at(0), x.at(1)], AffExpr::constant(2_f64.sqrt()));

    let sol = prog.solve(ASolver::new()).unwrap();

    // the same problem stated directly as totsu::ProbSOCP
    let rslt_totsu = {
        use totsu::{MatBuild, ProbSOCP};
        use totsu::prelude::MatType;

        type AMatBuild = MatBuild<La>;

        let n = 2;
        let vec_f = AMatBuild::new(MatType::General(n, 1)).iter_colmaj(&[1., 1.]);
        let mats_g = vec![AMatBuild::new(MatType::General(n, n)).iter_rowmaj(&[1., 0., 0., 1.])];
        let vecs_h = vec![AMatBuild::new(MatType::General(n, 1))];
        let vecs_c = vec![AMatBuild::new(MatType::General(n, 1))];
        let scls_d = vec![2_f64.sqrt()];
        let mat_a = AMatBuild::new(MatType::General(0, n));
        let vec_b = AMatBuild::new(MatType::General(0, 1));

        let mut socp = ProbSOCP::<La>::new(vec_f, mats_g, vecs_h, vecs_c, scls_d, mat_a, vec_b);
        ASolver::new().solve(socp.problem()).unwrap().0.to_vec()
    };

    assert_float_eq!(sol.value(x), [-1., -1.].as_ref(), abs_all <= 1e-3);
    assert_float_eq!(sol.value(x), &rslt_totsu[..2], abs_all <= 1e-3);
    assert_float_eq!(sol.objective(), -2., abs <= 1e-3);
}

//

#[test]
fn test_prog_rebind()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize |x - th|_2
    // x0 >= 1
    let mut prog = AProgram::new();
    let x = prog.new_var(2);
    let th = prog.new_param(2);

    prog.add_nonneg(x.at(0) - AffExpr::constant(1.));
    prog.add_norm_cost(1., vec![x.at(0) - th.at(0), x.at(1) - th.at(1)]).unwrap();

    let rows = prog.num_rows();
    let nnz = prog.num_nonzeros();

    // inside the feasible half-plane
    prog.bind(th, &[3., 4.]).unwrap();
    let sol = prog.solve(ASolver::new()).unwrap();
    assert_float_eq!(sol.value(x), [3., 4.].as_ref(), abs_all <= 1e-3);
    assert_float_eq!(sol.objective(), 0., abs <= 1e-3);

    // outside, projected onto the boundary
    prog.bind(th, &[-1., 2.]).unwrap();
    let sol = prog.solve(ASolver::new()).unwrap();
    assert_float_eq!(sol.value(x), [1., 2.].as_ref(), abs_all <= 1e-3);
    assert_float_eq!(sol.objective(), 2., abs <= 1e-3);

    assert_eq!(prog.param_value(th), [-1., 2.].as_ref());
    assert_eq!(prog.num_rows(), rows);
    assert_eq!(prog.num_nonzeros(), nnz);
}

//

#[test]
fn test_prog_param_eq()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // minimize |x|_2
    // x0 == th0, x1 + x2 == th1
    // expected x=(th0, th1/2, th1/2)
    let mut prog = AProgram::new();
    let x = prog.new_var(3);
    let th = prog.new_param(2);

    prog.add_eq(x.at(0) - th.at(0));
    prog.add_eq(x.at(1) + x.at(2) - th.at(1));
    prog.add_norm_cost(2., vec![x.at(0), x.at(1), x.at(2)]).unwrap();

    prog.bind(th, &[1., 4.]).unwrap();
    let s = ASolver::new().par(|p| {p.max_iter = Some(100_000)});
    let sol = prog.solve(s).unwrap();

    assert_float_eq!(sol.value(x), [1., 2., 2.].as_ref(), abs_all <= 1e-3);
    assert_float_eq!(sol.objective(), 2. * 3., abs <= 1e-3);
}

//

#[test]
fn test_prog_errors()
{
    let mut prog = AProgram::new();
    let x = prog.new_var(1);
    let th = prog.new_param(2);

    assert_eq!(
        prog.bind(th, &[1.]),
        Err(ModelError::ParamLength {expected: 2, actual: 1})
    );
    assert_eq!(prog.bind(th, &[1., f64::NAN]), Err(ModelError::NonFinite));
    assert_eq!(prog.param_value(th), [0., 0.].as_ref());

    assert_eq!(prog.add_norm_cost(-1., vec![x.at(0)]), Err(ModelError::NegativeWeight));
    assert_eq!(prog.add_norm_cost(f64::INFINITY, vec![x.at(0)]), Err(ModelError::NonFinite));
    assert_eq!(prog.num_rows(), 0);
}
