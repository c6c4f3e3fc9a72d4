use totsu_core::solver::SolverParam;
use num_traits::Float;
use num_traits::Num;

pub fn num_by_env<N: Num + std::fmt::Display>(e: &str) -> Option<N>
{
    let v = std::env::var(e).ok()
            .and_then(|s| N::from_str_radix(s.trim(), 10).ok());

    if let Some(v) = &v {
        log::info!("{}: {}", e, v);
    }
    v
}

/// Overrides solver parameters from `MAX_ITER`, `EPS_ACC`, `EPS_INF`, `EPS_ZERO` and `LOG_PERIOD`.
///
/// Unset or unparsable variables leave the parameter as it is.
pub fn set_par_by_env<F: Float + std::fmt::Display>(p: &mut SolverParam<F>)
{
    if let Some(n) = num_by_env("MAX_ITER") {
        p.max_iter = Some(n);
    }

    for (name, eps) in [("EPS_ACC", &mut p.eps_acc), ("EPS_INF", &mut p.eps_inf), ("EPS_ZERO", &mut p.eps_zero)] {
        if let Some(v) = num_by_env(name) {
            *eps = v;
        }
    }

    if let Some(n) = num_by_env("LOG_PERIOD") {
        p.log_period = n;
    }
}

#[test]
fn test_num_by_env1()
{
    std::env::set_var("LANDING_DEMO_TEST_NUM", " 1e-5");
    assert_eq!(num_by_env::<f64>("LANDING_DEMO_TEST_NUM"), Some(1e-5));
    assert_eq!(num_by_env::<usize>("LANDING_DEMO_TEST_NUM"), None);
    assert_eq!(num_by_env::<usize>("LANDING_DEMO_TEST_UNSET"), None);
}

#[test]
fn test_set_par_by_env1()
{
    std::env::set_var("EPS_INF", "1e-3");
    std::env::set_var("LOG_PERIOD", "bad");

    let mut p = SolverParam::<f64>::default();
    p.max_iter = Some(7);
    set_par_by_env(&mut p);

    assert_eq!(p.eps_inf, 1e-3);
    assert_eq!(p.log_period, SolverParam::<f64>::default().log_period);
    if std::env::var("MAX_ITER").is_err() {
        assert_eq!(p.max_iter, Some(7));
    }
}
