use float_eq::assert_float_eq;
use nalgebra::Vector3;
use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use totsu_core::solver::SolverError;
use landing::*;

//

fn nominal_params(f_max: f64) -> PhysicalParameters
{
    PhysicalParameters {
        h: 0.5,
        g: 9.81,
        m: 1.,
        f_max,
        p_target: Vector3::zeros(),
        alpha: 0.5,
        gamma: 1.,
        k: 10,
    }
}

fn nominal_config() -> SolveConfig
{
    SolveConfig::default().par(|p| {
        p.eps_acc = 1e-5;
        p.max_iter = Some(200_000);
    })
}

fn nominal_bc() -> BoundaryCondition
{
    BoundaryCondition::new(Vector3::new(10., 5., 30.), Vector3::new(0., 0., -5.))
}

fn one_step_params(f_max: f64) -> PhysicalParameters
{
    PhysicalParameters {
        h: 1.,
        g: 0.,
        m: 1.,
        f_max,
        p_target: Vector3::zeros(),
        alpha: 0.,
        gamma: 1.,
        k: 1,
    }
}

fn assert_feasible(traj: &Trajectory, params: &PhysicalParameters, tol: f64)
{
    let res = traj.residuals(params);
    println!("{:?}", res);

    assert_eq!(traj.steps(), params.k);
    assert_eq!(traj.velocity.len(), params.k + 1);
    assert_eq!(traj.position.len(), params.k + 1);

    assert!(res.boundary <= tol);
    assert!(res.velocity <= tol);
    assert!(res.position <= tol);
    assert!(res.glide <= tol);
    assert!(res.altitude <= tol);
    assert!(res.thrust <= tol * params.f_max);
}

//

#[test]
fn test_landing_nominal()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let params = nominal_params(20.);
    let mut problem = LandingProblem::new(params.clone()).unwrap()
        .with_config(nominal_config());

    let bc = nominal_bc();
    let traj = problem.solve(&bc).unwrap();
    println!("{:?}", traj.thrust);
    println!("fuel {}", traj.fuel);

    assert_feasible(&traj, &params, 5e-3);
    assert_eq!(traj.boundary, bc);

    // |sum F[t]| h / m is the total velocity change
    let dv = -bc.v0 + Vector3::new(0., 0., params.g * params.horizon());
    let fuel_min = params.gamma * params.m / params.h * dv.norm();
    assert!(traj.fuel >= fuel_min * (1. - 1e-3));

    let fuel: f64 = traj.thrust.iter().map(|f| f.norm()).sum::<f64>() * params.gamma;
    assert_float_eq!(traj.fuel, fuel, r2nd <= 1e-9);
}

//

#[test]
fn test_landing_idempotent()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut problem = LandingProblem::new(nominal_params(20.)).unwrap()
        .with_config(nominal_config());

    let bc = nominal_bc();
    let traj1 = problem.solve(&bc).unwrap();
    let traj2 = problem.solve(&bc).unwrap();

    assert_float_eq!(traj1.fuel, traj2.fuel, abs <= 1e-6 * traj1.fuel);
}

//

#[test]
fn test_landing_fmax_monotone()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let bc = nominal_bc();

    let mut p_weak = LandingProblem::new(nominal_params(15.)).unwrap()
        .with_config(nominal_config());
    let mut p_strong = LandingProblem::new(nominal_params(20.)).unwrap()
        .with_config(nominal_config());

    let fuel_weak = p_weak.solve(&bc).unwrap().fuel;
    let fuel_strong = p_strong.solve(&bc).unwrap().fuel;
    println!("{} {}", fuel_weak, fuel_strong);

    assert!(fuel_weak >= fuel_strong * (1. - 1e-2));
}

//

#[test]
fn test_landing_one_step()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let params = one_step_params(100.);
    let mut problem = LandingProblem::new(params.clone()).unwrap();

    // one trapezoidal step from rest cannot move the vehicle, P[1] = P[0]
    let bc = BoundaryCondition::new(Vector3::new(0., 0., 1.), Vector3::zeros());
    let rslt = problem.solve(&bc).unwrap_err();
    println!("{}", rslt);
    assert_eq!(rslt, LandingError::Infeasible);

    let bc = BoundaryCondition::new(Vector3::new(0., 0., 1.), Vector3::new(0., 0., -2.));
    let traj = problem.solve(&bc).unwrap();
    println!("{:?}", traj);

    assert_float_eq!(traj.first_thrust().as_slice(), [0., 0., 2.].as_ref(), abs_all <= 1e-3);
    assert_float_eq!(traj.fuel, 2., abs <= 1e-3);
    assert_float_eq!(traj.velocity[0].as_slice(), [0., 0., -2.].as_ref(), abs_all <= 1e-3);
    assert_float_eq!(traj.velocity[1].as_slice(), [0., 0., 0.].as_ref(), abs_all <= 1e-3);
    assert_float_eq!(traj.position[0].as_slice(), [0., 0., 1.].as_ref(), abs_all <= 1e-3);
    assert_float_eq!(traj.position[1].as_slice(), [0., 0., 0.].as_ref(), abs_all <= 1e-3);
}

//

#[test]
fn test_landing_infeasible()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut problem = LandingProblem::new(one_step_params(1e-3)).unwrap();

    let bc = BoundaryCondition::new(Vector3::new(0., 0., 1.), Vector3::new(0., 0., -2.));
    let rslt = problem.solve(&bc).unwrap_err();
    println!("{}", rslt);

    assert_eq!(rslt, LandingError::Infeasible);
    assert!(!rslt.is_retryable());
}

//

#[test]
fn test_landing_fixed_violation()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let params = nominal_params(20.);

    // no solver run is needed for any of these
    let starved = SolveConfig::default().par(|p| {
        p.max_iter = Some(1);
    });

    let mut problem = LandingProblem::new(params.clone()).unwrap()
        .with_config(starved.clone());

    // below the altitude floor
    let bc = BoundaryCondition::new(Vector3::new(0., 0., -1.), Vector3::zeros());
    assert_eq!(problem.solve(&bc).unwrap_err(), LandingError::Infeasible);

    // outside the glide cone, tan(0.5) * 20 > 5
    let bc = BoundaryCondition::new(Vector3::new(20., 0., 5.), Vector3::zeros());
    assert_eq!(problem.solve(&bc).unwrap_err(), LandingError::Infeasible);

    // climbing at the start
    let options = LandingOptions {
        upward_thrust: false,
        descent_only: true,
    };
    let mut problem = LandingProblem::with_options(params, options).unwrap()
        .with_config(starved);
    let bc = BoundaryCondition::new(Vector3::new(0., 0., 30.), Vector3::new(0., 0., 1.));
    assert_eq!(problem.solve(&bc).unwrap_err(), LandingError::Infeasible);

    // a feasible start does reach the solver
    let rslt = problem.solve(&nominal_bc()).unwrap_err();
    assert_eq!(rslt, LandingError::NumericalError(SolverError::ExcessIter));
}

//

#[test]
fn test_landing_tutorial_scale()
{
    let _ = env_logger::builder().is_test(true).try_init();

    // vehicle of a ton with a 20 kN engine, 100 one-second steps
    let params = PhysicalParameters {
        h: 1.,
        g: 9.81,
        m: 1000.,
        f_max: 20000.,
        p_target: Vector3::zeros(),
        alpha: 0.5,
        gamma: 1.,
        k: 100,
    };
    let mut problem = LandingProblem::new(params.clone()).unwrap();

    let bc = BoundaryCondition::new(Vector3::new(200., -100., 800.), Vector3::new(10., 0., -40.));
    let traj = problem.solve(&bc).unwrap();

    let res = traj.residuals(&params);
    println!("{:?}", res);

    assert!(res.boundary <= 1e-2);
    assert!(res.velocity <= 1e-2);
    assert!(res.position <= 1e-2);
    assert!(res.glide <= 1e-2);
    assert!(res.altitude <= 1e-2);
    assert!(res.thrust <= 1e-3 * params.f_max);
}

//

#[test]
fn test_landing_reuse()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let params = PhysicalParameters {
        h: 0.5,
        g: 9.81,
        m: 1.,
        f_max: 30.,
        p_target: Vector3::zeros(),
        alpha: 0.3,
        gamma: 1.,
        k: 6,
    };
    let mut problem = LandingProblem::new(params.clone()).unwrap();

    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    let bcs: Vec<_> = (0.. 100).map(|_| {
        BoundaryCondition::new(
            Vector3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(15.0..30.0)),
            Vector3::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0), rng.gen_range(-5.0..0.0)),
        )
    }).collect();

    let mut fuels = Vec::new();
    let mut worst = 0_f64;

    for bc in &bcs {
        let traj = problem.solve(bc).unwrap();
        assert_feasible(&traj, &params, 1e-4);

        worst = worst.max(traj.residuals(&params).max());
        fuels.push(traj.fuel);
    }
    println!("worst residual {:e}", worst);

    // same results in another order
    for (bc, fuel) in bcs.iter().zip(&fuels).take(5).rev() {
        let traj = problem.solve(bc).unwrap();
        assert_float_eq!(traj.fuel, *fuel, r2nd <= 1e-6);
    }
}

//

#[test]
fn test_landing_options()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let params = nominal_params(20.);
    let bc = nominal_bc();
    let tol = 5e-3;

    let mut free = LandingProblem::new(params.clone()).unwrap()
        .with_config(nominal_config());
    let fuel_free = free.solve(&bc).unwrap().fuel;

    let options = LandingOptions {
        upward_thrust: true,
        descent_only: true,
    };
    let mut constrained = LandingProblem::with_options(params.clone(), options).unwrap()
        .with_config(nominal_config());
    assert_eq!(constrained.options(), &options);

    let traj = constrained.solve(&bc).unwrap();

    assert_feasible(&traj, &params, tol);
    assert!(traj.thrust.iter().all(|f| f.z >= -tol * params.f_max));
    assert!(traj.velocity.iter().all(|v| v.z <= tol));
    assert!(traj.fuel >= fuel_free * (1. - 1e-3));
}

//

#[test]
fn test_landing_fallback()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let params = nominal_params(20.);
    let bc = nominal_bc();

    let starved = SolveConfig::default().par(|p| {
        p.max_iter = Some(1);
    });

    let mut problem = LandingProblem::new(params.clone()).unwrap()
        .with_config(starved.clone());
    let rslt = problem.solve(&bc).unwrap_err();
    println!("{}", rslt);
    assert_eq!(rslt, LandingError::NumericalError(SolverError::ExcessIter));
    assert!(rslt.is_retryable());

    let mut problem = problem.with_config(starved.fallback(|p| {
        p.eps_acc = 1e-5;
        p.max_iter = Some(200_000);
    }));
    assert_eq!(problem.config().attempts().len(), 2);

    let traj = problem.solve(&bc).unwrap();
    assert_feasible(&traj, &params, 5e-3);
}

//

#[test]
fn test_landing_invalid()
{
    let params = nominal_params(20.);

    let rslt = LandingProblem::new(PhysicalParameters {k: 0, .. params.clone()});
    assert!(matches!(rslt, Err(LandingError::InvalidParameter {name: "k", ..})));

    let rslt = LandingProblem::new(PhysicalParameters {m: 0., .. params.clone()});
    assert!(matches!(rslt, Err(LandingError::InvalidParameter {name: "m", ..})));

    let rslt = LandingProblem::new(PhysicalParameters {alpha: 2., .. params.clone()});
    assert!(matches!(rslt, Err(LandingError::InvalidParameter {name: "alpha", ..})));

    let mut problem = LandingProblem::new(params).unwrap();
    let bc = BoundaryCondition::new(Vector3::zeros(), Vector3::new(f64::NAN, 0., 0.));
    let rslt = problem.solve(&bc).unwrap_err();
    println!("{}", rslt);
    assert_eq!(rslt, LandingError::InvalidParameter {name: "v0", reason: "must be finite"});
}
