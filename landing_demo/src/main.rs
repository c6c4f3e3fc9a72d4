use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use nalgebra::Vector3;
use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use anyhow::Result;

use landing::*;

mod env;
mod plant;
mod plot;

use plant::Plant;
use plot::Record;

/// Shortest horizon that is replanned; below it the last plan is followed.
const MIN_STEPS: usize = 3;

/// main
fn main() -> Result<()> {
    env_logger::init();

    //----- parameters

    let mut k = 20; // # of steps to touchdown
    let mut out_dir = PathBuf::from(".");
    let episodes = 5;
    let wind = 0.2; // max disturbance acceleration, horizontal

    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 {
        if let Ok(a) = usize::from_str(&args[1]) {
            k = a.max(MIN_STEPS); // k can be specified by 1st argument
        }
    }
    if args.len() >= 3 {
        out_dir = PathBuf::from(&args[2]); // output directory by 2nd argument
    }

    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    let starts: Vec<_> = (0.. episodes).map(|_| {
        BoundaryCondition::new(
            Vector3::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0), rng.gen_range(300.0..500.0)),
            Vector3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-30.0..-10.0)),
        )
    }).collect();

    // narrowest cone that still holds every start
    let alpha = starts.iter()
        .map(|bc| adaptive_glide_angle(&bc.p0, 0.9))
        .fold(MAX_GLIDE_ANGLE, f64::min);
    log::info!("alpha: {:.3} rad", alpha);

    let base = PhysicalParameters {
        h: 1.,
        g: 9.81,
        m: 1000.,
        f_max: 20000.,
        p_target: Vector3::zeros(),
        alpha,
        gamma: 1.,
        k,
    };

    let config = SolveConfig::default()
        .par(|p| {
            p.eps_acc = 1e-4;
            env::set_par_by_env(p);
        })
        .fallback(|p| {
            p.max_iter = p.max_iter.map(|n| n * 4);
        });

    //----- one program per horizon, reused through every episode

    let mut problems = Vec::new();
    for steps in MIN_STEPS..= k {
        let params = PhysicalParameters {k: steps, .. base.clone()};
        problems.push(LandingProblem::new(params)?.with_config(config.clone()));
    }

    //----- receding-horizon landing

    let mut records = Vec::new();

    for (ep, start) in starts.iter().enumerate() {
        let mut plant = Plant::new(&base, start);
        let mut plan: Option<(Trajectory, usize)> = None;
        let mut rec = Record {
            solve_ms: Vec::new(),
            altitude: vec![plant.altitude()],
        };

        for tick in 0.. k {
            let steps = k - tick;

            if steps >= MIN_STEPS {
                let problem = &mut problems[steps - MIN_STEPS];

                let t0 = Instant::now();
                let rslt = problem.solve(&plant.state());
                let ms = t0.elapsed().as_secs_f64() * 1e3;

                match rslt {
                    Ok(traj) => {
                        log::debug!("episode {} tick {}: fuel {:.1} in {:.1} ms", ep, tick, traj.fuel, ms);
                        rec.solve_ms.push(Some(ms));
                        plan = Some((traj, 0));
                    },
                    Err(e) => {
                        log::warn!("episode {} tick {}: {}", ep, tick, e);
                        rec.solve_ms.push(None);
                    },
                }
            }

            // follow the latest plan where no new one is available
            let f = match &mut plan {
                Some((traj, i)) if *i < traj.steps() => {
                    let f = traj.thrust[*i];
                    *i += 1;
                    f
                },
                _ => Vector3::zeros(),
            };

            let cmd = ThrustCommand::from_thrust(&f, base.f_max);
            log::debug!("throttle {:.3} pitch {:.1} heading {:.1}", cmd.throttle, cmd.pitch, cmd.heading);

            let dist = Vector3::new(rng.gen_range(-wind..wind), rng.gen_range(-wind..wind), 0.);
            plant.step(&cmd.thrust(base.f_max), &dist);
            rec.altitude.push(plant.altitude());

            if plant.impact_speed.is_some() || plant.landed(0.5, 1.) {
                break;
            }
        }

        log::info!("episode {}: landed {}, miss {:.2} m, impact {:?} m/s, altitude {:.2} m",
            ep, plant.landed(0.5, 1.), plant.miss(), plant.impact_speed, plant.altitude()
        );
        records.push(rec);
    }

    //----- graph plot

    plot::plot_timings(&out_dir.join("timings.svg"), &records)?;
    plot::plot_altitude(&out_dir.join("altitude.svg"), &records, base.h)?;

    Ok(())
}
