use std::f64::consts::FRAC_PI_2;
use nalgebra::Vector3;

/// Throttle below this fraction of full thrust is cut off.
pub const THROTTLE_CUTOFF: f64 = 0.01;

/// Largest glide angle returned by [`adaptive_glide_angle`].
pub const MAX_GLIDE_ANGLE: f64 = FRAC_PI_2 - 1e-3;

//

/// Autopilot command for one thrust vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustCommand
{
    /// Fraction of full thrust in `[0, 1]`.
    pub throttle: f64,
    /// Elevation of the thrust direction above the horizontal plane in degrees, `[-90, 90]`.
    pub pitch: f64,
    /// Azimuth of the thrust direction from +x towards +y in degrees, `[0, 360)`.
    pub heading: f64,
}

impl ThrustCommand
{
    /// Converts a thrust vector to an autopilot command.
    ///
    /// Returns [`ThrustCommand`].
    /// A zero thrust vector gives a cut-off throttle pointing straight up.
    /// * `f` is the thrust vector in N, typically [`crate::Trajectory::first_thrust`].
    /// * `f_max` is the maximum thrust magnitude in N.
    pub fn from_thrust(f: &Vector3<f64>, f_max: f64) -> Self
    {
        let norm = f.norm();
        let mut throttle = (norm / f_max).min(1.);
        if !(throttle >= THROTTLE_CUTOFF) {
            throttle = 0.;
        }

        if norm == 0. {
            return ThrustCommand {
                throttle,
                pitch: 90.,
                heading: 0.,
            };
        }

        let pitch = f.z.atan2(f.xy().norm()).to_degrees();
        let heading = f.y.atan2(f.x).to_degrees().rem_euclid(360.);

        ThrustCommand {
            throttle,
            pitch,
            // rem_euclid may round up to exactly 360
            heading: if heading >= 360. {0.} else {heading},
        }
    }

    /// Thrust vector that an autopilot following this command produces.
    pub fn thrust(&self, f_max: f64) -> Vector3<f64>
    {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sh, ch) = self.heading.to_radians().sin_cos();

        Vector3::new(cp * ch, cp * sh, sp) * (self.throttle * f_max)
    }
}

//

/// Glide angle that keeps a position well inside the glide cone.
///
/// Returns `atan(margin * p_z / |p_xy|)`, clamped to `[0, MAX_GLIDE_ANGLE]`.
/// * `p` is the current position relative to the target.
/// * `margin` below 1 leaves `p` strictly inside the cone.
pub fn adaptive_glide_angle(p: &Vector3<f64>, margin: f64) -> f64
{
    let alpha = (margin * p.z / p.xy().norm()).atan();

    if alpha >= 0. {
        alpha.min(MAX_GLIDE_ANGLE)
    }
    else {
        // negative or NaN
        0.
    }
}

//

#[test]
fn test_thrust_command1()
{
    use float_eq::assert_float_eq;

    let c = ThrustCommand::from_thrust(&Vector3::new(0., 0., 10.), 20.);
    assert_float_eq!(c.throttle, 0.5, abs <= 1e-12);
    assert_float_eq!(c.pitch, 90., abs <= 1e-12);

    let c = ThrustCommand::from_thrust(&Vector3::new(0., -1., 1.), 1.);
    assert_float_eq!(c.throttle, 1., abs <= 1e-12);
    assert_float_eq!(c.pitch, 45., abs <= 1e-9);
    assert_float_eq!(c.heading, 270., abs <= 1e-9);

    let c = ThrustCommand::from_thrust(&Vector3::new(-1., 0., -1e-9), 100.);
    assert_float_eq!(c.throttle, 0.01, abs <= 1e-9);
    assert_float_eq!(c.heading, 180., abs <= 1e-9);
    assert!(c.pitch < 0.);

    let c = ThrustCommand::from_thrust(&Vector3::new(0.05, 0., 0.), 10.);
    assert_eq!(c.throttle, 0.);
    assert_float_eq!(c.pitch, 0., abs <= 1e-12);

    let c = ThrustCommand::from_thrust(&Vector3::zeros(), 10.);
    assert_eq!(c, ThrustCommand {throttle: 0., pitch: 90., heading: 0.});

    let f = Vector3::new(-3., 2., 6.);
    let c = ThrustCommand::from_thrust(&f, 10.);
    assert_float_eq!(c.thrust(10.).as_slice(), f.as_slice(), abs_all <= 1e-9);
}

#[test]
fn test_adaptive_glide_angle1()
{
    use float_eq::assert_float_eq;

    let a = adaptive_glide_angle(&Vector3::new(3., 4., 5.), 1.);
    assert_float_eq!(a, std::f64::consts::FRAC_PI_4, abs <= 1e-12);

    let p = Vector3::new(30., 40., 20.);
    let a = adaptive_glide_angle(&p, 0.9);
    assert!(a.tan() * p.xy().norm() < p.z);

    assert_eq!(adaptive_glide_angle(&Vector3::new(0., 0., 10.), 0.9), MAX_GLIDE_ANGLE);
    assert_eq!(adaptive_glide_angle(&Vector3::new(1., 0., -1.), 0.9), 0.);
    assert_eq!(adaptive_glide_angle(&Vector3::zeros(), 0.9), 0.);
}
