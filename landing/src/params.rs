use std::f64::consts::FRAC_PI_2;
use nalgebra::Vector3;
use crate::LandingError;

//

/// Physical parameters of the landing problem.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalParameters
{
    /// Discretization step in s.
    pub h: f64,
    /// Gravitational acceleration in m/s^2, acting along -z.
    pub g: f64,
    /// Vehicle mass in kg.
    pub m: f64,
    /// Maximum thrust magnitude in N.
    pub f_max: f64,
    /// Landing target in m. Its z component is the lowest admissible altitude.
    pub p_target: Vector3<f64>,
    /// Glide-path half-angle in rad, measured from the horizontal plane.
    pub alpha: f64,
    /// Converts the sum of thrust magnitudes to fuel consumption.
    pub gamma: f64,
    /// Number of discretization steps.
    pub k: usize,
}

impl PhysicalParameters
{
    /// Checks every precondition.
    ///
    /// Returns `Err` with [`LandingError::InvalidParameter`] naming the first violated one.
    pub fn validate(&self) -> Result<(), LandingError>
    {
        if self.k < 1 {
            return Err(invalid("k", "must be at least 1"));
        }
        positive("h", self.h)?;
        finite("g", self.g)?;
        positive("m", self.m)?;
        positive("f_max", self.f_max)?;
        positive("gamma", self.gamma)?;
        finite_vec("p_target", &self.p_target)?;
        if !(self.alpha >= 0. && self.alpha < FRAC_PI_2) {
            return Err(invalid("alpha", "must be in [0, pi/2)"));
        }
        Ok(())
    }

    /// Lowest admissible altitude.
    pub fn p_min(&self) -> f64
    {
        self.p_target.z
    }

    /// Time to touchdown in s.
    pub fn horizon(&self) -> f64
    {
        self.h * self.k as f64
    }
}

//

/// Optional path constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LandingOptions
{
    /// Thrust never points downward: `F[t]_z >= 0`.
    pub upward_thrust: bool,
    /// The vehicle never climbs: `V[t]_z <= 0`.
    pub descent_only: bool,
}

//

/// Initial state for one solve.
///
/// Terminal velocity is zero and terminal position is the target by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryCondition
{
    /// Initial position in m.
    pub p0: Vector3<f64>,
    /// Initial velocity in m/s.
    pub v0: Vector3<f64>,
}

impl BoundaryCondition
{
    pub fn new(p0: Vector3<f64>, v0: Vector3<f64>) -> Self
    {
        BoundaryCondition {p0, v0}
    }

    pub fn validate(&self) -> Result<(), LandingError>
    {
        finite_vec("p0", &self.p0)?;
        finite_vec("v0", &self.v0)
    }
}

//

fn invalid(name: &'static str, reason: &'static str) -> LandingError
{
    LandingError::InvalidParameter {name, reason}
}

fn positive(name: &'static str, v: f64) -> Result<(), LandingError>
{
    // NaN fails the comparison
    if v > 0. && v.is_finite() {
        Ok(())
    }
    else {
        Err(invalid(name, "must be positive and finite"))
    }
}

fn finite(name: &'static str, v: f64) -> Result<(), LandingError>
{
    if v.is_finite() {
        Ok(())
    }
    else {
        Err(invalid(name, "must be finite"))
    }
}

fn finite_vec(name: &'static str, v: &Vector3<f64>) -> Result<(), LandingError>
{
    if v.iter().all(|e| e.is_finite()) {
        Ok(())
    }
    else {
        Err(invalid(name, "must be finite"))
    }
}

//

#[test]
fn test_params_validate()
{
    let ok = PhysicalParameters {
        h: 0.5,
        g: 9.81,
        m: 1.,
        f_max: 20.,
        p_target: Vector3::zeros(),
        alpha: 0.5,
        gamma: 1.,
        k: 10,
    };
    assert_eq!(ok.validate(), Ok(()));
    assert_eq!(ok.horizon(), 5.);

    let name_of = |p: PhysicalParameters| match p.validate() {
        Err(LandingError::InvalidParameter {name, ..}) => name,
        other => panic!("unexpected {:?}", other),
    };

    assert_eq!(name_of(PhysicalParameters {k: 0, .. ok.clone()}), "k");
    assert_eq!(name_of(PhysicalParameters {h: 0., .. ok.clone()}), "h");
    assert_eq!(name_of(PhysicalParameters {h: f64::INFINITY, .. ok.clone()}), "h");
    assert_eq!(name_of(PhysicalParameters {g: f64::NAN, .. ok.clone()}), "g");
    assert_eq!(name_of(PhysicalParameters {m: -1., .. ok.clone()}), "m");
    assert_eq!(name_of(PhysicalParameters {f_max: 0., .. ok.clone()}), "f_max");
    assert_eq!(name_of(PhysicalParameters {gamma: f64::NAN, .. ok.clone()}), "gamma");
    assert_eq!(name_of(PhysicalParameters {p_target: Vector3::new(0., f64::NAN, 0.), .. ok.clone()}), "p_target");
    assert_eq!(name_of(PhysicalParameters {alpha: -0.1, .. ok.clone()}), "alpha");
    assert_eq!(name_of(PhysicalParameters {alpha: FRAC_PI_2, .. ok.clone()}), "alpha");

    assert_eq!(PhysicalParameters {alpha: 0., .. ok.clone()}.validate(), Ok(()));
    assert_eq!(PhysicalParameters {g: 0., .. ok}.validate(), Ok(()));

    let bc = BoundaryCondition::new(Vector3::new(0., 0., f64::INFINITY), Vector3::zeros());
    assert!(matches!(bc.validate(), Err(LandingError::InvalidParameter {name: "p0", ..})));
}
