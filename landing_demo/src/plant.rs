use nalgebra::Vector3;
use landing::{PhysicalParameters, BoundaryCondition};

/// Point-mass vehicle integrated with the same step as the landing problem,
/// plus an external acceleration.
pub struct Plant
{
    pub p: Vector3<f64>,
    pub v: Vector3<f64>,
    /// Speed when the ground was first touched.
    pub impact_speed: Option<f64>,
    h: f64,
    m: f64,
    g: f64,
    p_target: Vector3<f64>,
}

impl Plant
{
    pub fn new(params: &PhysicalParameters, bc: &BoundaryCondition) -> Self
    {
        Plant {
            p: bc.p0,
            v: bc.v0,
            impact_speed: None,
            h: params.h,
            m: params.m,
            g: params.g,
            p_target: params.p_target,
        }
    }

    pub fn state(&self) -> BoundaryCondition
    {
        BoundaryCondition::new(self.p, self.v)
    }

    /// Advances one step with thrust `f` and disturbance acceleration `dist`.
    pub fn step(&mut self, f: &Vector3<f64>, dist: &Vector3<f64>)
    {
        let acc = f / self.m + dist - Vector3::new(0., 0., self.g);
        let v1 = self.v + acc * self.h;

        self.p += (self.v + v1) * (self.h / 2.);
        self.v = v1;

        // ground
        if self.p.z < self.p_target.z {
            if self.impact_speed.is_none() {
                self.impact_speed = Some(self.v.norm());
            }
            self.p.z = self.p_target.z;
            self.v = Vector3::zeros();
        }
    }

    pub fn altitude(&self) -> f64
    {
        self.p.z - self.p_target.z
    }

    /// Horizontal distance to the target.
    pub fn miss(&self) -> f64
    {
        (self.p - self.p_target).xy().norm()
    }

    /// Within `tol_p` of the target, both in altitude and horizontally,
    /// and slower than `tol_v` now and at ground contact.
    pub fn landed(&self, tol_p: f64, tol_v: f64) -> bool
    {
        self.altitude() <= tol_p
            && self.miss() <= tol_p
            && self.v.norm() <= tol_v
            && self.impact_speed.map_or(true, |s| s <= tol_v)
    }
}

//

#[test]
fn test_plant1()
{
    use float_eq::assert_float_eq;

    let params = PhysicalParameters {
        h: 1.,
        g: 10.,
        m: 2.,
        f_max: 100.,
        p_target: Vector3::zeros(),
        alpha: 0.,
        gamma: 1.,
        k: 1,
    };
    let mut plant = Plant::new(&params, &BoundaryCondition::new(Vector3::new(0., 0., 100.), Vector3::zeros()));

    plant.step(&Vector3::zeros(), &Vector3::zeros());
    assert_float_eq!(plant.v.as_slice(), [0., 0., -10.].as_ref(), abs_all <= 1e-12);
    assert_float_eq!(plant.p.as_slice(), [0., 0., 95.].as_ref(), abs_all <= 1e-12);

    // hover with a sideways push
    plant.step(&Vector3::new(0., 0., 40.), &Vector3::new(1., 0., 0.));
    assert_float_eq!(plant.v.as_slice(), [1., 0., 0.].as_ref(), abs_all <= 1e-12);
    assert_float_eq!(plant.p.as_slice(), [0.5, 0., 90.].as_ref(), abs_all <= 1e-12);
    assert!(!plant.landed(0.5, 1.));

    // free fall into the ground while drifting
    for _ in 0.. 10 {
        plant.step(&Vector3::zeros(), &Vector3::zeros());
    }
    assert_eq!(plant.altitude(), 0.);
    assert_eq!(plant.v, Vector3::zeros());
    assert!(plant.impact_speed.unwrap() > 10.);
    assert!(!plant.landed(1., 1.));

    // touchdown at rest on target
    let mut plant = Plant::new(&params, &BoundaryCondition::new(Vector3::new(0.3, 0., 0.25), Vector3::zeros()));
    plant.step(&Vector3::new(0., 0., 18.), &Vector3::zeros());
    assert_float_eq!(plant.impact_speed.unwrap(), 1., abs <= 1e-12);
    assert!(plant.landed(0.5, 1.));
    assert!(!plant.landed(0.2, 1.));
}
