use nalgebra::Vector3;
use crate::{PhysicalParameters, BoundaryCondition};

//

/// Optimal landing trajectory.
///
/// Exists only for an optimal solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory
{
    /// Velocity `V[0..=K]` in m/s.
    pub velocity: Vec<Vector3<f64>>,
    /// Position `P[0..=K]` in m.
    pub position: Vec<Vector3<f64>>,
    /// Thrust `F[0..K]` in N.
    pub thrust: Vec<Vector3<f64>>,
    /// Optimal objective `gamma * sum |F[t]|`.
    pub fuel: f64,
    /// Boundary condition this trajectory was solved for.
    pub boundary: BoundaryCondition,
}

impl Trajectory
{
    /// Number of discretization steps `K`.
    pub fn steps(&self) -> usize
    {
        self.thrust.len()
    }

    /// Thrust to apply now, `F[0]`.
    pub fn first_thrust(&self) -> Vector3<f64>
    {
        self.thrust[0]
    }

    /// Largest violations of each constraint family, recomputed from the trajectory.
    pub fn residuals(&self, params: &PhysicalParameters) -> Residuals
    {
        let k = self.steps();
        let h = params.h;
        let gravity = Vector3::new(0., 0., params.g);
        let tan_alpha = params.alpha.tan();

        let mut res = Residuals::default();

        res.boundary = [
            (self.velocity[0] - self.boundary.v0).amax(),
            (self.position[0] - self.boundary.p0).amax(),
            self.velocity[k].amax(),
            (self.position[k] - params.p_target).amax(),
        ].into_iter().fold(0., f64::max);

        for t in 0.. k {
            let (v, v1) = (&self.velocity[t], &self.velocity[t + 1]);
            let (p, p1) = (&self.position[t], &self.position[t + 1]);
            let f = &self.thrust[t];

            let dv = v1 - (v + (f / params.m - gravity) * h);
            let dp = p1 - (p + (v + v1) * (h / 2.));

            res.velocity = res.velocity.max(dv.amax());
            res.position = res.position.max(dp.amax());
            res.thrust = res.thrust.max(f.norm() - params.f_max);
        }

        for p in &self.position {
            res.glide = res.glide.max(tan_alpha * p.xy().norm() - p.z);
            res.altitude = res.altitude.max(params.p_min() - p.z);
        }

        res
    }
}

//

/// Largest constraint violations of a [`Trajectory`], all nonnegative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Residuals
{
    /// Boundary equalities, max abs component.
    pub boundary: f64,
    /// Velocity recurrence, max abs component.
    pub velocity: f64,
    /// Position recurrence, max abs component.
    pub position: f64,
    /// Excess of `|F[t]|` over `F_max`.
    pub thrust: f64,
    /// Excess of `tan(alpha) |P[t]_xy|` over `P[t]_z`.
    pub glide: f64,
    /// Excess of `P_min` over `P[t]_z`.
    pub altitude: f64,
}

impl Residuals
{
    pub fn max(&self) -> f64
    {
        [self.boundary, self.velocity, self.position, self.thrust, self.glide, self.altitude]
            .into_iter().fold(0., f64::max)
    }
}

//

#[test]
fn test_residuals1()
{
    use float_eq::assert_float_eq;

    let params = PhysicalParameters {
        h: 1.,
        g: 0.,
        m: 1.,
        f_max: 100.,
        p_target: Vector3::zeros(),
        alpha: 0.,
        gamma: 1.,
        k: 1,
    };

    let mut traj = Trajectory {
        velocity: vec![Vector3::new(0., 0., -2.), Vector3::zeros()],
        position: vec![Vector3::new(0., 0., 1.), Vector3::zeros()],
        thrust: vec![Vector3::new(0., 0., 2.)],
        fuel: 2.,
        boundary: BoundaryCondition::new(Vector3::new(0., 0., 1.), Vector3::new(0., 0., -2.)),
    };
    assert_float_eq!(traj.residuals(&params).max(), 0., abs <= 1e-12);

    traj.thrust[0] = Vector3::new(0., 0., 2.5);
    traj.position[1] = Vector3::new(0.1, 0., -0.2);
    let res = traj.residuals(&params);
    assert_float_eq!(res.velocity, 0.5, abs <= 1e-12);
    assert_float_eq!(res.position, 0.2, abs <= 1e-12);
    assert_float_eq!(res.boundary, 0.2, abs <= 1e-12);
    assert_float_eq!(res.altitude, 0.2, abs <= 1e-12);
    assert_float_eq!(res.glide, 0.2, abs <= 1e-12);
    assert_float_eq!(res.thrust, 0., abs <= 1e-12);
}
