//! Checks the stepped anti-sway plant against an RK4 solution of the
//! continuous equations of motion.

use mechanics::{SimulationOutput, Simulator};
use ode_solvers::{Rk4, System, Vector4};
use simcore::{InitialConditions, InputSignal, PlantParams, SimulationConfig};

type State = Vector4<f64>;

const FORCE: f64 = 30.0;
const DURATION: f64 = 5.0;

/// Continuous rig with the pendulum acceleration eliminated from the
/// trolley equation. State is [x, dx, theta, dtheta].
struct Rig {
    p: PlantParams,
    force: f64,
}

impl System<f64, State> for Rig {
    fn system(&self, _t: f64, y: &State, dy: &mut State) {
        let p = &self.p;
        let (v, theta, omega) = (y[1], y[2], y[3]);
        let ddx = (self.force + p.trolley_mass * p.gravity * theta
            + p.trolley_mass * p.pendulum_damping * omega
            - p.trolley_damping * v)
            / p.load_mass;
        let ddtheta = (-ddx - p.gravity * theta - p.pendulum_damping * omega) / p.rope_length;
        dy[0] = v;
        dy[1] = ddx;
        dy[2] = omega;
        dy[3] = ddtheta;
    }
}

fn plant() -> PlantParams {
    PlantParams {
        trolley_mass: 10.0,
        load_mass: 60.0,
        trolley_damping: 10.0,
        pendulum_damping: 0.5,
        gravity: 9.81,
        rope_length: 2.0,
        support_fraction: 0.0,
    }
}

fn stepped(dt: f64) -> SimulationOutput {
    let n = (DURATION / dt).ceil() as usize;
    let config = SimulationConfig::new(plant(), dt, DURATION)
        .with_initial(InitialConditions {
            angle: 0.1,
            ..Default::default()
        })
        .with_trolley_force(InputSignal::Samples(vec![FORCE; n]));
    Simulator::run(&config).expect("open-loop run")
}

fn reference(t_end: f64) -> (f64, State) {
    let rig = Rig {
        p: plant(),
        force: FORCE,
    };
    let y0 = State::new(0.0, 0.0, 0.1, 0.0);
    let mut stepper = Rk4::new(rig, 0.0, y0, t_end, 1e-3);
    stepper.integrate().expect("rk4 integration");
    let (t, y) = stepper.results().get();
    (*t.last().unwrap(), *y.last().unwrap())
}

/// Largest absolute deviation from the reference over x, dx, theta, dtheta.
fn deviation(out: &SimulationOutput, dt: f64) -> f64 {
    let last = out.time()[out.len() - 1];
    let (t_ref, y_ref) = reference(last);
    let i = ((t_ref / dt).round() as usize).min(out.len() - 1);
    let SimulationOutput::AntiSway(tr) = out else {
        panic!("expected an anti-sway trace");
    };
    [
        tr.position[i] - y_ref[0],
        tr.velocity[i] - y_ref[1],
        tr.angle[i] - y_ref[2],
        tr.angular_velocity[i] - y_ref[3],
    ]
    .iter()
    .fold(0.0, |m: f64, d| m.max(d.abs()))
}

#[test]
fn test_fine_step_matches_reference() {
    let dt = 1e-3;
    let err = deviation(&stepped(dt), dt);
    assert!(err < 5e-3, "deviation {}", err);
}

#[test]
fn test_error_shrinks_with_timestep() {
    let coarse = deviation(&stepped(1e-2), 1e-2);
    let fine = deviation(&stepped(1e-3), 1e-3);
    assert!(fine < coarse / 4.0, "coarse {} fine {}", coarse, fine);
}
