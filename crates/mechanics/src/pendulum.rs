//! Anti-sway plant: trolley with a pendulum load
//!
//! The trolley (M0) runs on a rail and carries the person (M1) on a rope of
//! length l. Each step:
//! - the motor force comes from the PI velocity controller, or from the
//!   open-loop force channel when the controller is off
//! - the trolley acceleration is computed from that force, the pendulum
//!   acceleration of the previous step and viscous damping
//! - the pendulum acceleration is computed from the trolley acceleration of
//!   this same step
//! - both coordinates advance with semi-implicit Euler
//!
//! There are no guard rails. Degenerate parameters (e.g. `M0 + M1 == 0`)
//! produce infinities or NaN that propagate to the end of the run.

use std::sync::atomic::AtomicBool;

use control::PiController;
use serde::{Deserialize, Serialize};
use simcore::{
    check_cancelled, ControllerConfig, Coordinate, InitialConditions, Integrator, PlantModel,
    PlantParams, PreparedRun, SemiImplicitEuler, SimContext, SimError, SimulationConfig,
};

/// Output of an anti-sway run, one sample per timestamp in every series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntiSwayTrace {
    pub time: Vec<f64>,
    /// Theta (rad)
    pub angle: Vec<f64>,
    /// dTheta (rad/s)
    pub angular_velocity: Vec<f64>,
    /// ddTheta (rad/s²). Entry `i` is the value the trolley equation reads at step `i`.
    pub angular_acceleration: Vec<f64>,
    /// X (m)
    pub position: Vec<f64>,
    /// dX (m/s)
    pub velocity: Vec<f64>,
    /// ddX (m/s²)
    pub acceleration: Vec<f64>,
    /// F (N), applied to the trolley at each step
    pub force: Vec<f64>,
    /// Effective velocity reference, recorded when anti-sway feedforward is active
    pub velocity_reference: Option<Vec<f64>>,
}

impl AntiSwayTrace {
    fn with_len(time: Vec<f64>) -> Self {
        let n = time.len();
        AntiSwayTrace {
            time,
            angle: vec![0.0; n],
            angular_velocity: vec![0.0; n],
            angular_acceleration: vec![0.0; n],
            position: vec![0.0; n],
            velocity: vec![0.0; n],
            acceleration: vec![0.0; n],
            force: vec![0.0; n],
            velocity_reference: None,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AntiSwayPlant {
    pub params: PlantParams,
    pub initial: InitialConditions,
    pub controller: ControllerConfig,
}

impl AntiSwayPlant {
    pub fn new(params: PlantParams, initial: InitialConditions, controller: ControllerConfig) -> Self {
        AntiSwayPlant {
            params,
            initial,
            controller,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.plant.clone(), config.initial, config.controller.clone())
    }

    /// Sway-cancelling gain K, `2*sqrt(l/g)` unless overridden.
    pub fn sway_gain(&self) -> f64 {
        self.controller
            .anti_sway_gain
            .unwrap_or_else(|| 2.0 * (self.params.rope_length / self.params.gravity).sqrt())
    }

    /// Velocity the controller tracks given the setpoint and the current rope angle.
    pub fn velocity_reference(&self, setpoint: f64, angle: f64) -> f64 {
        if self.controller.anti_sway_enabled {
            setpoint + self.sway_gain() * self.params.gravity * angle
        } else {
            setpoint
        }
    }

    fn new_controller(&self, dt: f64) -> Option<PiController> {
        self.controller.enabled.then(|| {
            PiController::with_rule(
                self.controller.kp,
                self.controller.ki,
                self.params.load_mass,
                dt,
                self.controller.integration,
            )
        })
    }
}

impl PlantModel for AntiSwayPlant {
    type Trace = AntiSwayTrace;

    fn simulate(
        &self,
        run: &PreparedRun,
        cancel: Option<&AtomicBool>,
    ) -> Result<AntiSwayTrace, SimError> {
        let n = run.len();
        let dt = run.grid.dt();
        let p = &self.params;
        let total_mass = p.trolley_mass + p.load_mass;

        let mut controller = self.new_controller(dt);
        let mut reference = if controller.is_some() && self.controller.anti_sway_enabled {
            Some(vec![0.0; n])
        } else {
            None
        };

        let mut tr = AntiSwayTrace::with_len(run.grid.samples().to_vec());
        tr.angle[0] = self.initial.angle;
        tr.angular_velocity[0] = self.initial.angular_velocity;
        tr.position[0] = self.initial.position;

        for i in 0..n {
            check_cancelled(cancel, i)?;
            let ctx = SimContext {
                dt,
                t: tr.time[i],
            };

            tr.force[i] = match controller.as_mut() {
                Some(pi) => {
                    let v_ref = self.velocity_reference(run.velocity_setpoint[i], tr.angle[i]);
                    if let Some(r) = reference.as_mut() {
                        r[i] = v_ref;
                    }
                    pi.compute(v_ref - tr.velocity[i])
                }
                None => run.trolley_force[i],
            };

            tr.acceleration[i] = (tr.force[i]
                - p.trolley_mass * p.rope_length * tr.angular_acceleration[i]
                - p.trolley_damping * tr.velocity[i])
                / total_mass;

            if i + 1 == n {
                break;
            }

            let trolley = SemiImplicitEuler.step(
                &ctx,
                Coordinate::new(tr.position[i], tr.velocity[i]),
                tr.acceleration[i],
            );
            tr.position[i + 1] = trolley.position;
            tr.velocity[i + 1] = trolley.velocity;

            let swing_acceleration = (-tr.acceleration[i]
                - p.gravity * tr.angle[i]
                - p.pendulum_damping * tr.angular_velocity[i])
                / p.rope_length;
            tr.angular_acceleration[i + 1] = swing_acceleration;

            let swing = SemiImplicitEuler.step(
                &ctx,
                Coordinate::new(tr.angle[i], tr.angular_velocity[i]),
                swing_acceleration,
            );
            tr.angle[i + 1] = swing.position;
            tr.angular_velocity[i + 1] = swing.velocity;
        }

        tr.velocity_reference = reference;
        Ok(tr)
    }
}
