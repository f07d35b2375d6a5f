//! Tracking plant: the trolley follows a walking person
//!
//! Two masses on the rail, the person (Xp) and the trolley (Xm), joined by
//! the rope. The rope angle is not integrated from an acceleration: its rate
//! is the relative velocity of the two masses projected on the rope.
//!
//! The harness support force `g * M1 * support_fraction` is reported at the
//! start of each run but is not applied. The coupling terms are kept, so
//! `Theta * 0.0` still turns a non-finite angle into NaN.

use std::sync::atomic::AtomicBool;

use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{
    advance_by_rate, check_cancelled, Coordinate, InitialConditions, Integrator, PlantModel,
    PlantParams, PreparedRun, SemiImplicitEuler, SimContext, SimError, SimulationConfig,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingTrace {
    pub time: Vec<f64>,
    pub angle: Vec<f64>,
    /// Rope angle rate, evaluated from the state at each sample
    pub angular_velocity: Vec<f64>,
    pub person_position: Vec<f64>,
    pub person_velocity: Vec<f64>,
    pub person_acceleration: Vec<f64>,
    pub trolley_position: Vec<f64>,
    pub trolley_velocity: Vec<f64>,
    pub trolley_acceleration: Vec<f64>,
    /// Motor force on the trolley
    pub force: Vec<f64>,
    /// Force applied by the person
    pub applied_force: Vec<f64>,
}

impl TrackingTrace {
    fn with_len(time: Vec<f64>) -> Self {
        let n = time.len();
        TrackingTrace {
            time,
            angle: vec![0.0; n],
            angular_velocity: vec![0.0; n],
            person_position: vec![0.0; n],
            person_velocity: vec![0.0; n],
            person_acceleration: vec![0.0; n],
            trolley_position: vec![0.0; n],
            trolley_velocity: vec![0.0; n],
            trolley_acceleration: vec![0.0; n],
            force: vec![0.0; n],
            applied_force: vec![0.0; n],
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
pub struct TrackingPlant {
    pub params: PlantParams,
    pub initial: InitialConditions,
}

impl TrackingPlant {
    pub fn new(params: PlantParams, initial: InitialConditions) -> Self {
        TrackingPlant { params, initial }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.plant.clone(), config.initial)
    }

    /// Share of the person's weight the harness would carry (N).
    pub fn nominal_support_force(&self) -> f64 {
        self.params.gravity * self.params.load_mass * self.params.support_fraction
    }
}

impl PlantModel for TrackingPlant {
    type Trace = TrackingTrace;

    fn simulate(
        &self,
        run: &PreparedRun,
        cancel: Option<&AtomicBool>,
    ) -> Result<TrackingTrace, SimError> {
        let n = run.len();
        let dt = run.grid.dt();
        let p = &self.params;

        debug!(
            "harness support force {:.3} N is not applied",
            self.nominal_support_force()
        );
        let support_force = 0.0;

        let mut tr = TrackingTrace::with_len(run.grid.samples().to_vec());
        let x0 = self.initial.position;
        let theta0 = self.initial.angle;
        tr.angle[0] = theta0;
        tr.trolley_position[0] = x0;
        tr.person_position[0] = p.rope_length * theta0.cos() * theta0 + x0;

        for i in 0..n {
            check_cancelled(cancel, i)?;
            let ctx = SimContext {
                dt,
                t: tr.time[i],
            };

            tr.force[i] = run.trolley_force[i];
            tr.applied_force[i] = run.applied_force[i];

            tr.person_acceleration[i] = -tr.angle[i] * support_force + tr.applied_force[i];
            tr.trolley_acceleration[i] = (-p.trolley_damping * tr.trolley_velocity[i]
                + tr.angle[i] * support_force
                + tr.force[i])
                / p.trolley_mass;
            tr.angular_velocity[i] = (tr.person_velocity[i] - tr.trolley_velocity[i])
                / (p.rope_length * tr.angle[i].cos());

            if i + 1 == n {
                break;
            }

            let person = SemiImplicitEuler.step(
                &ctx,
                Coordinate::new(tr.person_position[i], tr.person_velocity[i]),
                tr.person_acceleration[i],
            );
            tr.person_position[i + 1] = person.position;
            tr.person_velocity[i + 1] = person.velocity;

            let trolley = SemiImplicitEuler.step(
                &ctx,
                Coordinate::new(tr.trolley_position[i], tr.trolley_velocity[i]),
                tr.trolley_acceleration[i],
            );
            tr.trolley_position[i + 1] = trolley.position;
            tr.trolley_velocity[i + 1] = trolley.velocity;

            tr.angle[i + 1] = advance_by_rate(&ctx, tr.angle[i], tr.angular_velocity[i]);
        }

        Ok(tr)
    }
}
