//! Run dispatch
//!
//! [`Simulator`] validates a [`SimulationConfig`], picks the plant model named
//! by its `model` field and returns the trace wrapped in a
//! [`SimulationOutput`]. Runs are independent, so a batch fans out over the
//! rayon thread pool.

use std::sync::atomic::AtomicBool;

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use simcore::{
    first_non_finite, ModelType, NonFiniteSample, PlantModel, SimError, SimulationConfig,
};

use crate::pendulum::{AntiSwayPlant, AntiSwayTrace};
use crate::tracking::{TrackingPlant, TrackingTrace};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum SimulationOutput {
    #[serde(rename = "Anti-Sway")]
    AntiSway(AntiSwayTrace),
    Tracking(TrackingTrace),
}

impl SimulationOutput {
    pub fn model(&self) -> ModelType {
        match self {
            SimulationOutput::AntiSway(_) => ModelType::AntiSway,
            SimulationOutput::Tracking(_) => ModelType::Tracking,
        }
    }

    pub fn len(&self) -> usize {
        self.time().len()
    }

    pub fn is_empty(&self) -> bool {
        self.time().is_empty()
    }

    pub fn time(&self) -> &[f64] {
        match self {
            SimulationOutput::AntiSway(tr) => &tr.time,
            SimulationOutput::Tracking(tr) => &tr.time,
        }
    }

    pub fn angle(&self) -> &[f64] {
        match self {
            SimulationOutput::AntiSway(tr) => &tr.angle,
            SimulationOutput::Tracking(tr) => &tr.angle,
        }
    }

    pub fn trolley_position(&self) -> &[f64] {
        match self {
            SimulationOutput::AntiSway(tr) => &tr.position,
            SimulationOutput::Tracking(tr) => &tr.trolley_position,
        }
    }

    pub fn trolley_velocity(&self) -> &[f64] {
        match self {
            SimulationOutput::AntiSway(tr) => &tr.velocity,
            SimulationOutput::Tracking(tr) => &tr.trolley_velocity,
        }
    }

    pub fn trolley_acceleration(&self) -> &[f64] {
        match self {
            SimulationOutput::AntiSway(tr) => &tr.acceleration,
            SimulationOutput::Tracking(tr) => &tr.trolley_acceleration,
        }
    }

    /// Motor force applied to the trolley.
    pub fn trolley_force(&self) -> &[f64] {
        match self {
            SimulationOutput::AntiSway(tr) => &tr.force,
            SimulationOutput::Tracking(tr) => &tr.force,
        }
    }

    /// Every output series under the name it is serialized with.
    pub fn named_series(&self) -> Vec<(&'static str, &[f64])> {
        match self {
            SimulationOutput::AntiSway(tr) => {
                let mut series: Vec<(&'static str, &[f64])> = vec![
                    ("time", tr.time.as_slice()),
                    ("angle", &tr.angle[..]),
                    ("angular_velocity", &tr.angular_velocity[..]),
                    ("angular_acceleration", &tr.angular_acceleration[..]),
                    ("position", &tr.position[..]),
                    ("velocity", &tr.velocity[..]),
                    ("acceleration", &tr.acceleration[..]),
                    ("force", &tr.force[..]),
                ];
                if let Some(reference) = &tr.velocity_reference {
                    series.push(("velocity_reference", reference.as_slice()));
                }
                series
            }
            SimulationOutput::Tracking(tr) => vec![
                ("time", tr.time.as_slice()),
                ("angle", &tr.angle[..]),
                ("angular_velocity", &tr.angular_velocity[..]),
                ("person_position", &tr.person_position[..]),
                ("person_velocity", &tr.person_velocity[..]),
                ("person_acceleration", &tr.person_acceleration[..]),
                ("trolley_position", &tr.trolley_position[..]),
                ("trolley_velocity", &tr.trolley_velocity[..]),
                ("trolley_acceleration", &tr.trolley_acceleration[..]),
                ("force", &tr.force[..]),
                ("applied_force", &tr.applied_force[..]),
            ],
        }
    }

    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.named_series()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, s)| s)
    }

    /// Earliest NaN or infinity in the run, if the dynamics blew up.
    pub fn first_non_finite(&self) -> Option<NonFiniteSample> {
        first_non_finite(&self.named_series())
    }
}

pub struct Simulator;

impl Simulator {
    /// Runs one simulation to completion.
    pub fn run(config: &SimulationConfig) -> Result<SimulationOutput, SimError> {
        Self::execute(config, None)
    }

    /// Like [`Simulator::run`], but stops with `SimError::Cancelled` once
    /// `cancel` is raised. The flag is polled before every step.
    pub fn run_cancellable(
        config: &SimulationConfig,
        cancel: &AtomicBool,
    ) -> Result<SimulationOutput, SimError> {
        Self::execute(config, Some(cancel))
    }

    /// Runs every configuration in parallel. Results keep the input order.
    pub fn run_batch(configs: &[SimulationConfig]) -> Vec<Result<SimulationOutput, SimError>> {
        configs.par_iter().map(Self::run).collect()
    }

    fn execute(
        config: &SimulationConfig,
        cancel: Option<&AtomicBool>,
    ) -> Result<SimulationOutput, SimError> {
        let run = config.prepare()?;
        debug!(
            "starting {:?} run: {} samples, dt = {}",
            config.model,
            run.len(),
            run.grid.dt()
        );

        let output = match config.model {
            ModelType::AntiSway => SimulationOutput::AntiSway(
                AntiSwayPlant::from_config(config).simulate(&run, cancel)?,
            ),
            ModelType::Tracking => SimulationOutput::Tracking(
                TrackingPlant::from_config(config).simulate(&run, cancel)?,
            ),
        };

        if let Some(bad) = output.first_non_finite() {
            warn!(
                "{:?} run went non-finite: `{}` at sample {} (t = {})",
                config.model,
                bad.series,
                bad.index,
                output.time()[bad.index]
            );
        }
        debug!("finished {:?} run", config.model);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcore::{
        ConfigurationError, ControllerConfig, InitialConditions, InputSignal, PlantParams,
        Waveform,
    };
    use std::sync::atomic::Ordering;

    fn closed_loop(kp: f64, ki: f64) -> SimulationConfig {
        SimulationConfig::new(PlantParams::default(), 0.01, 20.0)
            .with_controller(ControllerConfig::pi(kp, ki))
            .with_velocity_setpoint(InputSignal::waveform(Waveform::Constant, 1.0))
    }

    #[test]
    fn test_dispatch_by_model() {
        let anti_sway = Simulator::run(&closed_loop(5.0, 1.0)).unwrap();
        assert_eq!(anti_sway.model(), ModelType::AntiSway);

        let tracking = Simulator::run(&closed_loop(5.0, 1.0).with_model(ModelType::Tracking))
            .unwrap();
        assert_eq!(tracking.model(), ModelType::Tracking);
        assert!(tracking.series("person_position").is_some());
        assert!(anti_sway.series("person_position").is_none());
    }

    #[test]
    fn test_constant_setpoint_tracking() {
        let out = Simulator::run(&closed_loop(5.0, 2.0)).unwrap();
        let v = out.trolley_velocity();
        assert!((v[v.len() - 1] - 1.0).abs() < 0.05, "final velocity {}", v[v.len() - 1]);
    }

    #[test]
    fn test_anti_sway_reduces_peak_swing() {
        let base = SimulationConfig::new(PlantParams::default(), 0.01, 20.0)
            .with_velocity_setpoint(InputSignal::waveform(Waveform::Step, 1.0));
        let plain = Simulator::run(&base.clone().with_controller(ControllerConfig::pi(5.0, 0.0)))
            .unwrap();
        let damped = Simulator::run(
            &base.with_controller(ControllerConfig::pi(5.0, 0.0).with_anti_sway()),
        )
        .unwrap();

        let plain_peak = simcore::peak_abs(plain.angle());
        let damped_peak = simcore::peak_abs(damped.angle());
        assert!(
            damped_peak < plain_peak,
            "anti-sway {} vs plain {}",
            damped_peak,
            plain_peak
        );
    }

    #[test]
    fn test_every_series_has_grid_length() {
        for model in [ModelType::AntiSway, ModelType::Tracking] {
            let out = Simulator::run(&closed_loop(5.0, 1.0).with_model(model)).unwrap();
            for (name, series) in out.named_series() {
                assert_eq!(series.len(), 2000, "{}", name);
            }
        }
    }

    #[test]
    fn test_configuration_errors_surface() {
        let mut config = closed_loop(1.0, 0.0);
        config.dt = 0.0;
        assert_eq!(
            Simulator::run(&config).unwrap_err(),
            SimError::Configuration(ConfigurationError::NonPositiveTimestep { dt: 0.0 })
        );
    }

    #[test]
    fn test_non_finite_run_is_returned_not_rejected() {
        let plant = PlantParams {
            rope_length: 0.0,
            ..PlantParams::default()
        };
        let config = SimulationConfig::new(plant, 0.01, 1.0).with_initial(InitialConditions {
            angle: 0.1,
            ..Default::default()
        });
        let out = Simulator::run(&config).unwrap();
        let bad = out.first_non_finite().unwrap();
        assert_eq!(bad.index, 1);
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn test_cancelled_run() {
        let flag = AtomicBool::new(false);
        flag.store(true, Ordering::Relaxed);
        let err = Simulator::run_cancellable(&closed_loop(1.0, 0.0), &flag).unwrap_err();
        assert_eq!(err, SimError::Cancelled { step: 0 });

        flag.store(false, Ordering::Relaxed);
        for config in [
            closed_loop(5.0, 2.0),
            closed_loop(5.0, 2.0).with_model(ModelType::Tracking),
        ] {
            assert_eq!(
                Simulator::run_cancellable(&config, &flag).unwrap(),
                Simulator::run(&config).unwrap()
            );
        }
    }

    #[test]
    fn test_batch_matches_sequential() {
        let mut configs: Vec<SimulationConfig> = (1..=6)
            .map(|k| closed_loop(k as f64, 0.5 * k as f64))
            .collect();
        configs.push(closed_loop(1.0, 0.0).with_model(ModelType::Tracking));
        let mut broken = closed_loop(1.0, 0.0);
        broken.dt = -1.0;
        configs.push(broken);

        let batch = Simulator::run_batch(&configs);
        assert_eq!(batch.len(), configs.len());
        for (config, result) in configs.iter().zip(&batch) {
            assert_eq!(&Simulator::run(config), result);
        }
    }

    #[test]
    fn test_output_serializes_with_model_tag() {
        let out = Simulator::run(&SimulationConfig::new(PlantParams::default(), 0.5, 1.0)).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["model"], "Anti-Sway");
        assert_eq!(json["time"].as_array().unwrap().len(), 2);
        assert!(json["velocity_reference"].is_null());
    }
}
