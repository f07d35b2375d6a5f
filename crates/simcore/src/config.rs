//! Simulation configuration
//!
//! A [`SimulationConfig`] is immutable for the duration of a run. It is turned
//! into a [`PreparedRun`] by [`SimulationConfig::prepare`], which validates the
//! time horizon and resolves every input channel the selected model consumes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::signal::InputSignal;
use crate::time::TimeGrid;

/// Physical constants of the rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantParams {
    /// M0: trolley mass (kg)
    pub trolley_mass: f64,
    /// M1: person/load mass (kg)
    pub load_mass: f64,
    /// B0: trolley viscous damping (N·s/m)
    pub trolley_damping: f64,
    /// B1: pendulum damping
    pub pendulum_damping: f64,
    /// g (m/s²)
    pub gravity: f64,
    /// l: rope length (m)
    pub rope_length: f64,
    /// Fraction of the person's weight carried by the harness, in [0, 1]
    #[serde(default)]
    pub support_fraction: f64,
}

impl Default for PlantParams {
    fn default() -> Self {
        PlantParams {
            trolley_mass: 10.0,
            load_mass: 60.0,
            trolley_damping: 10.0,
            pendulum_damping: 0.0,
            gravity: 9.81,
            rope_length: 2.0,
            support_fraction: 0.4,
        }
    }
}

impl PlantParams {
    /// Natural angular frequency of the rope, sqrt(g/l).
    pub fn natural_frequency(&self) -> f64 {
        (self.gravity / self.rope_length).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    /// Xi: trolley position (m)
    pub position: f64,
    /// Ti: rope angle (rad)
    pub angle: f64,
    /// dThi: rope angular velocity (rad/s)
    pub angular_velocity: f64,
}

/// How the PI controller integrates its error signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationRule {
    /// `integral += e * dt`
    #[default]
    Rectangular,
    /// `integral += (e + e_prev) * dt / 2`
    Tustin,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub enabled: bool,
    pub kp: f64,
    pub ki: f64,
    pub anti_sway_enabled: bool,
    /// Overrides the sway-cancelling gain `2*sqrt(l/g)` when set.
    pub anti_sway_gain: Option<f64>,
    pub integration: IntegrationRule,
}

impl ControllerConfig {
    pub fn pi(kp: f64, ki: f64) -> Self {
        ControllerConfig {
            enabled: true,
            kp,
            ki,
            ..Default::default()
        }
    }

    pub fn with_anti_sway(mut self) -> Self {
        self.anti_sway_enabled = true;
        self
    }

    pub fn with_anti_sway_gain(mut self, gain: f64) -> Self {
        self.anti_sway_enabled = true;
        self.anti_sway_gain = Some(gain);
        self
    }

    pub fn with_integration(mut self, rule: IntegrationRule) -> Self {
        self.integration = rule;
        self
    }
}

/// Which plant model a run integrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelType {
    #[default]
    #[serde(rename = "Anti-Sway", alias = "AntiSway")]
    AntiSway,
    Tracking,
}

/// Length of a run, either as a duration or as explicit timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Horizon {
    Duration(f64),
    Samples(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub plant: PlantParams,
    #[serde(default)]
    pub initial: InitialConditions,
    pub dt: f64,
    pub horizon: Horizon,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub model: ModelType,
    /// Vset: trolley velocity setpoint (m/s)
    #[serde(default)]
    pub velocity_setpoint: InputSignal,
    /// Motor force on the trolley when the controller is off. Waveforms are
    /// accelerations and get multiplied by the load mass.
    #[serde(default)]
    pub trolley_force: InputSignal,
    /// F_app/u: force applied by the person (tracking mode)
    #[serde(default)]
    pub applied_force: InputSignal,
}

impl SimulationConfig {
    pub fn new(plant: PlantParams, dt: f64, duration: f64) -> Self {
        SimulationConfig {
            plant,
            initial: InitialConditions::default(),
            dt,
            horizon: Horizon::Duration(duration),
            controller: ControllerConfig::default(),
            model: ModelType::AntiSway,
            velocity_setpoint: InputSignal::default(),
            trolley_force: InputSignal::default(),
            applied_force: InputSignal::default(),
        }
    }

    pub fn with_initial(mut self, initial: InitialConditions) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_controller(mut self, controller: ControllerConfig) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_model(mut self, model: ModelType) -> Self {
        self.model = model;
        self
    }

    pub fn with_velocity_setpoint(mut self, signal: InputSignal) -> Self {
        self.velocity_setpoint = signal;
        self
    }

    pub fn with_trolley_force(mut self, signal: InputSignal) -> Self {
        self.trolley_force = signal;
        self
    }

    pub fn with_applied_force(mut self, signal: InputSignal) -> Self {
        self.applied_force = signal;
        self
    }

    pub fn time_grid(&self) -> Result<TimeGrid, ConfigurationError> {
        match &self.horizon {
            Horizon::Duration(duration) => TimeGrid::uniform(self.dt, *duration),
            Horizon::Samples(samples) => TimeGrid::from_samples(self.dt, samples.clone()),
        }
    }

    /// Validates the configuration and resolves its input channels.
    pub fn prepare(&self) -> Result<PreparedRun, ConfigurationError> {
        let grid = self.time_grid()?;
        let n = grid.len();
        let zeros = || vec![0.0; n];

        let (uses_setpoint, uses_trolley_force, uses_applied_force) = match self.model {
            ModelType::AntiSway => (self.controller.enabled, !self.controller.enabled, false),
            ModelType::Tracking => (false, true, true),
        };

        let velocity_setpoint = if uses_setpoint {
            self.velocity_setpoint
                .resolve("velocity_setpoint", &grid, &self.plant, 1.0)?
        } else {
            zeros()
        };
        let trolley_force = if uses_trolley_force {
            self.trolley_force
                .resolve("trolley_force", &grid, &self.plant, self.plant.load_mass)?
        } else {
            zeros()
        };
        let applied_force = if uses_applied_force {
            self.applied_force
                .resolve("applied_force", &grid, &self.plant, 1.0)?
        } else {
            zeros()
        };

        Ok(PreparedRun {
            grid,
            velocity_setpoint,
            trolley_force,
            applied_force,
        })
    }
}

/// A validated run: a time grid plus one sample per timestamp on every channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRun {
    pub grid: TimeGrid,
    pub velocity_setpoint: Vec<f64>,
    pub trolley_force: Vec<f64>,
    pub applied_force: Vec<f64>,
}

impl PreparedRun {
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}
