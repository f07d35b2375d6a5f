//! Drive-side view of a simulated run
//!
//! The trolley is pulled by a geared motor behind a current amplifier. A
//! force on the trolley maps to a command voltage through the gear radius,
//! the motor torque constant and the amplifier gain:
//!
//! `V = F * r / (Kt * amp)`

use std::f64::consts::PI;

use mechanics::SimulationOutput;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use simcore::PlantParams;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveConstants {
    /// r: radius of the output gear (m)
    pub gear_radius: f64,
    /// Kt: motor torque constant (N·m/A)
    pub torque_constant: f64,
    /// Amplifier gain (A/V)
    pub amp_constant: f64,
}

impl Default for DriveConstants {
    fn default() -> Self {
        DriveConstants {
            gear_radius: 0.0062,
            torque_constant: 0.41,
            amp_constant: 0.11,
        }
    }
}

impl DriveConstants {
    /// Volts per newton of trolley force.
    pub fn force_to_voltage_factor(&self) -> f64 {
        self.gear_radius / (self.torque_constant * self.amp_constant)
    }

    pub fn force_to_voltage(&self, force: f64) -> f64 {
        force * self.force_to_voltage_factor()
    }

    pub fn voltage_to_force(&self, voltage: f64) -> f64 {
        voltage / self.force_to_voltage_factor()
    }

    /// Motor shaft speed for a linear trolley speed.
    pub fn rpm(&self, velocity: f64) -> f64 {
        velocity / (2.0 * PI * self.gear_radius) * 60.0
    }
}

/// Element-wise drive quantities, one sample per simulated timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveDiagnostics {
    /// Velocity of the suspended mass (m/s)
    pub mass_velocity: Vec<f64>,
    /// Motor torque (N·m)
    pub torque: Vec<f64>,
    /// Motor current (A)
    pub current: Vec<f64>,
    /// Amplifier command voltage (V)
    pub voltage: Vec<f64>,
    /// Motor speed (rev/min)
    pub rpm: Vec<f64>,
}

impl DriveDiagnostics {
    pub fn from_output(
        output: &SimulationOutput,
        plant: &PlantParams,
        drive: &DriveConstants,
    ) -> Self {
        let mass_velocity = match output {
            SimulationOutput::AntiSway(tr) => {
                Array1::from(tr.velocity.clone())
                    + Array1::from(tr.angular_velocity.clone()) * plant.rope_length
            }
            SimulationOutput::Tracking(tr) => Array1::from(tr.person_velocity.clone()),
        };

        let force = Array1::from(output.trolley_force().to_vec());
        let torque = force * drive.gear_radius;
        let current = &torque / drive.torque_constant;
        let voltage = &current / drive.amp_constant;
        let rpm = Array1::from(output.trolley_velocity().to_vec()).mapv(|v| drive.rpm(v));

        DriveDiagnostics {
            mass_velocity: mass_velocity.to_vec(),
            torque: torque.to_vec(),
            current: current.to_vec(),
            voltage: voltage.to_vec(),
            rpm: rpm.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.torque.len()
    }

    pub fn is_empty(&self) -> bool {
        self.torque.is_empty()
    }
}
