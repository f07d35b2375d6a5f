//! Plant models of the anti-sway rig
//!
//! - [`pendulum`]: trolley carrying a pendulum load, optionally under PI
//!   velocity control with sway-cancelling feedforward
//! - [`tracking`]: trolley following a person who walks under the rail
//! - [`simulator`]: picks the model for a configuration and runs it

pub mod pendulum;
pub mod simulator;
pub mod tracking;

pub use pendulum::{AntiSwayPlant, AntiSwayTrace};
pub use simulator::{SimulationOutput, Simulator};
pub use tracking::{TrackingPlant, TrackingTrace};
