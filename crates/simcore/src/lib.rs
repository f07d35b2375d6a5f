//! Shared building blocks for the anti-sway rig simulation
//!
//! This crate provides:
//! - Run configuration and input signal generators
//! - Validated time grids
//! - Integrators for second-order coordinates
//! - The plant model trait and run diagnostics
//! - A container for recorded experiment data

pub mod config;
pub mod dataset;
pub mod error;
pub mod integrators;
pub mod series;
pub mod signal;
pub mod time;
pub mod traits;

pub use config::*;
pub use dataset::Dataset;
pub use error::{ConfigurationError, SimError};
pub use integrators::*;
pub use series::{first_non_finite, peak_abs, NonFiniteSample};
pub use signal::{InputSignal, ShapedMove, Waveform};
pub use time::TimeGrid;
pub use traits::*;
