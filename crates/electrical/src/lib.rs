//! Drive diagnostics and comparison against recorded rig data.

pub mod comparison;
pub mod drive;

pub use comparison::{compare, Comparison};
pub use drive::{DriveConstants, DriveDiagnostics};
