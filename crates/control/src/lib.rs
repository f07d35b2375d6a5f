//! Feedback control for the anti-sway trolley
//!
//! This crate provides:
//! - The discrete PI velocity controller
//! - A bilinear (Tustin) integrator used by its optional integration rule

pub mod pi;
pub mod tustin;

pub use pi::*;
pub use tustin::*;
