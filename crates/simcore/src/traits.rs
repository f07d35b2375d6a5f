use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::PreparedRun;
use crate::error::SimError;

#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

/// A plant model that integrates a prepared run over its whole horizon.
///
/// Implementations own no run state: every call builds its own controller and
/// output buffers, so one model can serve any number of runs.
pub trait PlantModel {
    type Trace;

    fn simulate(&self, run: &PreparedRun, cancel: Option<&AtomicBool>)
        -> Result<Self::Trace, SimError>;
}

/// Returns `Cancelled` when the flag is raised before `step` is computed.
pub fn check_cancelled(cancel: Option<&AtomicBool>, step: usize) -> Result<(), SimError> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(SimError::Cancelled { step }),
        _ => Ok(()),
    }
}
