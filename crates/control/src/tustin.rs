//! Bilinear (Tustin) integrator
//!
//! Discretises `1/s` as `(dt/2) * (1 + z^-1) / (1 - z^-1)`:
//! `out = out_prev + (dt/2) * (in + in_prev)`.

#[derive(Debug, Clone)]
pub struct TustinIntegrator {
    gain: f64,
    prev_input: f64,
    prev_output: f64,
}

impl TustinIntegrator {
    /// `gain` scales the integral; `timestep` is the sample period.
    pub fn new(gain: f64, timestep: f64) -> Self {
        TustinIntegrator {
            gain: gain * timestep / 2.0,
            prev_input: 0.0,
            prev_output: 0.0,
        }
    }

    pub fn step(&mut self, input: f64) -> f64 {
        let result = self.prev_output + self.gain * (input + self.prev_input);
        self.prev_input = input;
        self.prev_output = result;
        result
    }

    pub fn output(&self) -> f64 {
        self.prev_output
    }
}
