//! PI (Proportional-Integral) Controller
//!
//! Turns a velocity error into a force: the PI law produces an acceleration
//! which is multiplied by a fixed mass. There is no derivative term and no
//! clamping of any kind, so a sustained error winds the integral up without
//! bound.

use simcore::IntegrationRule;

use crate::tustin::TustinIntegrator;

/// Integral accumulator, one state per integration rule.
#[derive(Debug, Clone)]
enum Accumulator {
    Rectangular { integral: f64, dt: f64 },
    Tustin(TustinIntegrator),
}

impl Accumulator {
    fn new(rule: IntegrationRule, dt: f64) -> Self {
        match rule {
            IntegrationRule::Rectangular => Accumulator::Rectangular { integral: 0.0, dt },
            IntegrationRule::Tustin => Accumulator::Tustin(TustinIntegrator::new(1.0, dt)),
        }
    }

    fn step(&mut self, error: f64) -> f64 {
        match self {
            Accumulator::Rectangular { integral, dt } => {
                *integral = *integral + error * *dt;
                *integral
            }
            Accumulator::Tustin(tustin) => tustin.step(error),
        }
    }

    fn value(&self) -> f64 {
        match self {
            Accumulator::Rectangular { integral, .. } => *integral,
            Accumulator::Tustin(tustin) => tustin.output(),
        }
    }
}

/// PI controller with state.
///
/// One instance belongs to exactly one simulation run. There is no reset:
/// build a new controller for every run.
#[derive(Debug, Clone)]
pub struct PiController {
    kp: f64,
    ki: f64,
    scale: f64,
    accumulator: Accumulator,
}

impl PiController {
    /// Rectangular-rule controller. `scale` is the mass `M` the output is multiplied by.
    pub fn new(kp: f64, ki: f64, scale: f64, dt: f64) -> Self {
        Self::with_rule(kp, ki, scale, dt, IntegrationRule::Rectangular)
    }

    pub fn with_rule(kp: f64, ki: f64, scale: f64, dt: f64, rule: IntegrationRule) -> Self {
        Self {
            kp,
            ki,
            scale,
            accumulator: Accumulator::new(rule, dt),
        }
    }

    /// Advances the integral by one sample and returns `(kp*e + ki*integral) * M`.
    pub fn compute(&mut self, error: f64) -> f64 {
        let p_term = self.kp * error;
        let i_term = self.ki * self.accumulator.step(error);

        (p_term + i_term) * self.scale
    }

    /// Current value of the integral accumulator
    pub fn integral(&self) -> f64 {
        self.accumulator.value()
    }

    pub fn rule(&self) -> IntegrationRule {
        match self.accumulator {
            Accumulator::Rectangular { .. } => IntegrationRule::Rectangular,
            Accumulator::Tustin(_) => IntegrationRule::Tustin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_proportional_only_is_constant() {
        let mut ctrl = PiController::new(1.0, 0.0, 1.0, 0.01);
        for _ in 0..5 {
            assert_eq!(ctrl.compute(2.0), 2.0);
        }
    }

    #[test]
    fn test_integral_grows_linearly() {
        let mut ctrl = PiController::new(0.0, 1.0, 1.0, 0.1);
        let mut outputs = Vec::new();
        for _ in 0..10 {
            outputs.push(ctrl.compute(1.0));
        }
        for (i, out) in outputs.iter().enumerate() {
            assert_relative_eq!(*out, (i + 1) as f64 * 0.1, epsilon = 1e-12);
        }
        assert_relative_eq!(outputs[9], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_output_scaled_by_mass() {
        let mut ctrl = PiController::new(2.0, 3.0, 60.0, 0.5);
        // p = 2*1, integral = 0.5, i = 1.5 -> (2 + 1.5) * 60
        assert_relative_eq!(ctrl.compute(1.0), 210.0, epsilon = 1e-9);
    }

    #[test]
    fn test_integral_is_never_clamped() {
        let mut ctrl = PiController::new(0.0, 1.0, 1.0, 1.0);
        for _ in 0..10_000 {
            ctrl.compute(1e6);
        }
        assert_relative_eq!(ctrl.integral(), 1e10, max_relative = 1e-12);
    }

    #[test]
    fn test_separate_instances_do_not_share_state() {
        let mut a = PiController::new(0.0, 1.0, 1.0, 0.1);
        let mut b = PiController::new(0.0, 1.0, 1.0, 0.1);
        a.compute(5.0);
        a.compute(5.0);
        assert_relative_eq!(b.compute(1.0), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_tustin_rule() {
        let mut ctrl = PiController::with_rule(0.0, 1.0, 1.0, 0.1, IntegrationRule::Tustin);
        assert_eq!(ctrl.rule(), IntegrationRule::Tustin);
        // First sample averages with an initial zero error
        assert_relative_eq!(ctrl.compute(1.0), 0.05, epsilon = 1e-12);
        assert_relative_eq!(ctrl.compute(1.0), 0.15, epsilon = 1e-12);
        assert_relative_eq!(ctrl.integral(), 0.15, epsilon = 1e-12);
        assert_eq!(PiController::new(1.0, 1.0, 1.0, 0.1).rule(), IntegrationRule::Rectangular);
    }

    #[test]
    fn test_non_finite_input_propagates() {
        let mut ctrl = PiController::new(1.0, 1.0, 1.0, 0.1);
        assert!(ctrl.compute(f64::NAN).is_nan());
    }
}
