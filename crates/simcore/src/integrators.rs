use serde::{Deserialize, Serialize};

use crate::SimContext;

/// Position and velocity of one degree of freedom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub position: f64,
    pub velocity: f64,
}

impl Coordinate {
    pub fn new(position: f64, velocity: f64) -> Self {
        Coordinate { position, velocity }
    }
}

/// A generic integration strategy trait.
pub trait Integrator {
    /// Advances one coordinate by one timestep under a known acceleration.
    fn step(&self, ctx: &SimContext, coordinate: Coordinate, acceleration: f64) -> Coordinate;
}

/// Semi-implicit Euler integrator (Symplectic Euler).
/// This is first-order accurate but conserves energy better than explicit Euler.
/// Velocity is updated first, then position is advanced with the NEW velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn step(&self, ctx: &SimContext, coordinate: Coordinate, acceleration: f64) -> Coordinate {
        let velocity = acceleration * ctx.dt + coordinate.velocity;
        let position = velocity * ctx.dt + coordinate.position;
        Coordinate { position, velocity }
    }
}

/// Plain forward Euler: position is advanced with the OLD velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn step(&self, ctx: &SimContext, coordinate: Coordinate, acceleration: f64) -> Coordinate {
        let position = coordinate.velocity * ctx.dt + coordinate.position;
        let velocity = acceleration * ctx.dt + coordinate.velocity;
        Coordinate { position, velocity }
    }
}

/// Forward Euler on a first-order quantity given its rate.
pub fn advance_by_rate(ctx: &SimContext, value: f64, rate: f64) -> f64 {
    rate * ctx.dt + value
}
