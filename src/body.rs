use std::collections::VecDeque;

use nalgebra::Vector2;

use crate::error::{Result, SimError};
use crate::sim::{BodyConfig, BodySnapshot, ForceConstants, DEFAULT_TRAIL_CAPACITY};

/// Index of a body within its engine. Also its identity for self-exclusion.
pub type BodyId = usize;

/// Point mass with an optional charge and a bounded trail of past positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    id: BodyId,
    name: String,
    position: Vector2<f64>,
    velocity: Vector2<f64>,
    mass: f64,
    charge: f64,
    radius: f64,
    color: String,
    is_reference: bool,
    trail: VecDeque<Vector2<f64>>,
    trail_capacity: usize,
}

impl Body {
    /// Build a body from its configuration. The trail starts empty.
    pub fn from_config(id: BodyId, config: &BodyConfig, trail_capacity: usize) -> Result<Self> {
        if !config.mass.is_finite() {
            return Err(SimError::NonFiniteInput { body: id, field: "mass" });
        }
        if config.mass <= 0.0 {
            return Err(SimError::NonPositiveMass { body: id, mass: config.mass });
        }
        if trail_capacity == 0 {
            return Err(SimError::InvalidTrailCapacity);
        }
        Ok(Self {
            id,
            name: config.name.clone(),
            position: Vector2::new(config.position[0], config.position[1]),
            velocity: Vector2::new(config.velocity[0], config.velocity[1]),
            mass: config.mass,
            charge: config.charge,
            radius: config.radius,
            color: config.color.clone(),
            is_reference: config.is_reference_body,
            // pre-allocate at most the default; larger caps grow on demand
            trail: VecDeque::with_capacity(trail_capacity.min(DEFAULT_TRAIL_CAPACITY)),
            trail_capacity,
        })
    }

    pub fn id(&self) -> BodyId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn position(&self) -> Vector2<f64> { self.position }
    pub fn velocity(&self) -> Vector2<f64> { self.velocity }
    pub fn mass(&self) -> f64 { self.mass }
    pub fn charge(&self) -> f64 { self.charge }
    pub fn radius(&self) -> f64 { self.radius }
    pub fn color(&self) -> &str { &self.color }
    pub fn is_reference(&self) -> bool { self.is_reference }
    pub fn trail_capacity(&self) -> usize { self.trail_capacity }

    /// Past positions, oldest first.
    pub fn trail(&self) -> &VecDeque<Vector2<f64>> {
        &self.trail
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (other.position - self.position).norm()
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }

    /// Force this body feels from `other`.
    ///
    /// Gravity pulls toward `other` with `G·m1·m2/d²`. The Coulomb term
    /// `k_e·q1·q2/d²` acts on the same axis and pushes apart for like charges.
    /// Coincident bodies have no defined direction and yield
    /// [`SimError::DegenerateInput`].
    pub fn attraction(&self, other: &Body, constants: &ForceConstants) -> Result<Vector2<f64>> {
        let delta = other.position - self.position;
        let d_squared = delta.norm_squared();
        if d_squared == 0.0 {
            return Err(SimError::DegenerateInput { a: self.id, b: other.id });
        }
        let d = d_squared.sqrt();

        let gravity = constants.g * (self.mass * other.mass) / d_squared;
        let coulomb = constants.k_e * (self.charge * other.charge) / d_squared;

        // delta / d is the unit vector toward `other`
        Ok(delta * ((gravity - coulomb) / d))
    }

    /// Sum of [`Body::attraction`] over every body in `bodies` except this one.
    pub fn net_force(&self, bodies: &[Body], constants: &ForceConstants) -> Result<Vector2<f64>> {
        bodies
            .iter()
            .filter(|other| other.id != self.id)
            .try_fold(Vector2::zeros(), |acc, other| Ok(acc + self.attraction(other, constants)?))
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity.
    pub fn apply_force(&mut self, force: Vector2<f64>, dt: f64) {
        let acc = force / self.mass;
        self.velocity += acc * dt;
        self.position += self.velocity * dt;
        self.push_trail();
    }

    /// One integration step against the complete body set.
    ///
    /// `bodies` may contain this body; it is skipped by id.
    pub fn update_position(
        &mut self,
        bodies: &[Body],
        constants: &ForceConstants,
        dt: f64,
    ) -> Result<()> {
        let force = self.net_force(bodies, constants)?;
        self.apply_force(force, dt);
        Ok(())
    }

    fn push_trail(&mut self) {
        if self.trail.len() == self.trail_capacity {
            self.trail.pop_front();
        }
        self.trail.push_back(self.position);
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            name: self.name.clone(),
            position: [self.position.x, self.position.y],
            velocity: [self.velocity.x, self.velocity.y],
            mass: self.mass,
            charge: self.charge,
            radius: self.radius,
            color: self.color.clone(),
            is_reference_body: self.is_reference,
            trail: self.trail.iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}
