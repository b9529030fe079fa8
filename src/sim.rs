use serde::{Deserialize, Serialize};

use crate::body::BodyId;
use crate::error::{Result, SimError};

/// Gravitational constant, m³·kg⁻¹·s⁻².
pub const G: f64 = 6.67428e-11;
/// Coulomb constant, N·m²·C⁻².
pub const K_E: f64 = 8.9875517923e9;
/// Simulated seconds advanced per step.
pub const TIMESTEP: f64 = 90_000.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DEFAULT_TRAIL_CAPACITY: usize = 1000;
pub const DEFAULT_RADIUS: f64 = 10.0;
pub const DEFAULT_COLOR: &str = "white";
pub const MIN_BODIES: usize = 2;
pub const MAX_BODIES: usize = 3;

/// Initial conditions for one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyConfig {
    #[serde(default)]
    pub name: String,
    /// [x, y] in meters
    pub position: [f64; 2],
    /// [vx, vy] in m/s
    pub velocity: [f64; 2],
    pub mass: f64,
    #[serde(default)]
    pub charge: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub is_reference_body: bool,
}

fn default_radius() -> f64 { DEFAULT_RADIUS }

fn default_color() -> String { DEFAULT_COLOR.to_string() }

impl BodyConfig {
    pub fn new(mass: f64, position: [f64; 2], velocity: [f64; 2]) -> Self {
        Self {
            name: String::new(),
            position,
            velocity,
            mass,
            charge: 0.0,
            radius: DEFAULT_RADIUS,
            color: default_color(),
            is_reference_body: false,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn reference(mut self) -> Self {
        self.is_reference_body = true;
        self
    }

    fn validate(&self, body: BodyId) -> Result<()> {
        if !self.mass.is_finite() {
            return Err(SimError::NonFiniteInput { body, field: "mass" });
        }
        if self.mass <= 0.0 {
            return Err(SimError::NonPositiveMass { body, mass: self.mass });
        }
        if !self.position.iter().all(|c| c.is_finite()) {
            return Err(SimError::NonFiniteInput { body, field: "position" });
        }
        if !self.velocity.iter().all(|c| c.is_finite()) {
            return Err(SimError::NonFiniteInput { body, field: "velocity" });
        }
        if !self.charge.is_finite() {
            return Err(SimError::NonFiniteInput { body, field: "charge" });
        }
        Ok(())
    }
}

/// Pairwise distances that end a run, in the scenario's length unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub collision_distance: f64,
    pub ejection_distance: f64,
}

impl Thresholds {
    pub fn new(collision_distance: f64, ejection_distance: f64) -> Self {
        Self { collision_distance, ejection_distance }
    }

    /// Thresholds given as multiples of a base length (e.g. 0.2 AU and 7 AU).
    pub fn scaled(unit: f64, collision: f64, ejection: f64) -> Self {
        Self::new(collision * unit, ejection * unit)
    }

    fn validate(&self) -> Result<()> {
        let Self { collision_distance: collision, ejection_distance: ejection } = *self;
        let ok = collision.is_finite()
            && ejection.is_finite()
            && collision > 0.0
            && collision < ejection;
        if ok {
            Ok(())
        } else {
            Err(SimError::InvalidThresholds { collision, ejection })
        }
    }
}

/// Coupling constants for the gravity and Coulomb terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceConstants {
    pub g: f64,
    #[serde(rename = "ke")]
    pub k_e: f64,
}

impl Default for ForceConstants {
    fn default() -> Self {
        Self { g: G, k_e: K_E }
    }
}

/// Complete description of one run: bodies plus global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    pub bodies: Vec<BodyConfig>,
    #[serde(flatten)]
    pub thresholds: Thresholds,
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    #[serde(default = "default_trail_capacity")]
    pub trail_capacity: usize,
    #[serde(default)]
    pub constants: ForceConstants,
}

fn default_time_step() -> f64 { TIMESTEP }

fn default_trail_capacity() -> usize { DEFAULT_TRAIL_CAPACITY }

impl ScenarioConfig {
    pub fn new(bodies: Vec<BodyConfig>, thresholds: Thresholds) -> Self {
        Self {
            bodies,
            thresholds,
            time_step: TIMESTEP,
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            constants: ForceConstants::default(),
        }
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_trail_capacity(mut self, trail_capacity: usize) -> Self {
        self.trail_capacity = trail_capacity;
        self
    }

    pub fn with_constants(mut self, constants: ForceConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Check everything that can be checked before seeding.
    /// Returns the index of the reference body.
    pub fn validate(&self) -> Result<BodyId> {
        let n = self.bodies.len();
        if !(MIN_BODIES..=MAX_BODIES).contains(&n) {
            return Err(SimError::BodyCount { got: n });
        }
        for (i, body) in self.bodies.iter().enumerate() {
            body.validate(i)?;
        }

        let mut flagged = self.bodies.iter().enumerate().filter(|(_, b)| b.is_reference_body);
        let reference = match (flagged.next(), flagged.next()) {
            (Some((i, _)), None) => i,
            _ => {
                let found = self.bodies.iter().filter(|b| b.is_reference_body).count();
                return Err(SimError::ReferenceBody { found });
            }
        };

        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(SimError::InvalidTimeStep(self.time_step));
        }
        self.thresholds.validate()?;
        if self.trail_capacity == 0 {
            return Err(SimError::InvalidTrailCapacity);
        }
        Ok(reference)
    }
}

/// Read-only view of one body for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySnapshot {
    pub id: BodyId,
    pub name: String,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub mass: f64,
    pub charge: f64,
    pub radius: f64,
    pub color: String,
    pub is_reference_body: bool,
    pub trail: Vec<[f64; 2]>,
}

/// What a status line needs to know.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub running: bool,
    /// `None`, or the label of the termination reason
    pub termination: Option<String>,
    pub message: Option<String>,
    pub step_count: u64,
    pub elapsed_seconds: f64,
    pub elapsed_days: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Vec<BodyConfig> {
        vec![
            BodyConfig::new(1.0, [0.0, 0.0], [0.0, 0.0]).reference(),
            BodyConfig::new(1.0, [1.0, 0.0], [0.0, 0.0]),
            BodyConfig::new(1.0, [0.0, 1.0], [0.0, 0.0]),
        ]
    }

    #[test]
    fn valid_config_reports_reference_index() {
        let mut bodies = three();
        bodies[0].is_reference_body = false;
        bodies[2].is_reference_body = true;
        let cfg = ScenarioConfig::new(bodies, Thresholds::new(0.1, 10.0));
        assert_eq!(cfg.validate(), Ok(2));
    }

    #[test]
    fn reference_body_must_be_unique() {
        let mut bodies = three();
        bodies[1].is_reference_body = true;
        let cfg = ScenarioConfig::new(bodies, Thresholds::new(0.1, 10.0));
        assert_eq!(cfg.validate(), Err(SimError::ReferenceBody { found: 2 }));

        let mut bodies = three();
        bodies[0].is_reference_body = false;
        let cfg = ScenarioConfig::new(bodies, Thresholds::new(0.1, 10.0));
        assert_eq!(cfg.validate(), Err(SimError::ReferenceBody { found: 0 }));
    }

    #[test]
    fn rejects_non_positive_mass() {
        let mut bodies = three();
        bodies[1].mass = 0.0;
        let cfg = ScenarioConfig::new(bodies, Thresholds::new(0.1, 10.0));
        assert_eq!(cfg.validate(), Err(SimError::NonPositiveMass { body: 1, mass: 0.0 }));

        let mut bodies = three();
        bodies[2].mass = -5.0;
        let cfg = ScenarioConfig::new(bodies, Thresholds::new(0.1, 10.0));
        assert_eq!(cfg.validate(), Err(SimError::NonPositiveMass { body: 2, mass: -5.0 }));
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut bodies = three();
        bodies[0].velocity = [f64::NAN, 0.0];
        let cfg = ScenarioConfig::new(bodies, Thresholds::new(0.1, 10.0));
        assert_eq!(
            cfg.validate(),
            Err(SimError::NonFiniteInput { body: 0, field: "velocity" })
        );
    }

    #[test]
    fn rejects_wrong_body_count() {
        let cfg = ScenarioConfig::new(three()[..1].to_vec(), Thresholds::new(0.1, 10.0));
        assert_eq!(cfg.validate(), Err(SimError::BodyCount { got: 1 }));

        let mut bodies = three();
        bodies.push(BodyConfig::new(1.0, [5.0, 5.0], [0.0, 0.0]));
        let cfg = ScenarioConfig::new(bodies, Thresholds::new(0.1, 10.0));
        assert_eq!(cfg.validate(), Err(SimError::BodyCount { got: 4 }));
    }

    #[test]
    fn rejects_bad_globals() {
        let cfg = ScenarioConfig::new(three(), Thresholds::new(0.1, 10.0)).with_time_step(0.0);
        assert_eq!(cfg.validate(), Err(SimError::InvalidTimeStep(0.0)));

        let cfg = ScenarioConfig::new(three(), Thresholds::new(10.0, 0.1));
        assert!(matches!(cfg.validate(), Err(SimError::InvalidThresholds { .. })));

        let cfg = ScenarioConfig::new(three(), Thresholds::new(0.0, 10.0));
        assert!(matches!(cfg.validate(), Err(SimError::InvalidThresholds { .. })));

        let cfg = ScenarioConfig::new(three(), Thresholds::new(0.1, 10.0)).with_trail_capacity(0);
        assert_eq!(cfg.validate(), Err(SimError::InvalidTrailCapacity));
    }

    #[test]
    fn scaled_thresholds() {
        let t = Thresholds::scaled(2.0, 0.2, 7.0);
        assert_eq!(t.collision_distance, 0.4);
        assert_eq!(t.ejection_distance, 14.0);
    }
}
