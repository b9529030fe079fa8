use crate::body::BodyId;

/// Everything that can go wrong while seeding or stepping a simulation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("bodies {a} and {b} occupy the same position")]
    DegenerateInput { a: BodyId, b: BodyId },

    #[error("body {body} has non-positive mass {mass}")]
    NonPositiveMass { body: BodyId, mass: f64 },

    #[error("body {body} diverged to a non-finite position or velocity")]
    NumericalBlowup { body: BodyId },

    #[error("body {body} has a non-finite {field}")]
    NonFiniteInput { body: BodyId, field: &'static str },

    #[error("a scenario needs between {min} and {max} bodies, got {got}", min = crate::sim::MIN_BODIES, max = crate::sim::MAX_BODIES)]
    BodyCount { got: usize },

    #[error("expected exactly one reference body, found {found}")]
    ReferenceBody { found: usize },

    #[error("invalid time step {0} (must be positive and finite)")]
    InvalidTimeStep(f64),

    #[error("invalid thresholds: collision distance {collision} must be positive and below ejection distance {ejection}")]
    InvalidThresholds { collision: f64, ejection: f64 },

    #[error("trail capacity must be at least 1")]
    InvalidTrailCapacity,

    #[error("states length {0} is not a multiple of 4")]
    MalformedStates(usize),

    #[error("unknown scenario id '{0}'")]
    UnknownScenario(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
