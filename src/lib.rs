//! Three-body gravitational simulation core.
//!
//! A fixed set of point masses pulled together by gravity (and, if charged,
//! pushed or pulled by the Coulomb force), advanced with a semi-implicit Euler
//! step and stopped when two bodies collide or one is thrown clear.

pub mod body;
pub mod engine;
pub mod error;
pub mod models;
pub mod sim;
pub mod termination;

pub use body::{Body, BodyId};
pub use engine::{scenario_by_id, scenario_catalog, Engine, ScenarioInfo, SimState};
pub use error::SimError;
pub use sim::{BodyConfig, BodySnapshot, ForceConstants, ScenarioConfig, StatusSnapshot, Thresholds};
pub use termination::TerminationReason;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
