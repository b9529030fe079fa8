use log::{debug, info, trace, warn};
use nalgebra::Vector2;

use crate::body::{Body, BodyId};
use crate::error::{Result, SimError};
use crate::models::scenarios::{figure_eight, sun_planets};
use crate::sim::{BodySnapshot, ScenarioConfig, StatusSnapshot, SECONDS_PER_DAY};
use crate::termination::{self, TerminationReason};

pub const SCENARIO_FIGURE_EIGHT: &str = "figure-eight";
pub const SCENARIO_SUN_PLANETS: &str = "sun-planets";

pub struct ScenarioInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn scenario_catalog() -> &'static [ScenarioInfo] {
    &[
        ScenarioInfo {
            id: SCENARIO_FIGURE_EIGHT,
            name: "Figure-eight",
            description: "Three equal stars on the periodic figure-eight orbit.",
        },
        ScenarioInfo {
            id: SCENARIO_SUN_PLANETS,
            name: "Sun and planets",
            description: "A sun with Earth-like and Mars-like planets, thresholds in AU.",
        },
    ]
}

pub fn scenario_by_id(id: &str) -> Result<ScenarioConfig> {
    match id {
        SCENARIO_FIGURE_EIGHT => Ok(figure_eight()),
        SCENARIO_SUN_PLANETS => Ok(sun_planets()),
        _ => Err(SimError::UnknownScenario(id.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimState {
    /// Seeded, waiting for `start`.
    Idle,
    Running,
    Terminated(TerminationReason),
}

/// Owns one body set and advances it a fixed time step per `step` call.
///
/// `Idle -> Running` on `start`, `Running -> Terminated` when a stopping
/// condition fires, back to `Idle` on `reset`. A terminated engine only runs
/// again after `start` re-seeds it.
#[derive(Debug)]
pub struct Engine {
    canonical: ScenarioConfig,
    /// `canonical` already seeded; `reset` copies it back.
    seeded: Vec<Body>,
    canonical_reference: BodyId,
    active: ScenarioConfig,
    bodies: Vec<Body>,
    reference: BodyId,
    state: SimState,
    step_count: u64,
}

impl Engine {
    /// Validate `canonical` and seed it, idle. `reset` returns here.
    pub fn new(canonical: ScenarioConfig) -> Result<Self> {
        let (bodies, reference) = seed(&canonical)?;
        Ok(Self {
            active: canonical.clone(),
            canonical,
            seeded: bodies.clone(),
            canonical_reference: reference,
            bodies,
            reference,
            state: SimState::Idle,
            step_count: 0,
        })
    }

    pub fn from_scenario(id: &str) -> Result<Self> {
        Self::new(scenario_by_id(id)?)
    }

    /// Re-seed from `initial` (or the canonical scenario) and run.
    ///
    /// On error nothing changes: the previous bodies and state stay in place.
    pub fn start(&mut self, initial: Option<&ScenarioConfig>) -> Result<()> {
        let config = initial.unwrap_or(&self.canonical).clone();
        let (bodies, reference) = seed(&config)?;
        debug!(
            "starting run: {} bodies, dt = {} s, collision < {:e}, ejection > {:e}",
            bodies.len(),
            config.time_step,
            config.thresholds.collision_distance,
            config.thresholds.ejection_distance
        );
        self.active = config;
        self.bodies = bodies;
        self.reference = reference;
        self.step_count = 0;
        self.state = SimState::Running;
        Ok(())
    }

    /// Back to the bodies seeded from the canonical scenario, idle.
    pub fn reset(&mut self) {
        debug!("reset to canonical scenario");
        self.active = self.canonical.clone();
        self.bodies = self.seeded.clone();
        self.reference = self.canonical_reference;
        self.step_count = 0;
        self.state = SimState::Idle;
    }

    /// Advance one time step. Returns the reason if this step ended the run.
    ///
    /// All forces are taken from the pre-step positions, so the result does
    /// not depend on body order.
    pub fn step(&mut self) -> Option<TerminationReason> {
        if self.state != SimState::Running {
            return None;
        }

        let forces = match self.net_forces() {
            Ok(forces) => forces,
            Err(err) => return Some(self.terminate(TerminationReason::Fault(err))),
        };

        let dt = self.active.time_step;
        for (body, force) in self.bodies.iter_mut().zip(forces) {
            body.apply_force(force, dt);
        }
        self.step_count += 1;
        trace!("step {} done, t = {} s", self.step_count, self.elapsed_simulated_time());

        if let Some(body) = termination::find_non_finite(&self.bodies) {
            let reason = TerminationReason::Fault(SimError::NumericalBlowup { body });
            return Some(self.terminate(reason));
        }
        self.check_termination()
    }

    fn net_forces(&self) -> Result<Vec<Vector2<f64>>> {
        let constants = &self.active.constants;
        self.bodies
            .iter()
            .map(|body| body.net_force(&self.bodies, constants))
            .collect()
    }

    fn check_termination(&mut self) -> Option<TerminationReason> {
        let reason = termination::classify(&self.bodies, &self.active.thresholds)?;
        Some(self.terminate(reason))
    }

    fn terminate(&mut self, reason: TerminationReason) -> TerminationReason {
        if reason.is_fault() {
            warn!("run aborted after {} steps: {}", self.step_count, reason.message());
        } else {
            info!(
                "{} after {} steps ({:.2} days): {}",
                reason.label(),
                self.step_count,
                self.elapsed_simulated_days(),
                reason.message()
            );
        }
        self.state = SimState::Terminated(reason.clone());
        reason
    }

    /// Simulated seconds: steps taken times the fixed time step.
    pub fn elapsed_simulated_time(&self) -> f64 {
        self.step_count as f64 * self.active.time_step
    }

    pub fn elapsed_simulated_days(&self) -> f64 {
        self.elapsed_simulated_time() / SECONDS_PER_DAY
    }

    pub fn step_count(&self) -> u64 { self.step_count }
    pub fn state(&self) -> &SimState { &self.state }
    pub fn is_running(&self) -> bool { self.state == SimState::Running }
    pub fn config(&self) -> &ScenarioConfig { &self.active }
    pub fn canonical(&self) -> &ScenarioConfig { &self.canonical }
    pub fn bodies(&self) -> &[Body] { &self.bodies }
    pub fn len(&self) -> usize { self.bodies.len() }
    pub fn is_empty(&self) -> bool { self.bodies.is_empty() }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn reference_body(&self) -> &Body {
        &self.bodies[self.reference]
    }

    pub fn termination_reason(&self) -> Option<&TerminationReason> {
        match &self.state {
            SimState::Terminated(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn total_momentum(&self) -> Vector2<f64> {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn body_snapshots(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(Body::snapshot).collect()
    }

    pub fn status(&self) -> StatusSnapshot {
        let reason = self.termination_reason();
        StatusSnapshot {
            running: self.is_running(),
            termination: reason.map(|r| r.label().to_string()),
            message: reason.map(TerminationReason::message),
            step_count: self.step_count,
            elapsed_seconds: self.elapsed_simulated_time(),
            elapsed_days: self.elapsed_simulated_days(),
        }
    }
}

/// Build a fresh body set from a configuration, or explain why it can't be.
fn seed(config: &ScenarioConfig) -> Result<(Vec<Body>, BodyId)> {
    let reference = config.validate()?;
    let bodies = config
        .bodies
        .iter()
        .enumerate()
        .map(|(i, cfg)| Body::from_config(i, cfg, config.trail_capacity))
        .collect::<Result<Vec<_>>>()?;

    for (a, b, distance) in termination::pairwise_distances(&bodies) {
        if distance == 0.0 {
            return Err(SimError::DegenerateInput { a, b });
        }
    }
    Ok((bodies, reference))
}
