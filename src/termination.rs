//! Stopping conditions for a run.
//!
//! A run ends when two bodies come closer than the collision distance, when
//! two bodies drift farther apart than the ejection distance, or when the
//! integration produces a value it cannot continue from. Bodies landing on the
//! same point are a fault rather than a collision. Collision is checked before
//! ejection, so a step that satisfies both reports a collision.

use std::cmp::Ordering;

use crate::body::{Body, BodyId};
use crate::error::SimError;
use crate::sim::Thresholds;

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminationReason {
    /// Closest pair that came within the collision distance.
    Collision { a: BodyId, b: BodyId, distance: f64 },
    /// Farthest pair that separated beyond the ejection distance.
    Ejected { a: BodyId, b: BodyId, distance: f64 },
    /// The integration itself failed (coincident bodies, non-finite state).
    Fault(SimError),
}

impl TerminationReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Collision { .. } => "Star Collision",
            Self::Ejected { .. } => "Star Ejected",
            Self::Fault(SimError::NumericalBlowup { .. }) => "Numerical Blowup",
            Self::Fault(SimError::DegenerateInput { .. }) => "Degenerate Input",
            Self::Fault(_) => "Simulation Fault",
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    pub fn message(&self) -> String {
        match self {
            Self::Collision { a, b, distance } => {
                format!("bodies {} and {} collided at separation {:.4e}", a, b, distance)
            }
            Self::Ejected { a, b, distance } => {
                format!("bodies {} and {} separated to {:.4e}", a, b, distance)
            }
            Self::Fault(err) => err.to_string(),
        }
    }
}

/// Distance between every unordered pair `(a, b)` with `a < b`.
pub fn pairwise_distances(bodies: &[Body]) -> Vec<(BodyId, BodyId, f64)> {
    let mut out = Vec::with_capacity(bodies.len() * bodies.len().saturating_sub(1) / 2);
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            out.push((a.id(), b.id(), a.distance_to(b)));
        }
    }
    out
}

/// Collision or ejection, if any pair crosses a threshold.
///
/// A pair at zero separation has no force direction and is reported as
/// `Fault(DegenerateInput)` ahead of any threshold.
pub fn classify(bodies: &[Body], thresholds: &Thresholds) -> Option<TerminationReason> {
    let pairs = pairwise_distances(bodies);
    if let Some(&(a, b, _)) = pairs.iter().find(|(_, _, d)| *d == 0.0) {
        return Some(TerminationReason::Fault(SimError::DegenerateInput { a, b }));
    }
    let by_distance = |x: &&(BodyId, BodyId, f64), y: &&(BodyId, BodyId, f64)| -> Ordering {
        x.2.total_cmp(&y.2)
    };

    let closest = pairs
        .iter()
        .filter(|(_, _, d)| *d < thresholds.collision_distance)
        .min_by(by_distance);
    if let Some(&(a, b, distance)) = closest {
        return Some(TerminationReason::Collision { a, b, distance });
    }

    let farthest = pairs
        .iter()
        .filter(|(_, _, d)| *d > thresholds.ejection_distance)
        .max_by(by_distance);
    farthest.map(|&(a, b, distance)| TerminationReason::Ejected { a, b, distance })
}

/// First body whose position or velocity is no longer finite.
pub fn find_non_finite(bodies: &[Body]) -> Option<BodyId> {
    bodies.iter().find(|b| !b.is_finite()).map(Body::id)
}
