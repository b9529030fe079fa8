//! End-to-end runs of the engine against known scenarios.

use approx::assert_relative_eq;
use threebody::engine::{Engine, SimState};
use threebody::models::scenarios::{
    figure_eight, sun_planets, velocity_unit, AU, FIGURE_EIGHT_MASS, FIGURE_EIGHT_SCALE,
};
use threebody::termination::pairwise_distances;
use threebody::{BodyConfig, ScenarioConfig, TerminationReason, Thresholds};

const L: f64 = FIGURE_EIGHT_SCALE;
const M: f64 = FIGURE_EIGHT_MASS;

fn grid_units(config: Vec<BodyConfig>) -> ScenarioConfig {
    ScenarioConfig::new(config, Thresholds::scaled(L, 0.1, 10.0))
}

#[test]
fn figure_eight_stays_bounded_for_500_steps() {
    let mut engine = Engine::new(figure_eight()).unwrap();
    engine.start(None).unwrap();
    assert_eq!(engine.config().time_step, 90_000.0);

    let mut min_sep = f64::MAX;
    let mut max_sep: f64 = 0.0;
    for step in 1..=500 {
        let reason = engine.step();
        assert!(reason.is_none(), "terminated at step {}: {:?}", step, reason);
        for (_, _, d) in pairwise_distances(engine.bodies()) {
            min_sep = min_sep.min(d / L);
            max_sep = max_sep.max(d / L);
        }
    }

    assert!(engine.is_running());
    assert_eq!(engine.step_count(), 500);
    assert!(min_sep >= 0.1, "closest approach {} units", min_sep);
    assert!(max_sep <= 10.0, "widest separation {} units", max_sep);
    assert_relative_eq!(engine.elapsed_simulated_time(), 500.0 * 90_000.0);
}

#[test]
fn falling_pair_collides() {
    let mut engine = Engine::new(grid_units(vec![
        BodyConfig::new(M, [-0.5 * L, 0.0], [0.0, 0.0]).reference(),
        BodyConfig::new(M, [0.5 * L, 0.0], [0.0, 0.0]),
        BodyConfig::new(M, [0.0, 3.0 * L], [0.0, 0.0]),
    ]))
    .unwrap();
    engine.start(None).unwrap();

    let mut reason = None;
    for _ in 0..200 {
        reason = engine.step();
        if reason.is_some() {
            break;
        }
    }

    match reason {
        Some(TerminationReason::Collision { a, b, distance }) => {
            assert_eq!((a, b), (0, 1));
            assert!(distance < 0.1 * L);
        }
        other => panic!("expected a collision, got {:?}", other),
    }
    assert!(!engine.is_running());
    assert!(engine.step_count() < 200);
    assert!(matches!(engine.state(), SimState::Terminated(_)));
}

#[test]
fn fast_body_is_ejected() {
    let v = velocity_unit(M, L);
    let mut engine = Engine::new(grid_units(vec![
        BodyConfig::new(M, [-0.5 * L, 0.0], [0.0, -0.35 * v]).reference(),
        BodyConfig::new(M, [0.5 * L, 0.0], [0.0, 0.35 * v]),
        // several times the escape speed of the pair
        BodyConfig::new(M, [0.0, 2.0 * L], [0.0, 5.0 * v]),
    ]))
    .unwrap();
    engine.start(None).unwrap();

    let mut reason = None;
    for _ in 0..500 {
        reason = engine.step();
        if reason.is_some() {
            break;
        }
    }

    match reason {
        Some(TerminationReason::Ejected { distance, .. }) => assert!(distance > 10.0 * L),
        other => panic!("expected an ejection, got {:?}", other),
    }
    assert_eq!(engine.status().termination.as_deref(), Some("Star Ejected"));
    assert!(!engine.is_running());
}

#[test]
fn trail_keeps_the_latest_cap_positions() {
    let mut engine = Engine::new(figure_eight()).unwrap();
    engine.start(None).unwrap();
    let cap = engine.config().trail_capacity;
    assert_eq!(cap, 1000);

    let steps = 1200;
    let mut history = Vec::with_capacity(steps);
    for _ in 0..steps {
        assert!(engine.step().is_none());
        history.push(engine.body(2).unwrap().position());
    }

    let trail = engine.body(2).unwrap().trail();
    assert_eq!(trail.len(), cap);
    // oldest retained point is the position after step (n - cap + 1)
    assert_eq!(trail.front(), Some(&history[steps - cap]));
    assert_eq!(trail.back(), Some(&history[steps - 1]));
    for body in engine.bodies() {
        assert_eq!(body.trail_capacity(), cap);
        assert_eq!(body.trail().len(), cap);
    }
}

#[test]
fn oversized_trail_capacity_still_runs() {
    let mut engine = Engine::new(figure_eight().with_trail_capacity(usize::MAX / 2)).unwrap();
    engine.start(None).unwrap();
    for _ in 0..10 {
        assert!(engine.step().is_none());
    }
    for body in engine.bodies() {
        assert_eq!(body.trail().len(), 10);
        assert_eq!(body.trail_capacity(), usize::MAX / 2);
    }
}

#[test]
fn reset_twice_gives_identical_bodies() {
    let mut engine = Engine::new(figure_eight()).unwrap();
    engine.start(None).unwrap();
    for _ in 0..50 {
        engine.step();
    }

    engine.reset();
    let first = engine.body_snapshots();
    engine.reset();
    let second = engine.body_snapshots();

    assert_eq!(first, second);
    assert!(!engine.is_running());
    assert!(first.iter().all(|b| b.trail.is_empty()));
    assert_eq!(first[0].position, [0.97000436 * L, -0.24308753 * L]);
}

#[test]
fn sun_planets_holds_together_for_a_few_years() {
    let mut engine = Engine::new(sun_planets()).unwrap();
    engine.start(None).unwrap();
    // ~3 Earth years at 90 000 s per step
    for _ in 0..1050 {
        assert!(engine.step().is_none());
    }
    let earth = engine.body(1).unwrap();
    let r = earth.distance_to(engine.reference_body()) / AU;
    assert!((0.9..1.1).contains(&r), "earth drifted to {} AU", r);
}

#[test]
fn charged_bodies_repel_and_fly_apart() {
    // Like charges large enough to overwhelm gravity.
    let q = 1.0e21;
    let mut engine = Engine::new(grid_units(vec![
        BodyConfig::new(M, [-0.5 * L, 0.0], [0.0, 0.0]).with_charge(q).reference(),
        BodyConfig::new(M, [0.5 * L, 0.0], [0.0, 0.0]).with_charge(q),
        BodyConfig::new(M, [0.0, 1.0 * L], [0.0, 0.0]).with_charge(q),
    ]))
    .unwrap();
    engine.start(None).unwrap();

    let initial = pairwise_distances(engine.bodies());
    for _ in 0..5 {
        assert!(engine.step().is_none());
    }
    let later = pairwise_distances(engine.bodies());
    for (before, after) in initial.iter().zip(later.iter()) {
        assert!(after.2 > before.2, "pair {}-{} should separate", before.0, before.1);
    }
}
