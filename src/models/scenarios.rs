use crate::error::{Result, SimError};
use crate::sim::{BodyConfig, ScenarioConfig, Thresholds, G};

/// Length unit of the figure-eight preset, meters.
pub const FIGURE_EIGHT_SCALE: f64 = 1e11;
pub const FIGURE_EIGHT_MASS: f64 = 2.989e30;

pub const AU: f64 = 1.495978707e11;
pub const SUN_MASS: f64 = 1.989e30;
pub const EARTH_MASS: f64 = 5.972e24;
pub const MARS_MASS: f64 = 6.39e23;

/// Chenciner–Montgomery figure-eight in units where G = m = 1.
const FIGURE_EIGHT_POSITIONS: [[f64; 2]; 3] = [
    [0.97000436, -0.24308753],
    [-0.97000436, 0.24308753],
    [0.0, 0.0],
];
const FIGURE_EIGHT_VELOCITIES: [[f64; 2]; 3] = [
    [0.466203685, 0.43236573],
    [0.466203685, 0.43236573],
    [-0.93240737, -0.86473146],
];

/// Speed that turns the dimensionless figure-eight velocities into m/s
/// for bodies of `mass` kg laid out on a `scale` m grid.
pub fn velocity_unit(mass: f64, scale: f64) -> f64 {
    (G * mass / scale).sqrt()
}

/// Three equal stars chasing each other around a figure-eight.
///
/// Collision and ejection distances are 0.1 and 10 grid units.
pub fn figure_eight() -> ScenarioConfig {
    let v_unit = velocity_unit(FIGURE_EIGHT_MASS, FIGURE_EIGHT_SCALE);
    let looks = [("sun", 10.0, "yellow"), ("earth", 16.0, "red"), ("earth2", 28.0, "white")];

    let bodies = FIGURE_EIGHT_POSITIONS
        .iter()
        .zip(FIGURE_EIGHT_VELOCITIES.iter())
        .zip(looks)
        .map(|((p, v), (name, radius, color))| {
            BodyConfig::new(
                FIGURE_EIGHT_MASS,
                [p[0] * FIGURE_EIGHT_SCALE, p[1] * FIGURE_EIGHT_SCALE],
                [v[0] * v_unit, v[1] * v_unit],
            )
            .named(name)
            .with_radius(radius)
            .with_color(color)
        })
        .enumerate()
        .map(|(i, cfg)| if i == 0 { cfg.reference() } else { cfg })
        .collect();

    ScenarioConfig::new(bodies, Thresholds::scaled(FIGURE_EIGHT_SCALE, 0.1, 10.0))
}

/// Sun with an Earth-like and a Mars-like planet on circular orbits.
///
/// Distances are judged in AU: 0.2 AU is a collision, 7 AU an ejection.
pub fn sun_planets() -> ScenarioConfig {
    let circular = |r: f64| (G * SUN_MASS / r).sqrt();
    let bodies = vec![
        BodyConfig::new(SUN_MASS, [0.0, 0.0], [0.0, 0.0])
            .named("sun")
            .with_radius(20.0)
            .with_color("yellow")
            .reference(),
        BodyConfig::new(EARTH_MASS, [AU, 0.0], [0.0, circular(AU)])
            .named("earth")
            .with_radius(8.0)
            .with_color("blue"),
        BodyConfig::new(MARS_MASS, [1.524 * AU, 0.0], [0.0, circular(1.524 * AU)])
            .named("mars")
            .with_radius(6.0)
            .with_color("red"),
    ];
    ScenarioConfig::new(bodies, Thresholds::scaled(AU, 0.2, 7.0))
}

/// Convert packed states [x, y, vx, vy]* into body configs of equal `mass`.
/// The first body becomes the reference body.
pub fn configs_from_states(states: &[f64], mass: f64) -> Result<Vec<BodyConfig>> {
    if states.len() % 4 != 0 {
        return Err(SimError::MalformedStates(states.len()));
    }

    let configs = states
        .chunks_exact(4)
        .enumerate()
        .map(|(i, s)| {
            let cfg = BodyConfig::new(mass, [s[0], s[1]], [s[2], s[3]])
                .named(&format!("body{}", i));
            if i == 0 { cfg.reference() } else { cfg }
        })
        .collect();
    Ok(configs)
}
