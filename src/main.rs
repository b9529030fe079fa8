use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use threebody::engine::{Engine, SCENARIO_FIGURE_EIGHT, scenario_by_id, scenario_catalog};

/// Run a three-body scenario headless and print where everything ended up.
#[derive(Parser, Debug)]
#[command(name = "threebody", version, about)]
struct Args {
    /// Preset to run (see --list)
    #[arg(short, long, default_value = SCENARIO_FIGURE_EIGHT)]
    scenario: String,

    /// Maximum number of steps
    #[arg(short = 'n', long, default_value_t = 500)]
    steps: u64,

    /// Override the simulated seconds per step
    #[arg(long)]
    time_step: Option<f64>,

    /// Override the trail length kept per body
    #[arg(long)]
    trail_capacity: Option<usize>,

    /// Print a status line every N steps (0 = only at the end)
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// List the available presets and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list {
        for info in scenario_catalog() {
            println!("{:<14} {}: {}", info.id, info.name, info.description);
        }
        return Ok(());
    }

    let mut config = scenario_by_id(&args.scenario)
        .with_context(|| format!("loading scenario '{}'", args.scenario))?;
    if let Some(dt) = args.time_step {
        config = config.with_time_step(dt);
    }
    if let Some(cap) = args.trail_capacity {
        config = config.with_trail_capacity(cap);
    }

    let mut engine = Engine::new(config).context("seeding simulation")?;
    engine.start(None).context("starting simulation")?;
    info!("running '{}' for up to {} steps", args.scenario, args.steps);

    while engine.is_running() && engine.step_count() < args.steps {
        engine.step();
        if args.report_every > 0 && engine.step_count() % args.report_every == 0 {
            print_status(&engine);
        }
    }

    let status = engine.status();
    match (&status.termination, &status.message) {
        (Some(label), Some(message)) => println!("Simulation ended: {}. {}", label, message),
        _ => println!("Simulation still running after {} steps", status.step_count),
    }
    print_status(&engine);
    for body in engine.bodies() {
        let p = body.position();
        let v = body.velocity();
        println!(
            "  {:<8} pos = ({:+.4e}, {:+.4e}) m  vel = ({:+.4e}, {:+.4e}) m/s  trail = {}",
            body.name(),
            p.x,
            p.y,
            v.x,
            v.y,
            body.trail().len()
        );
    }
    Ok(())
}

fn print_status(engine: &Engine) {
    let m = engine.total_momentum();
    println!(
        "step {:>6}: elapsed {:.2e} s ({:.2} days), momentum = ({:+.3e}, {:+.3e})",
        engine.step_count(),
        engine.elapsed_simulated_time(),
        engine.elapsed_simulated_days(),
        m.x,
        m.y
    );
}
