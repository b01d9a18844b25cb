use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use orrery::elements::OrbitalElements;
use orrery::forces::ForceModel;
use orrery::propagation::{
    OrbitPropagator, OrbitRequest, PropagationSettings, Propagator, Termination, Unattended,
    perturbed_bodies, prediction_horizon,
};
use orrery::time::{days_to_seconds, seconds_to_days};
use orrery_cli::{
    DEFAULT_CATALOG, init_logging, load_primary, load_settings, periapsis_state, print_elements,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Propagate an orbit around a catalog body and summarize the trajectory"
)]
struct Cli {
    /// Central body name (case-insensitive)
    #[arg(long, default_value = "Earth")]
    body: String,

    /// Body catalog: YAML file, TOML file, or directory of TOML files
    #[arg(long, default_value = DEFAULT_CATALOG)]
    catalog: PathBuf,

    /// Propagation settings file (TOML or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Periapsis altitude in km
    #[arg(long, default_value_t = 400.0)]
    altitude: f64,

    /// Apoapsis altitude in km (defaults to a circular orbit)
    #[arg(long)]
    apoapsis_altitude: Option<f64>,

    /// Inclination in degrees
    #[arg(long, default_value_t = 0.0)]
    inclination: f64,

    /// Right ascension of the ascending node in degrees
    #[arg(long, default_value_t = 0.0)]
    raan: f64,

    /// Number of trajectory samples (overrides settings)
    #[arg(long)]
    points: Option<usize>,

    /// Orbital periods to propagate (overrides settings)
    #[arg(long)]
    periods: Option<f64>,

    /// Ballistic coefficient m/(Cd·A) in kg/m²; enables drag
    #[arg(long)]
    ballistic_coefficient: Option<f64>,

    /// Keep integrating through the atmosphere instead of resolving re-entry
    #[arg(long, default_value_t = false)]
    full_ellipse: bool,

    /// Catalog bodies that perturb the orbit, comma separated (e.g. Moon,Sun)
    #[arg(long, value_delimiter = ',')]
    perturbers: Vec<String>,

    /// Days after the catalog epoch at which perturbers are placed
    #[arg(long, default_value_t = 0.0)]
    epoch_offset_days: f64,

    /// Treat the primary as a sphere even when the catalog gives a J2
    #[arg(long, default_value_t = false)]
    no_j2: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let primary = load_primary(&cli.catalog, &cli.body)?;
    let config = load_settings(cli.config.as_deref())?;

    let mut settings = PropagationSettings::from_config(&config);
    if let Some(points) = cli.points {
        settings.num_points = points;
    }
    if let Some(periods) = cli.periods {
        settings.periods = periods;
    }

    let radius = primary.environment.radius_km;
    let rp = radius + cli.altitude;
    let ra = radius + cli.apoapsis_altitude.unwrap_or(cli.altitude);
    let initial = periapsis_state(primary.mu(), rp, ra, cli.inclination, cli.raan)?;

    let bodies = perturbed_bodies(
        &primary.catalog,
        &primary.config.name,
        &cli.perturbers,
        days_to_seconds(cli.epoch_offset_days),
    )?;
    let mut forces = ForceModel::gravity_only(&bodies, radius)
        .with_environment(primary.environment)
        .with_perturbation_scale(config.perturbation_scale);
    if !cli.no_j2 {
        forces = forces.with_j2(primary.j2());
    }
    if let Some(bc) = cli.ballistic_coefficient.or(config.ballistic_coefficient_kg_m2) {
        forces = forces.with_ballistic_coefficient(bc);
    }

    let elements = OrbitalElements::from_state(&initial, primary.mu(), Some(radius))?;
    println!("=== Initial orbit about {} ===", primary.config.name);
    print_elements(&elements);
    if let Some(soi) = primary.soi_radius_km {
        println!("  SOI    = {:.0} km", soi);
    }

    let propagator = OrbitPropagator::new(settings);
    let horizon = prediction_horizon(&elements, settings.periods, &settings.horizon);
    let request = OrbitRequest {
        period_s: horizon,
        num_points: settings.num_points,
        allow_full_ellipse: cli.full_ellipse,
    };
    let trajectory = propagator
        .propagate_orbit(&initial, &forces, &request, &mut Unattended)
        .context("propagation failed")?;

    let final_state = trajectory
        .final_state()
        .context("propagation produced no samples")?;
    let min_altitude = trajectory
        .samples
        .iter()
        .map(|s| orrery::vector::norm(&s.position) - radius)
        .fold(f64::INFINITY, f64::min);

    println!("=== Trajectory ===");
    println!("Samples        : {}", trajectory.len());
    println!(
        "Duration       : {:.1} s ({:.3} d)",
        trajectory.duration_s(),
        seconds_to_days(trajectory.duration_s())
    );
    if bodies.len() > 1 {
        println!("Perturbers     : {}", cli.perturbers.join(", "));
    }
    println!(
        "Termination    : {}",
        match trajectory.termination {
            Termination::Completed => "completed",
            Termination::Impact => "impact",
            Termination::Cancelled => "cancelled",
        }
    );
    println!("Min altitude   : {:.3} km", min_altitude);
    println!("Final altitude : {:.3} km", final_state.radius() - radius);

    if trajectory.termination == Termination::Completed {
        let final_elements =
            OrbitalElements::from_state(&final_state, primary.mu(), Some(radius))?;
        println!("=== Final orbit ===");
        print_elements(&final_elements);
    }

    Ok(())
}
