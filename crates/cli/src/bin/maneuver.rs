use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use orrery::StateVector;
use orrery::elements::OrbitalElements;
use orrery::forces::ForceModel;
use orrery::maneuver::{
    BurnTiming, ManeuverFrame, ManeuverKind, ManeuverRequest, PlaneTarget, plan,
};
use orrery::propagation::{OrbitPropagator, PropagationSettings};
use orrery_cli::{
    DEFAULT_CATALOG, init_logging, load_primary, load_settings, periapsis_state, print_elements,
};

#[derive(Parser)]
#[command(author, version, about = "Plan impulsive maneuvers from a catalog-body orbit")]
struct Cli {
    /// Maneuver type: hohmann, circularize, plane_change, hohmann_intercept, lambert_intercept
    #[arg(long)]
    kind: ManeuverKind,

    /// Central body name (case-insensitive)
    #[arg(long, default_value = "Earth")]
    body: String,

    /// Body catalog: YAML file, TOML file, or directory of TOML files
    #[arg(long, default_value = DEFAULT_CATALOG)]
    catalog: PathBuf,

    /// Propagation settings used with --execute
    #[arg(long)]
    config: Option<PathBuf>,

    /// Current periapsis altitude in km
    #[arg(long, default_value_t = 400.0)]
    altitude: f64,

    /// Current apoapsis altitude in km (defaults to circular)
    #[arg(long)]
    apoapsis_altitude: Option<f64>,

    /// Current inclination in degrees
    #[arg(long, default_value_t = 0.0)]
    inclination: f64,

    /// Current RAAN in degrees
    #[arg(long, default_value_t = 0.0)]
    raan: f64,

    /// Target altitude in km (hohmann and intercepts)
    #[arg(long)]
    target_altitude: Option<f64>,

    /// Target phase ahead of the chaser in degrees (intercepts)
    #[arg(long, default_value_t = 0.0)]
    target_phase: f64,

    /// Time of flight in seconds (lambert_intercept)
    #[arg(long)]
    tof: Option<f64>,

    /// Target inclination in degrees (plane_change, or hohmann arriving in a new plane)
    #[arg(long)]
    target_inclination: Option<f64>,

    /// Target RAAN in degrees (plane_change, or hohmann arriving in a new plane)
    #[arg(long)]
    target_raan: Option<f64>,

    /// Where to circularize
    #[arg(long, value_enum, default_value_t = Timing::Immediate)]
    timing: Timing,

    /// Fly the planned burns with the adaptive integrator and report the result
    #[arg(long, default_value_t = false)]
    execute: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Timing {
    Immediate,
    Periapsis,
    Apoapsis,
}

impl From<Timing> for BurnTiming {
    fn from(timing: Timing) -> Self {
        match timing {
            Timing::Immediate => BurnTiming::Immediate,
            Timing::Periapsis => BurnTiming::Periapsis,
            Timing::Apoapsis => BurnTiming::Apoapsis,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let primary = load_primary(&cli.catalog, &cli.body)?;
    let mu = primary.mu();
    let radius = primary.environment.radius_km;

    let rp = radius + cli.altitude;
    let ra = radius + cli.apoapsis_altitude.unwrap_or(cli.altitude);
    let state = periapsis_state(mu, rp, ra, cli.inclination, cli.raan)?;
    let request = build_request(&cli, &state, mu, radius)?;

    let maneuvers = plan(&state, &request, mu, 0.0)?;
    println!("=== {} about {} ===", cli.kind, primary.config.name);
    let mut total = 0.0;
    for (index, maneuver) in maneuvers.iter().enumerate() {
        let frame = match maneuver.frame {
            ManeuverFrame::Inertial => "inertial",
            ManeuverFrame::Local => "local",
        };
        let dv = maneuver.delta_v_km_s;
        println!(
            "Burn {} : t = {:.1} s, Δv = [{:.4}, {:.4}, {:.4}] km/s ({}), |Δv| = {:.4} km/s",
            index + 1,
            maneuver.execution_time_s,
            dv[0],
            dv[1],
            dv[2],
            frame,
            maneuver.magnitude_km_s()
        );
        total += maneuver.magnitude_km_s();
    }
    println!("Total Δv : {:.4} km/s", total);

    if cli.execute {
        let config = load_settings(cli.config.as_deref())?;
        let propagator = OrbitPropagator::new(PropagationSettings::from_config(&config));
        let bodies = [primary.body];
        let forces = ForceModel::gravity_only(&bodies, radius);
        let outcome = propagator.execute_maneuvers(&state, 0.0, &maneuvers, &forces)?;
        let elements = OrbitalElements::from_state(&outcome.state, mu, Some(radius))?;
        println!("=== After final burn (t = {:.1} s) ===", outcome.time_s);
        print_elements(&elements);
    }

    Ok(())
}

fn build_request(
    cli: &Cli,
    state: &StateVector,
    mu: f64,
    radius: f64,
) -> anyhow::Result<ManeuverRequest> {
    let request = match cli.kind {
        ManeuverKind::Hohmann => {
            let target_plane = (cli.target_inclination.is_some() || cli.target_raan.is_some())
                .then(|| PlaneTarget {
                    inclination_deg: cli.target_inclination.unwrap_or(cli.inclination),
                    raan_deg: cli.target_raan.unwrap_or(cli.raan),
                });
            ManeuverRequest::Hohmann {
                target_radius_km: radius + required(cli.target_altitude, "--target-altitude")?,
                target_plane,
            }
        }
        ManeuverKind::Circularize => ManeuverRequest::Circularize {
            timing: cli.timing.into(),
        },
        ManeuverKind::PlaneChange => ManeuverRequest::PlaneChange {
            inclination_deg: cli.target_inclination.unwrap_or(cli.inclination),
            raan_deg: cli.target_raan.unwrap_or(cli.raan),
        },
        ManeuverKind::HohmannIntercept | ManeuverKind::LambertIntercept => {
            let target_radius = radius + required(cli.target_altitude, "--target-altitude")?;
            let target = phased_target(state, target_radius, cli.target_phase, mu);
            if cli.kind == ManeuverKind::HohmannIntercept {
                ManeuverRequest::HohmannIntercept {
                    target_position_km: target.position,
                    target_velocity_km_s: target.velocity,
                }
            } else {
                ManeuverRequest::LambertIntercept {
                    target_position_km: target.position,
                    target_velocity_km_s: target.velocity,
                    time_of_flight_s: required(cli.tof, "--tof")?,
                }
            }
        }
    };
    Ok(request)
}

fn required(value: Option<f64>, flag: &str) -> anyhow::Result<f64> {
    value.ok_or_else(|| anyhow::anyhow!("{flag} is required for this maneuver"))
}

/// Circular target in the chaser's plane, `phase_deg` ahead of the chaser.
fn phased_target(chaser: &StateVector, radius: f64, phase_deg: f64, mu: f64) -> StateVector {
    use orrery::vector::{cross, normalize, scale};

    let r_hat = normalize(&chaser.position);
    let normal = normalize(&chaser.angular_momentum());
    let along = cross(&normal, &r_hat);
    let (s, c) = phase_deg.to_radians().sin_cos();
    let direction = [
        c * r_hat[0] + s * along[0],
        c * r_hat[1] + s * along[1],
        c * r_hat[2] + s * along[2],
    ];
    let tangent = cross(&normal, &direction);
    StateVector::new(scale(&direction, radius), scale(&tangent, (mu / radius).sqrt()))
}
