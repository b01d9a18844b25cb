use assert_cmd::Command;
use predicates::prelude::*;

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/bodies");
const SETTINGS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/propagation.toml");

#[test]
fn propagate_circular_leo_completes() {
    Command::cargo_bin("propagate")
        .expect("propagate bin")
        .args(["--catalog", CATALOG, "--config", SETTINGS, "--points", "36"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Initial orbit about Earth ==="))
        .stdout(predicate::str::contains("Samples        : 37"))
        .stdout(predicate::str::is_match(r"Duration       : \d+\.\d s \(0\.\d{3} d\)").unwrap())
        .stdout(predicate::str::contains("Termination    : completed"))
        .stdout(predicate::str::contains("=== Final orbit ==="));
}

#[test]
fn propagate_with_catalog_perturbers() {
    Command::cargo_bin("propagate")
        .expect("propagate bin")
        .args([
            "--catalog",
            CATALOG,
            "--points",
            "36",
            "--perturbers",
            "Moon,Sun",
            "--epoch-offset-days",
            "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Perturbers     : Moon, Sun"))
        .stdout(predicate::str::contains("Termination    : completed"));
}

#[test]
fn propagate_rejects_primary_as_its_own_perturber() {
    Command::cargo_bin("propagate")
        .expect("propagate bin")
        .args(["--catalog", CATALOG, "--perturbers", "earth"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot perturb itself"));
}

#[test]
fn hohmann_with_target_inclination_prints_inertial_arrival_burn() {
    Command::cargo_bin("maneuver")
        .expect("maneuver bin")
        .args([
            "--catalog",
            CATALOG,
            "--kind",
            "hohmann",
            "--altitude",
            "400",
            "--inclination",
            "28.5",
            "--target-altitude",
            "35786",
            "--target-inclination",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Burn 1"))
        .stdout(predicate::str::contains("(inertial)"));
}

#[test]
fn propagate_reports_moon_orbit_without_atmosphere() {
    Command::cargo_bin("propagate")
        .expect("propagate bin")
        .args([
            "--catalog",
            CATALOG,
            "--body",
            "moon",
            "--altitude",
            "100",
            "--apoapsis-altitude",
            "300",
            "--points",
            "24",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("about Moon"))
        .stdout(predicate::str::contains("SOI"))
        .stdout(predicate::str::contains("Termination    : completed"));
}

#[test]
fn propagate_rejects_unknown_body() {
    Command::cargo_bin("propagate")
        .expect("propagate bin")
        .args(["--catalog", CATALOG, "--body", "Vulcan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vulcan"));
}

#[test]
fn maneuver_plans_hohmann_to_geostationary() {
    Command::cargo_bin("maneuver")
        .expect("maneuver bin")
        .args([
            "--catalog",
            CATALOG,
            "--kind",
            "hohmann",
            "--target-altitude",
            "35786",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Burn 1"))
        .stdout(predicate::str::contains("Burn 2"))
        .stdout(predicate::str::contains("Total Δv"));
}

#[test]
fn maneuver_executes_circularization_at_apoapsis() {
    Command::cargo_bin("maneuver")
        .expect("maneuver bin")
        .args([
            "--catalog",
            CATALOG,
            "--kind",
            "circularize",
            "--apoapsis-altitude",
            "2000",
            "--timing",
            "apoapsis",
            "--execute",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== After final burn"));
}

#[test]
fn maneuver_requires_target_altitude_for_hohmann() {
    Command::cargo_bin("maneuver")
        .expect("maneuver bin")
        .args(["--catalog", CATALOG, "--kind", "hohmann"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--target-altitude"));
}

#[test]
fn maneuver_rejects_unknown_kind() {
    Command::cargo_bin("maneuver")
        .expect("maneuver bin")
        .args(["--catalog", CATALOG, "--kind", "bi-elliptic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown maneuver type"));
}
