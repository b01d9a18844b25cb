use std::f64::consts::{PI, TAU};

use orrery::StateVector;
use orrery::elements::{ElementsError, OrbitalElements, advance_state};
use orrery::forces::ForceModel;
use orrery::integrator::AdaptiveIntegrator;
use orrery::maneuver::{
    BurnTiming, Maneuver, ManeuverError, ManeuverFrame, ManeuverKind, ManeuverRequest,
    PlaneTarget, hohmann, orbit_normal, plan, plan_circularization, plan_circularization_at,
    plan_hohmann_intercept, plan_hohmann_plane_change, plan_hohmann_transfer,
    plan_lambert_intercept, plan_plane_change, plane_change_delta_v,
};
use orrery::vector::{self, ZERO};
use orrery::Body;

const MU_EARTH: f64 = 398_600.4418;

fn circular(radius: f64, phase: f64) -> StateVector {
    let speed = (MU_EARTH / radius).sqrt();
    let (s, c) = phase.sin_cos();
    StateVector::new([radius * c, radius * s, 0.0], [-speed * s, speed * c, 0.0])
}

fn period(a: f64) -> f64 {
    TAU * (a.powi(3) / MU_EARTH).sqrt()
}

#[test]
fn hohmann_leo_to_geo_matches_reference_values() {
    let result = hohmann(7000.0, 42_164.0, MU_EARTH).unwrap();
    assert!((result.dv1_km_s - 2.3368).abs() < 1e-3, "dv1 {}", result.dv1_km_s);
    assert!((result.dv2_km_s - 1.4339).abs() < 1e-3, "dv2 {}", result.dv2_km_s);
    assert!((result.tof_seconds - 19_178.15).abs() < 1.0, "tof {}", result.tof_seconds);
    assert!((result.transfer_semi_major_axis_km - 24_582.0).abs() < 1e-9);
    assert!((result.dv_total_km_s - (result.dv1_km_s + result.dv2_km_s)).abs() < 1e-12);
}

#[test]
fn inward_hohmann_mirrors_outward_transfer() {
    let out = hohmann(7000.0, 42_164.0, MU_EARTH).unwrap();
    let back = hohmann(42_164.0, 7000.0, MU_EARTH).unwrap();
    assert!((back.dv1_km_s + out.dv2_km_s).abs() < 1e-12);
    assert!((back.dv2_km_s + out.dv1_km_s).abs() < 1e-12);
    assert!((back.tof_seconds - out.tof_seconds).abs() < 1e-9);
    assert!((back.dv_total_km_s - out.dv_total_km_s).abs() < 1e-12);
}

#[test]
fn hohmann_rejects_non_positive_inputs() {
    for (r1, r2, mu) in [(0.0, 7000.0, MU_EARTH), (7000.0, -1.0, MU_EARTH), (7000.0, 8000.0, 0.0)] {
        assert!(matches!(hohmann(r1, r2, mu), Err(ManeuverError::InvalidRequest(_))));
    }
}

#[test]
fn planned_hohmann_burns_are_prograde_and_half_a_transfer_apart() {
    let start = circular(7000.0, 0.0);
    let [first, second] = plan_hohmann_transfer(&start, 42_164.0, MU_EARTH, 100.0).unwrap();
    let reference = hohmann(7000.0, 42_164.0, MU_EARTH).unwrap();

    assert_eq!(first.frame, ManeuverFrame::Local);
    assert_eq!(first.execution_time_s, 100.0);
    assert!((first.delta_v_km_s[0] - reference.dv1_km_s).abs() < 1e-12);
    assert!((second.execution_time_s - 100.0 - reference.tof_seconds).abs() < 1e-9);

    // two-body coast to apoapsis, then the second burn circularizes
    let after_first = first.apply(&start).unwrap();
    let at_apoapsis = advance_state(&after_first, reference.tof_seconds, MU_EARTH).unwrap();
    assert!((at_apoapsis.radius() - 42_164.0).abs() < 1e-3);
    let final_state = second.apply(&at_apoapsis).unwrap();
    let elements = OrbitalElements::from_state(&final_state, MU_EARTH, None).unwrap();
    assert!(elements.eccentricity < 1e-6, "e = {}", elements.eccentricity);
}

#[test]
fn circularization_now_matches_circular_speed() {
    // periapsis of a 7000 x 13000 km ellipse, halfway to apoapsis in true anomaly
    let a = 10_000.0;
    let start = StateVector::new(
        [7000.0, 0.0, 0.0],
        [0.0, (MU_EARTH * (2.0 / 7000.0 - 1.0 / a)).sqrt(), 0.0],
    );
    let state = advance_state(&start, 0.25 * period(a), MU_EARTH).unwrap();

    let burn = plan_circularization(&state, MU_EARTH, 0.0).unwrap();
    let expected = (MU_EARTH / state.radius()).sqrt() - state.speed();
    assert!((burn.delta_v_km_s[0] - expected).abs() < 1e-12);
    assert_eq!(burn.execution_time_s, 0.0);
}

#[test]
fn circularization_at_apoapsis_waits_half_an_orbit_from_periapsis() {
    let (rp, ra) = (7000.0, 13_000.0);
    let a = 0.5 * (rp + ra);
    let speed = (MU_EARTH * (2.0 / rp - 1.0 / a)).sqrt();
    let start = StateVector::new([rp, 0.0, 0.0], [0.0, speed, 0.0]);

    let burn = plan_circularization_at(&start, MU_EARTH, 50.0, BurnTiming::Apoapsis).unwrap();
    assert!((burn.execution_time_s - 50.0 - 0.5 * period(a)).abs() < 1e-6);

    let v_apo = (MU_EARTH * (2.0 / ra - 1.0 / a)).sqrt();
    let expected = (MU_EARTH / ra).sqrt() - v_apo;
    assert!((burn.delta_v_km_s[0] - expected).abs() < 1e-9);

    let at_apoapsis = advance_state(&start, 0.5 * period(a), MU_EARTH).unwrap();
    let circular = burn.apply(&at_apoapsis).unwrap();
    let elements = OrbitalElements::from_state(&circular, MU_EARTH, None).unwrap();
    assert!(elements.eccentricity < 1e-6);

    let periapsis = plan_circularization_at(&start, MU_EARTH, 0.0, BurnTiming::Periapsis).unwrap();
    assert!(periapsis.execution_time_s.abs() < 1e-9);
}

#[test]
fn apoapsis_circularization_of_escape_trajectory_is_refused() {
    let escape = StateVector::new([7000.0, 0.0, 0.0], [0.0, 12.0, 0.0]);
    assert!(matches!(
        plan_circularization_at(&escape, MU_EARTH, 0.0, BurnTiming::Apoapsis),
        Err(ManeuverError::InvalidRequest(_))
    ));
}

#[test]
fn plane_change_burns_at_next_node_with_rotation_delta_v() {
    let start = circular(7000.0, PI / 2.0);
    let speed = start.speed();
    let target = orbit_normal(30f64.to_radians(), 0.0);

    let burn = plan_plane_change(&start, &target, MU_EARTH, 0.0).unwrap();
    assert_eq!(burn.frame, ManeuverFrame::Inertial);
    // descending toward the −x node, a quarter orbit away
    assert!((burn.execution_time_s - 0.25 * period(7000.0)).abs() < 1e-6);
    let expected = 2.0 * speed * 15f64.to_radians().sin();
    assert!((burn.magnitude_km_s() - expected).abs() < 1e-9);

    let at_node = advance_state(&start, burn.execution_time_s, MU_EARTH).unwrap();
    let rotated = burn.apply(&at_node).unwrap();
    let normal = vector::normalize(&rotated.angular_momentum());
    assert!(vector::angle_between(&normal, &target) < 1e-6);
    assert!((rotated.speed() - speed).abs() < 1e-6);
}

#[test]
fn coplanar_plane_change_is_free() {
    let start = circular(7000.0, 0.3);
    let burn = plan_plane_change(&start, &[0.0, 0.0, 1.0], MU_EARTH, 10.0).unwrap();
    assert_eq!(burn.execution_time_s, 10.0);
    assert!(burn.magnitude_km_s() < 1e-12);
}

#[test]
fn plane_change_cost_uses_angle_between_plane_normals() {
    let speed = 7.5;
    let (i1, i2) = (28.5f64.to_radians(), 51.6f64.to_radians());
    let delta_raan = 40f64.to_radians();
    let current = orbit_normal(i1, 0.0);
    let target = orbit_normal(i2, delta_raan);

    let cos_angle = i1.cos() * i2.cos() + i1.sin() * i2.sin() * delta_raan.cos();
    let expected = 2.0 * speed * (0.5 * cos_angle.acos()).sin();
    let dv = plane_change_delta_v(&current, &target, speed);
    assert!((dv - expected).abs() < 1e-12, "dv {dv} expected {expected}");

    // subtracting inclinations alone underestimates the rotation
    let inclination_only = 2.0 * speed * (0.5 * (i2 - i1)).sin();
    assert!(dv - inclination_only > 0.5);

    assert_eq!(plane_change_delta_v(&current, &current, speed), 0.0);
    let same_inclination = orbit_normal(i1, delta_raan);
    assert!(plane_change_delta_v(&current, &same_inclination, speed) > 0.1);
}

#[test]
fn hohmann_with_plane_change_folds_rotation_into_arrival_burn() {
    let start = circular(7000.0, PI / 2.0);
    let r2 = 42_164.0;
    let target = orbit_normal(30f64.to_radians(), 0.0);
    let plan = plan_hohmann_plane_change(&start, r2, &target, MU_EARTH, 0.0).unwrap();
    let [first, second] = plan.maneuvers;
    let reference = hohmann(7000.0, r2, MU_EARTH).unwrap();

    // departs from the −x node a quarter orbit ahead
    assert_eq!(first.frame, ManeuverFrame::Local);
    assert!((first.execution_time_s - 0.25 * period(7000.0)).abs() < 1e-6);
    assert!((first.delta_v_km_s[0] - reference.dv1_km_s).abs() < 1e-9);
    assert_eq!(second.frame, ManeuverFrame::Inertial);
    assert!(
        (second.execution_time_s - first.execution_time_s - reference.tof_seconds).abs() < 1e-6
    );

    let v_circular = (MU_EARTH / r2).sqrt();
    let v_arrival = (MU_EARTH * (2.0 / r2 - 1.0 / reference.transfer_semi_major_axis_km)).sqrt();
    let cos_30 = 30f64.to_radians().cos();
    let combined =
        (v_arrival.powi(2) + v_circular.powi(2) - 2.0 * v_arrival * v_circular * cos_30).sqrt();
    assert!((plan.arrival_delta_v_km_s - combined).abs() < 1e-6);
    assert!((second.magnitude_km_s() - combined).abs() < 1e-6);
    let rotation_only = 2.0 * v_circular * 15f64.to_radians().sin();
    assert!((plan.plane_change_delta_v_km_s - rotation_only).abs() < 1e-12);
    assert!(plan.arrival_delta_v_km_s < reference.dv2_km_s + rotation_only);
    assert!((plan.total_delta_v_km_s() - reference.dv1_km_s - combined).abs() < 1e-6);

    let at_node = advance_state(&start, first.execution_time_s, MU_EARTH).unwrap();
    let transfer = first.apply(&at_node).unwrap();
    let at_apoapsis = advance_state(&transfer, reference.tof_seconds, MU_EARTH).unwrap();
    let final_state = second.apply(&at_apoapsis).unwrap();
    let elements = OrbitalElements::from_state(&final_state, MU_EARTH, None).unwrap();
    assert!(elements.eccentricity < 1e-6, "e = {}", elements.eccentricity);
    assert!((elements.semi_major_axis_km - r2).abs() < 1e-2);
    let normal = vector::normalize(&final_state.angular_momentum());
    assert!(vector::angle_between(&normal, &target) < 1e-6);
}

#[test]
fn coplanar_hohmann_with_plane_target_departs_immediately() {
    let start = circular(7000.0, 0.0);
    let plan = plan_hohmann_plane_change(&start, 10_000.0, &[0.0, 0.0, 1.0], MU_EARTH, 5.0)
        .unwrap();
    let reference = hohmann(7000.0, 10_000.0, MU_EARTH).unwrap();
    assert_eq!(plan.maneuvers[0].execution_time_s, 5.0);
    assert!(plan.plane_change_delta_v_km_s.abs() < 1e-12);
    assert!((plan.arrival_delta_v_km_s - reference.dv2_km_s).abs() < 1e-9);
}

#[test]
fn hohmann_intercept_arrives_at_target_position() {
    let chaser = circular(7000.0, 0.0);
    let target = circular(10_000.0, 60f64.to_radians());
    let plan = plan_hohmann_intercept(&chaser, &target, MU_EARTH, 0.0).unwrap();
    let transfer = hohmann(7000.0, 10_000.0, MU_EARTH).unwrap();

    assert!(plan.departure_time_s >= 0.0);
    let synodic = TAU / ((MU_EARTH / 7000f64.powi(3)).sqrt() - (MU_EARTH / 1.0e12).sqrt());
    assert!(plan.departure_time_s < synodic);
    assert!((plan.arrival_time_s - plan.departure_time_s - transfer.tof_seconds).abs() < 1e-9);
    assert!((plan.total_delta_v_km_s - transfer.dv_total_km_s).abs() < 1e-12);

    let [departure, arrival] = plan.maneuvers;
    let at_departure = advance_state(&chaser, departure.execution_time_s, MU_EARTH).unwrap();
    let coasting = departure.apply(&at_departure).unwrap();
    let chaser_at_arrival = advance_state(&coasting, transfer.tof_seconds, MU_EARTH).unwrap();
    let target_at_arrival = advance_state(&target, arrival.execution_time_s, MU_EARTH).unwrap();

    let miss = vector::norm(&vector::sub(&chaser_at_arrival.position, &target_at_arrival.position));
    assert!(miss < 1.0, "miss distance {miss} km");
    let matched = arrival.apply(&chaser_at_arrival).unwrap();
    let residual = vector::norm(&vector::sub(&matched.velocity, &target_at_arrival.velocity));
    assert!(residual < 1e-3, "velocity residual {residual} km/s");
}

#[test]
fn hohmann_intercept_needs_distinct_radii() {
    let chaser = circular(7000.0, 0.0);
    let target = circular(7000.0, 1.0);
    assert!(matches!(
        plan_hohmann_intercept(&chaser, &target, MU_EARTH, 0.0),
        Err(ManeuverError::InvalidRequest(_))
    ));
}

#[test]
fn lambert_intercept_meets_target_after_time_of_flight() {
    let chaser = circular(7000.0, 0.0);
    let target = circular(10_000.0, 60f64.to_radians());
    let tof = 3000.0;
    let plan = plan_lambert_intercept(&chaser, &target, tof, MU_EARTH, 20.0).unwrap();

    assert_eq!(plan.departure_time_s, 20.0);
    assert_eq!(plan.arrival_time_s, 20.0 + tof);
    assert!(plan.total_delta_v_km_s.is_finite() && plan.total_delta_v_km_s > 0.0);

    let bodies = [Body::from_mu(ZERO, MU_EARTH)];
    let forces = ForceModel::gravity_only(&bodies, 6378.0);
    let departed = plan.maneuvers[0].apply(&chaser).unwrap();
    let coast = AdaptiveIntegrator::default()
        .integrate(&departed, tof, &forces)
        .unwrap();
    let target_at_arrival = advance_state(&target, tof, MU_EARTH).unwrap();

    let miss = vector::norm(&vector::sub(&coast.state.position, &target_at_arrival.position));
    assert!(miss < 1.0, "miss distance {miss} km");
    let matched = plan.maneuvers[1].apply(&coast.state).unwrap();
    let residual = vector::norm(&vector::sub(&matched.velocity, &target_at_arrival.velocity));
    assert!(residual < 1e-2, "velocity residual {residual} km/s");
}

#[test]
fn lambert_intercept_rejects_non_positive_time_of_flight() {
    let chaser = circular(7000.0, 0.0);
    let target = circular(10_000.0, 1.0);
    assert!(matches!(
        plan_lambert_intercept(&chaser, &target, 0.0, MU_EARTH, 0.0),
        Err(ManeuverError::InvalidRequest(_))
    ));
}

#[test]
fn degenerate_state_surfaces_elements_error() {
    let radial = StateVector::new([7000.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
    let err = plan_hohmann_transfer(&radial, 8000.0, MU_EARTH, 0.0).unwrap_err();
    assert!(matches!(
        err,
        ManeuverError::Elements(ElementsError::DegenerateOrbit { .. })
    ));
}

#[test]
fn requests_parse_from_yaml_and_dispatch() {
    let request: ManeuverRequest =
        serde_yaml::from_str("type: hohmann\ntarget_radius_km: 42164.0\n").unwrap();
    assert_eq!(request.kind(), Some(ManeuverKind::Hohmann));
    let burns = plan(&circular(7000.0, 0.0), &request, MU_EARTH, 0.0).unwrap();
    assert_eq!(burns.len(), 2);

    let request: ManeuverRequest = serde_yaml::from_str(
        "type: hohmann\ntarget_radius_km: 42164.0\ntarget_plane:\n  inclination_deg: 30.0\n  raan_deg: 0.0\n",
    )
    .unwrap();
    assert_eq!(
        request,
        ManeuverRequest::Hohmann {
            target_radius_km: 42_164.0,
            target_plane: Some(PlaneTarget {
                inclination_deg: 30.0,
                raan_deg: 0.0,
            }),
        }
    );
    let burns = plan(&circular(7000.0, PI / 2.0), &request, MU_EARTH, 0.0).unwrap();
    assert_eq!(burns.len(), 2);
    assert_eq!(burns[1].frame, ManeuverFrame::Inertial);
    assert!((burns[0].execution_time_s - 0.25 * period(7000.0)).abs() < 1e-6);

    let request: ManeuverRequest = serde_yaml::from_str("type: circularize\n").unwrap();
    assert_eq!(request, ManeuverRequest::Circularize { timing: BurnTiming::Immediate });

    let request: ManeuverRequest =
        serde_yaml::from_str("type: circularize\ntiming: apoapsis\n").unwrap();
    assert_eq!(request, ManeuverRequest::Circularize { timing: BurnTiming::Apoapsis });

    let request: ManeuverRequest =
        serde_yaml::from_str("type: plane_change\ninclination_deg: 28.5\nraan_deg: 0.0\n")
            .unwrap();
    assert_eq!(plan(&circular(7000.0, 0.0), &request, MU_EARTH, 0.0).unwrap().len(), 1);
}

#[test]
fn unknown_request_types_are_rejected() {
    let request: ManeuverRequest = serde_yaml::from_str("type: bi_elliptic\n").unwrap();
    assert_eq!(request, ManeuverRequest::Unsupported);
    assert_eq!(request.kind(), None);
    assert!(matches!(
        plan(&circular(7000.0, 0.0), &request, MU_EARTH, 0.0),
        Err(ManeuverError::InvalidRequest(_))
    ));
    assert!(matches!(
        "warp".parse::<ManeuverKind>(),
        Err(ManeuverError::InvalidRequest(_))
    ));
    for kind in ManeuverKind::ALL {
        assert_eq!(kind.to_string().parse::<ManeuverKind>().unwrap(), kind);
    }
}

#[test]
fn maneuvers_deserialize_with_default_frame() {
    let burn: Maneuver =
        serde_yaml::from_str("execution_time_s: 5.0\ndelta_v_km_s: [0.1, 0.0, 0.0]\n").unwrap();
    assert_eq!(burn, Maneuver::inertial(5.0, [0.1, 0.0, 0.0]));
}
