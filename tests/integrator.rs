use std::f64::consts::TAU;

use orrery::elements::advance_state;
use orrery::forces::ForceModel;
use orrery::integrator::{
    Acceleration, AdaptiveIntegrator, FixedStepIntegrator, IntegrationError, IntegratorSettings,
    euler_step,
};
use orrery::vector::{self, Vector3, ZERO};
use orrery::{Body, StateVector};

const MU_EARTH: f64 = 398_600.4418;

fn circular_state(radius: f64, mu: f64) -> StateVector {
    StateVector::new([radius, 0.0, 0.0], [0.0, (mu / radius).sqrt(), 0.0])
}

fn period(a: f64, mu: f64) -> f64 {
    TAU * (a.powi(3) / mu).sqrt()
}

#[test]
fn circular_leo_closes_after_one_period() {
    let bodies = [Body::from_mu(ZERO, MU_EARTH)];
    let forces = ForceModel::gravity_only(&bodies, 6378.0);
    let mu = bodies[0].mu();
    let start = circular_state(6778.0, mu);

    let out = AdaptiveIntegrator::default()
        .integrate(&start, period(6778.0, mu), &forces)
        .unwrap();

    let dr = vector::norm(&vector::sub(&out.state.position, &start.position));
    let dv = vector::norm(&vector::sub(&out.state.velocity, &start.velocity));
    assert!(dr < 0.5, "position closure {dr} km");
    assert!(dv < 1e-3, "velocity closure {dv} km/s");
    assert!(out.stats.accepted_steps > 100);
    assert_eq!(
        out.stats.acceleration_evaluations,
        2 * (out.stats.accepted_steps + out.stats.rejected_steps)
    );

    let energy_drift = (out.state.specific_energy(mu) - start.specific_energy(mu)).abs();
    assert!(energy_drift < 1e-4 * start.specific_energy(mu).abs());
}

#[test]
fn eccentric_orbit_closes_with_tight_relative_tolerance() {
    let bodies = [Body::from_mu(ZERO, MU_EARTH)];
    let forces = ForceModel::gravity_only(&bodies, 6378.0);
    let mu = bodies[0].mu();
    let (rp, ra) = (7000.0, 13000.0);
    let a = 0.5 * (rp + ra);
    let start = StateVector::new([rp, 0.0, 0.0], [0.0, (mu * (2.0 / rp - 1.0 / a)).sqrt(), 0.0]);

    let integrator = AdaptiveIntegrator::new(IntegratorSettings {
        rel_tol: 1e-7,
        ..IntegratorSettings::default()
    });
    let out = integrator.integrate(&start, period(a, mu), &forces).unwrap();
    let dr = vector::norm(&vector::sub(&out.state.position, &start.position));
    assert!(dr < 1.0, "position closure {dr} km");
}

#[test]
fn tighter_tolerance_costs_steps_and_buys_accuracy() {
    let bodies = [Body::from_mu(ZERO, MU_EARTH)];
    let forces = ForceModel::gravity_only(&bodies, 6378.0);
    let mu = bodies[0].mu();
    let (rp, ra) = (7000.0, 13000.0);
    let a = 0.5 * (rp + ra);
    let start = StateVector::new([rp, 0.0, 0.0], [0.0, (mu * (2.0 / rp - 1.0 / a)).sqrt(), 0.0]);
    let reference = advance_state(&start, 1200.0, mu).unwrap();

    let run = |tol: f64| {
        let integrator = AdaptiveIntegrator::new(IntegratorSettings {
            abs_tol: tol,
            rel_tol: tol,
            ..IntegratorSettings::default()
        });
        let out = integrator.integrate(&start, 1200.0, &forces).unwrap();
        let error = vector::norm(&vector::sub(&out.state.position, &reference.position));
        (error, out.stats.accepted_steps)
    };

    let (loose_error, loose_steps) = run(1e-4);
    let (tight_error, tight_steps) = run(1e-8);
    assert!(tight_steps > loose_steps);
    assert!(tight_error < loose_error, "{tight_error} vs {loose_error}");
    assert!(tight_error < 1e-3);
}

#[test]
fn zero_duration_returns_input_and_negative_is_rejected() {
    let bodies = [Body::from_mu(ZERO, MU_EARTH)];
    let forces = ForceModel::gravity_only(&bodies, 6378.0);
    let start = circular_state(7000.0, MU_EARTH);
    let integrator = AdaptiveIntegrator::default();

    let out = integrator.integrate(&start, 0.0, &forces).unwrap();
    assert_eq!(out.state, start);
    assert_eq!(out.stats.accepted_steps, 0);

    assert_eq!(
        integrator.integrate(&start, -1.0, &forces).unwrap_err(),
        IntegrationError::InvalidDuration(-1.0)
    );
    assert!(matches!(
        integrator.integrate(&start, f64::NAN, &forces),
        Err(IntegrationError::InvalidDuration(_))
    ));
}

#[test]
fn final_step_lands_on_requested_duration() {
    struct Free;
    impl Acceleration for Free {
        fn acceleration(&self, _: &Vector3, _: &Vector3) -> Vector3 {
            ZERO
        }
    }
    let start = StateVector::new(ZERO, [1.0, 0.0, 0.0]);
    let integrator = AdaptiveIntegrator::new(IntegratorSettings {
        max_step_s: 7.0,
        ..IntegratorSettings::default()
    });
    let out = integrator.integrate(&start, 50.0, &Free).unwrap();
    assert!((out.state.position[0] - 50.0).abs() < 1e-9);
    // 7 s steps then a 1 s remainder
    assert_eq!(out.stats.accepted_steps, 8);
    assert!((out.stats.last_step_s - 1.0).abs() < 1e-9);
}

#[test]
fn step_budget_is_enforced() {
    let bodies = [Body::from_mu(ZERO, MU_EARTH)];
    let forces = ForceModel::gravity_only(&bodies, 6378.0);
    let start = circular_state(6778.0, MU_EARTH);
    let integrator = AdaptiveIntegrator::new(IntegratorSettings {
        max_steps: 3,
        ..IntegratorSettings::default()
    });
    let err = integrator.integrate(&start, 5000.0, &forces).unwrap_err();
    assert!(matches!(err, IntegrationError::MaxStepsExceeded { max_steps: 3, .. }));
}

#[test]
fn invalid_settings_are_rejected_before_stepping() {
    let bodies = [Body::from_mu(ZERO, MU_EARTH)];
    let forces = ForceModel::gravity_only(&bodies, 6378.0);
    let start = circular_state(6778.0, MU_EARTH);
    for settings in [
        IntegratorSettings {
            abs_tol: 0.0,
            ..IntegratorSettings::default()
        },
        IntegratorSettings {
            min_step_s: 10.0,
            max_step_s: 1.0,
            ..IntegratorSettings::default()
        },
        IntegratorSettings {
            max_steps: 0,
            ..IntegratorSettings::default()
        },
    ] {
        let err = AdaptiveIntegrator::new(settings)
            .integrate(&start, 10.0, &forces)
            .unwrap_err();
        assert!(matches!(err, IntegrationError::InvalidSettings(_)));
    }
}

#[test]
fn singular_field_stagnates() {
    struct Blowup;
    impl Acceleration for Blowup {
        fn acceleration(&self, _: &Vector3, _: &Vector3) -> Vector3 {
            [f64::INFINITY, 0.0, 0.0]
        }
    }
    let start = StateVector::new([1.0, 0.0, 0.0], ZERO);
    let err = AdaptiveIntegrator::default()
        .integrate(&start, 10.0, &Blowup)
        .unwrap_err();
    assert!(matches!(err, IntegrationError::Stagnation { .. }));
}

#[test]
fn euler_step_matches_hand_computation() {
    let bodies = [Body::from_mu(ZERO, MU_EARTH)];
    let forces = ForceModel::gravity_only(&bodies, 6378.0);
    let start = circular_state(7000.0, MU_EARTH);
    let a = forces.acceleration(&start.position, &start.velocity);

    let next = euler_step(&start, 1.0, &forces);
    assert_eq!(next.position, vector::add(&start.position, &start.velocity));
    assert_eq!(next.velocity, vector::add(&start.velocity, &a));

    let stepped = FixedStepIntegrator::default().step(&start, &forces);
    assert_eq!(stepped, next);
}
