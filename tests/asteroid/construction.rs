use crate::hover::cosmic::{AsteroidError, Parameterization};
use crate::hover::Asteroid;
use crate::na::Vector3;
use rstest::*;

#[rstest]
#[case::equal_long_axes(Vector3::new(3000.0, 3000.0, 1000.0))]
#[case::equal_short_axes(Vector3::new(3000.0, 1000.0, 1000.0))]
#[case::sphere(Vector3::new(1000.0, 1000.0, 1000.0))]
#[case::negative_axis(Vector3::new(3000.0, -2000.0, 1000.0))]
#[case::y_is_not_intermediate(Vector3::new(2000.0, 3000.0, 1000.0))]
fn invalid_axes(#[case] semi_axes: Vector3<f64>) {
    let _ = pel::try_init();
    let err = Asteroid::by_axes(semi_axes, 2000.0, Vector3::new(1e-4, 0.0, 2e-4), 0.0).unwrap_err();
    assert!(matches!(err, AsteroidError::InvalidConfiguration { .. }), "{err}");
}

#[rstest]
#[case::zero_x(Vector3::new(0.0, 1e-5, 3e-4))]
#[case::zero_z(Vector3::new(3e-4, 1e-5, 0.0))]
#[case::at_rest(Vector3::zeros())]
#[case::not_finite(Vector3::new(f64::NAN, 0.0, 1e-4))]
fn invalid_angular_velocity(#[case] omega: Vector3<f64>) {
    let err = Asteroid::by_axes(Vector3::new(4000.0, 2000.0, 1000.0), 2000.0, omega, 0.0).unwrap_err();
    assert!(matches!(err, AsteroidError::InvalidConfiguration { .. }), "{err}");
}

#[test]
fn invalid_inertia() {
    let omega = Vector3::new(1e-4, 0.0, 2e-4);
    // No ellipsoid has these moments
    assert!(Asteroid::by_inertia(Vector3::new(1.0e15, 2.0e15, 4.0e15), 2000.0, omega, 0.0).is_err());
    // Symmetric top
    assert!(Asteroid::by_inertia(Vector3::new(2.0e15, 3.0e15, 3.0e15), 2000.0, omega, 0.0).is_err());
    assert!(Asteroid::by_inertia(Vector3::new(2.0e15, 3.0e15, 4.0e15), -1.0, omega, 0.0).is_err());
    assert!(Asteroid::by_inertia(Vector3::new(2.0e15, 3.0e15, 4.0e15), 2000.0, omega, f64::INFINITY).is_err());
}

#[test]
fn both_orderings_accepted() {
    let omega = Vector3::new(1e-4, 0.0, 2e-4);
    let descending = Asteroid::by_axes(Vector3::new(4000.0, 2000.0, 1000.0), 2000.0, omega, 0.0).unwrap();
    let ascending = Asteroid::by_axes(Vector3::new(1000.0, 2000.0, 4000.0), 2000.0, omega, 0.0).unwrap();
    assert_eq!(descending.mass(), ascending.mass());
    assert_eq!(descending.parameterization(), Parameterization::ByAxes);
    assert!(descending.inertia().x < descending.inertia().z);
    assert!(ascending.inertia().x > ascending.inertia().z);
}

#[test]
fn inertia_and_axes_agree() {
    let omega = Vector3::new(2e-4, 0.0, 1e-4);
    let by_axes = Asteroid::by_axes(Vector3::new(3500.0, 1800.0, 900.0), 2200.0, omega, 10.0).unwrap();
    let by_inertia = Asteroid::by_inertia(by_axes.inertia(), 2200.0, omega, 10.0).unwrap();

    assert_eq!(by_inertia.parameterization(), Parameterization::ByInertia);
    let rel = (by_inertia.semi_axes() - by_axes.semi_axes()).norm() / by_axes.semi_axes().norm();
    assert!(rel < 1e-12, "semi-axes differ by {rel:e}");
    assert!((by_inertia.mass() - by_axes.mass()).abs() / by_axes.mass() < 1e-12);
    assert!((by_inertia.elliptic_modulus() - by_axes.elliptic_modulus()).abs() < 1e-12);
    assert!((by_inertia.elliptic_tau() - by_axes.elliptic_tau()).abs() / by_axes.elliptic_tau() < 1e-12);
}

#[test]
fn near_degenerate_axes_never_yield_nan() {
    // Distinct to about one part in 1e11
    let ast = Asteroid::by_axes(
        Vector3::new(4000.0, 3999.9999999, 1000.0),
        2000.0,
        Vector3::new(1e-5, 0.0, 3e-4),
        0.0,
    );
    // Either rejected or finite everywhere
    let ast = match ast {
        Ok(ast) => ast,
        Err(e) => {
            assert!(matches!(e, AsteroidError::InvalidConfiguration { .. }));
            return;
        }
    };

    for t in [0.0, 10.0, 3600.0, 86400.0] {
        if let Ok(w) = ast.angular_velocity_at_time(t) {
            assert!(w.iter().all(|v| v.is_finite()));
        }
    }
    for p in [
        Vector3::new(5000.0, 0.0, 0.0),
        Vector3::new(3000.0, 3000.0, 500.0),
        Vector3::new(0.0, 0.0, 1500.0),
    ] {
        match ast.gravity_at_position(&p) {
            Ok(g) => assert!(g.iter().all(|v| v.is_finite())),
            Err(e) => assert!(matches!(e, AsteroidError::NumericalDegeneracy { .. })),
        }
        match ast.distance_to_surface_at_position(&p) {
            Ok((d, x)) => assert!(d.is_finite() && x.iter().all(|v| v.is_finite())),
            Err(e) => assert!(matches!(e, AsteroidError::NumericalDegeneracy { .. })),
        }
    }
}
