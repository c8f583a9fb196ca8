use crate::hover::cosmic::AsteroidError;
use crate::hover::Asteroid;
use crate::na::{Matrix3, Vector3};
use rstest::*;

#[fixture]
fn asteroid() -> Asteroid {
    crate::elongated_asteroid()
}

/// Central finite differences of the gravity field, column j is ∂g/∂x_j.
fn gravity_gradient(ast: &Asteroid, p: &Vector3<f64>, h: f64) -> Matrix3<f64> {
    let mut grad = Matrix3::zeros();
    for j in 0..3 {
        let mut dp = Vector3::zeros();
        dp[j] = h;
        let column = (ast.gravity_at_position(&(p + dp)).unwrap()
            - ast.gravity_at_position(&(p - dp)).unwrap())
            / (2.0 * h);
        grad.set_column(j, &column);
    }
    grad
}

#[rstest]
fn end_to_end_long_axis(asteroid: Asteroid) {
    let _ = pel::try_init();
    let p = Vector3::new(5000.0, 0.0, 0.0);
    let g = asteroid.gravity_at_position(&p).unwrap();
    assert!(g.x < 0.0);
    let point_mass = asteroid.gm() / p.norm_squared();
    // An elongated body pulls harder than a point mass along its long axis
    assert!(g.norm() > point_mass && g.norm() < 3.0 * point_mass);
}

#[rstest]
#[case(Vector3::new(5000.0, 1000.0, 500.0))]
#[case(Vector3::new(-300.0, 2600.0, 10.0))]
#[case(Vector3::new(20.0, -30.0, 1200.0))]
#[case(Vector3::new(1.0e5, 2.0e4, -3.0e4))]
fn antisymmetric(asteroid: Asteroid, #[case] p: Vector3<f64>) {
    let g = asteroid.gravity_at_position(&p).unwrap();
    let g_opposite = asteroid.gravity_at_position(&-p).unwrap();
    assert!((g + g_opposite).norm() <= 1e-14 * g.norm());
    // Attractive
    assert!(g.dot(&p) < 0.0);
}

#[rstest]
#[case(Vector3::new(5000.0, 1000.0, 500.0))]
#[case(Vector3::new(-1500.0, 2500.0, 800.0))]
#[case(Vector3::new(300.0, -400.0, 1600.0))]
fn conservative_and_harmonic(asteroid: Asteroid, #[case] p: Vector3<f64>) {
    let grad = gravity_gradient(&asteroid, &p, 0.5);
    let scale = grad.amax();
    // Curl free
    let asym = (grad - grad.transpose()).amax();
    assert!(asym < 1e-5 * scale, "curl {asym:e} vs {scale:e}");
    // Divergence free outside the body
    assert!(grad.trace().abs() < 1e-5 * scale, "divergence {:e} vs {scale:e}", grad.trace());
}

#[rstest]
fn far_field(asteroid: Asteroid) {
    for p in [
        Vector3::new(1.0e7, 0.0, 0.0),
        Vector3::new(-3.0e6, 4.0e6, 1.0e6),
        Vector3::new(0.0, 0.0, -8.0e6),
    ] {
        let g = asteroid.gravity_at_position(&p).unwrap();
        let point_mass = -asteroid.gm() * p / p.norm().powi(3);
        assert!((g - point_mass).norm() < 5e-6 * point_mass.norm());
    }
}

#[rstest]
fn axis_order_invariance() {
    // The same body described with its semi-axes in the reverse order
    let omega = Vector3::new(1e-5, 0.0, 2.9565e-4);
    let forward = crate::elongated_asteroid();
    let reverse = Asteroid::by_axes(Vector3::new(1000.0, 2000.0, 4000.0), 2000.0, omega, 0.0).unwrap();
    let p = Vector3::new(4500.0, -800.0, 300.0);
    let p_rev = Vector3::new(p.z, p.y, p.x);
    let g = forward.gravity_at_position(&p).unwrap();
    let g_rev = reverse.gravity_at_position(&p_rev).unwrap();
    assert!((Vector3::new(g_rev.z, g_rev.y, g_rev.x) - g).norm() < 1e-14 * g.norm());
}

#[rstest]
fn inside_is_rejected(asteroid: Asteroid) {
    for p in [
        Vector3::zeros(),
        Vector3::new(3999.0, 0.0, 0.0),
        Vector3::new(1000.0, 1000.0, 500.0),
    ] {
        assert!(matches!(
            asteroid.gravity_at_position(&p),
            Err(AsteroidError::NumericalDegeneracy { .. })
        ));
    }
}

/// Nearly an oblate spheroid: the two longest semi-axes differ by `4000 - b` meters.
fn nearly_oblate(b: f64) -> Asteroid {
    Asteroid::by_axes(
        Vector3::new(4000.0, b, 1000.0),
        2000.0,
        Vector3::new(1e-5, 0.0, 3e-4),
        0.0,
    )
    .unwrap()
}

#[rstest]
#[case(Vector3::new(5000.0, 3000.0, 500.0))]
#[case(Vector3::new(-2000.0, 4500.0, 800.0))]
#[case(Vector3::new(100.0, -200.0, 1500.0))]
#[case(Vector3::new(4000.0, 0.0, 0.0))]
fn nearly_equal_axes_are_accurate(#[case] p: Vector3<f64>) {
    let _ = pel::try_init();
    // Axes differing by 0.1 µm and by 0.1 mm: the fields must agree to the relative size of that change
    let g_tight = nearly_oblate(3999.9999999).gravity_at_position(&p).unwrap();
    let g_loose = nearly_oblate(3999.9999).gravity_at_position(&p).unwrap();
    assert!(
        (g_tight - g_loose).norm() < 1e-7 * g_loose.norm(),
        "{g_tight} vs {g_loose} at {p}"
    );
    assert!(g_tight.dot(&p) < 0.0);
}

#[rstest]
fn nearly_equal_axes_far_field() {
    let ast = nearly_oblate(3999.9999999);
    let p = Vector3::new(-3.0e6, 4.0e6, 1.0e6);
    let g = ast.gravity_at_position(&p).unwrap();
    let point_mass = -ast.gm() * p / p.norm().powi(3);
    assert!((g - point_mass).norm() < 5e-6 * point_mass.norm());
}
