use crate::hover::cosmic::{AsteroidConfig, AsteroidError};
use crate::hover::mc::helpers::sample_point_outside_ellipsoid;
use crate::hover::mc::Pcg64Mcg;
use crate::hover::Asteroid;
use crate::na::Vector3;
use rand::SeedableRng;
use rstest::*;

#[fixture]
fn asteroid() -> Asteroid {
    crate::elongated_asteroid()
}

fn outward_normal(semi_axes: &Vector3<f64>, x: &Vector3<f64>) -> Vector3<f64> {
    x.component_div(&semi_axes.component_mul(semi_axes)).normalize()
}

#[rstest]
fn round_trip_along_normal(asteroid: Asteroid) {
    let _ = pel::try_init();
    let axes = asteroid.semi_axes();
    let mut rng = Pcg64Mcg::seed_from_u64(11);
    for _ in 0..200 {
        // A random surface point, then a point above it along the normal
        let x = sample_point_outside_ellipsoid(&axes, 1.0, &mut rng).unwrap();
        for height in [0.0, 1.0, 250.0] {
            let p = x + height * outward_normal(&axes, &x);
            let (distance, nearest) = asteroid.distance_to_surface_at_position(&p).unwrap();
            assert!((distance - height).abs() < 1e-6, "{distance} vs {height} at {p}");
            assert!((nearest - x).norm() < 1e-6, "{nearest} vs {x}");
            let h = asteroid.height_at_position(&p).unwrap();
            assert!((h.norm() - height).abs() < 1e-6);
        }
    }
}

#[rstest]
fn nearest_point_is_on_surface_and_nearest(asteroid: Asteroid) {
    let axes = asteroid.semi_axes();
    let mut rng = Pcg64Mcg::seed_from_u64(5);
    for _ in 0..200 {
        let p = sample_point_outside_ellipsoid(&axes, 2.0, &mut rng).unwrap();
        let (distance, x) = asteroid.distance_to_surface_at_position(&p).unwrap();
        assert!((x.component_div(&axes).norm_squared() - 1.0).abs() < 1e-12);
        // The height is along the normal at the nearest point
        if distance > 1.0 {
            let along = (p - x).normalize().dot(&outward_normal(&axes, &x));
            assert!((along - 1.0).abs() < 1e-9);
        }
        // No sampled surface point is closer
        for _ in 0..10 {
            let other = sample_point_outside_ellipsoid(&axes, 1.0, &mut rng).unwrap();
            assert!((p - other).norm() >= distance - 1e-9);
        }
    }
}

#[rstest]
#[case::generic(Vector3::new(-4500.0, 1200.0, -800.0))]
#[case::yz_plane(Vector3::new(0.0, -2500.0, 300.0))]
#[case::xz_plane(Vector3::new(-4200.0, 0.0, -700.0))]
#[case::z_axis(Vector3::new(0.0, 0.0, -3000.0))]
#[case::xy_plane(Vector3::new(3000.0, -2000.0, 0.0))]
#[case::xy_plane_near_center(Vector3::new(-50.0, 20.0, 0.0))]
fn octant_signs_restored(asteroid: Asteroid, #[case] p: Vector3<f64>) {
    let (distance, x) = asteroid.distance_to_surface_at_position(&p).unwrap();
    let (distance_abs, x_abs) = asteroid.distance_to_surface_at_position(&p.abs()).unwrap();
    assert!((distance - distance_abs).abs() < 1e-9);
    for i in 0..3 {
        assert!((x[i].abs() - x_abs[i].abs()).abs() < 1e-9);
        if p[i] != 0.0 {
            assert_eq!(x[i].signum(), p[i].signum(), "component {i} of {x}");
        }
    }
}

#[rstest]
fn bisection_iteration_limit(asteroid: Asteroid) {
    let _ = pel::try_init();
    let starved = asteroid.with_config(AsteroidConfig::builder().max_bisection_iterations(3).build());
    // Generic and in-plane points need the bisection
    for p in [Vector3::new(5000.0, 3000.0, 2000.0), Vector3::new(5000.0, 0.0, 2000.0)] {
        assert!(asteroid.distance_to_surface_at_position(&p).is_ok());
        assert!(matches!(
            starved.distance_to_surface_at_position(&p),
            Err(AsteroidError::NumericalDegeneracy { .. })
        ));
    }
    // Closed forms do not iterate
    let (distance, nearest) = starved.distance_to_surface_at_position(&Vector3::new(0.0, 0.0, 3000.0)).unwrap();
    assert_eq!(nearest, Vector3::new(0.0, 0.0, 1000.0));
    assert_eq!(distance, 2000.0);
    let (_, nearest) = starved.distance_to_surface_at_position(&Vector3::new(100.0, 50.0, 0.0)).unwrap();
    assert!(nearest.z > 0.0);
    assert_eq!(
        nearest,
        asteroid.distance_to_surface_at_position(&Vector3::new(100.0, 50.0, 0.0)).unwrap().1
    );
}
