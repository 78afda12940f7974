use std::time::Duration;

use spin_cubes::grid::GridConfig;

fn demo_config() -> GridConfig {
    // Written out explicitly so the assertions hold regardless of the
    // `benchmark` feature flag.
    GridConfig {
        half_extent: 1.0,
        step: 1.0,
        scale: 0.25,
        spin_rate: 0.002,
    }
}

#[test]
fn unit_step_yields_a_three_by_three_grid() {
    let config = demo_config();
    assert_eq!(config.cells_per_axis(), 3);

    let positions = config.cell_positions();
    assert_eq!(positions.len(), 9);

    let expected = [-1.0f32, 0.0, 1.0];
    for x in expected {
        for y in expected {
            assert!(
                positions
                    .iter()
                    .any(|p| p.x == x && p.y == y && p.z == 0.0),
                "missing cell at ({}, {})",
                x,
                y
            );
        }
    }
}

#[test]
fn benchmark_step_has_no_floating_point_drift_at_the_edges() {
    let config = GridConfig {
        step: 0.01,
        ..demo_config()
    };
    assert_eq!(config.cells_per_axis(), 201);

    let positions = config.cell_positions();
    assert_eq!(positions.len(), 201 * 201);

    // The first and last cell of each axis must land on the extent, not one
    // step short of it or past it.
    let min_x = positions.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
    let max_x = positions
        .iter()
        .map(|p| p.x)
        .fold(f32::NEG_INFINITY, f32::max);
    assert_eq!(min_x, -1.0);
    assert!((max_x - 1.0).abs() < 1e-5);
}

#[test]
fn spin_angle_starts_at_zero() {
    let config = demo_config();
    assert_eq!(config.spin_angle(Duration::ZERO).0, 0.0);
}

#[test]
fn spin_angle_grows_with_elapsed_time() {
    let config = demo_config();

    // 0.002 rad/ms: one second in equals 2 radians.
    let one_second = config.spin_angle(Duration::from_secs(1)).0;
    assert!((one_second - 2.0).abs() < 1e-6);

    let mut previous = 0.0;
    for millis in (0..3000).step_by(16) {
        let angle = config.spin_angle(Duration::from_millis(millis)).0;
        assert!(
            angle >= previous,
            "angle regressed before the wrap: {} -> {}",
            previous,
            angle
        );
        previous = angle;
    }
}

#[test]
fn spin_angle_wraps_at_two_pi() {
    let config = demo_config();
    // 0.002 rad/ms wraps every pi seconds; an hour in it must still be
    // inside [0, 2*pi).
    let angle = config.spin_angle(Duration::from_secs(3600)).0;
    assert!(angle >= 0.0);
    assert!(angle < std::f32::consts::TAU);
}
