use cgmath::{Deg, Matrix3, Matrix4, Quaternion, Rad, Rotation3, SquareMatrix, Vector3, Vector4};
use spin_cubes::camera::{Camera, Projection};
use spin_cubes::instance::{Instance, normal_matrix, upper_left};

const EPS: f32 = 1e-5;

fn assert_mat3_eq(a: Matrix3<f32>, b: Matrix3<f32>) {
    for col in 0..3 {
        for row in 0..3 {
            assert!(
                (a[col][row] - b[col][row]).abs() < EPS,
                "matrices differ at [{}][{}]: {} vs {}",
                col,
                row,
                a[col][row],
                b[col][row]
            );
        }
    }
}

#[test]
fn view_times_model_puts_the_origin_instance_at_minus_four_z() {
    let camera = Camera::default();
    let mut instance = Instance::new();
    instance.scale = Vector3::new(0.25, 0.25, 0.25);

    let model_view = camera.view_matrix() * instance.to_matrix();

    // Composition order sanity check: view * model, not model * view. The
    // translation column must carry the camera offset untouched by scale.
    assert!((model_view.w.z - -4.0).abs() < EPS);
    assert!((model_view.w.x - 0.0).abs() < EPS);
    assert!((model_view.w.y - 0.0).abs() < EPS);
}

#[test]
fn grid_offsets_survive_the_view_transform() {
    let camera = Camera::default();
    let mut instance = Instance::new();
    instance.position = Vector3::new(1.0, -1.0, 0.0);
    instance.scale = Vector3::new(0.25, 0.25, 0.25);

    let model_view = camera.view_matrix() * instance.to_matrix();
    assert!((model_view.w.x - 1.0).abs() < EPS);
    assert!((model_view.w.y - -1.0).abs() < EPS);
    assert!((model_view.w.z - -4.0).abs() < EPS);
}

#[test]
fn normal_matrix_is_the_rotation_for_rigid_transforms() {
    let rotation = Quaternion::from_angle_y(Rad(0.7));
    let model = Matrix4::from(rotation);

    assert_mat3_eq(normal_matrix(&model), Matrix3::from(rotation));
}

#[test]
fn normal_matrix_differs_from_upper_left_under_non_uniform_scale() {
    let model = Matrix4::from_nonuniform_scale(1.0, 2.0, 1.0);

    let linear = upper_left(&model);
    let normal = normal_matrix(&model);

    // Inverse-transpose of diag(1, 2, 1) is diag(1, 0.5, 1).
    assert!((normal[1][1] - 0.5).abs() < EPS);
    assert!((linear[1][1] - 2.0).abs() < EPS);

    // The regression guard proper: the two must not be interchangeable.
    let mut identical = true;
    for col in 0..3 {
        for row in 0..3 {
            if (normal[col][row] - linear[col][row]).abs() > EPS {
                identical = false;
            }
        }
    }
    assert!(
        !identical,
        "normal matrix was reused verbatim from the model-view"
    );
}

#[test]
fn normal_matrix_handles_uniform_scale() {
    let model = Matrix4::from_scale(0.25);
    // Inverse-transpose of diag(s) is diag(1/s); direction is preserved and
    // the shader renormalizes the magnitude.
    assert_mat3_eq(normal_matrix(&model), Matrix3::from_value(4.0));
}

#[test]
fn normal_matrix_survives_a_singular_model() {
    let model = Matrix4::from_nonuniform_scale(1.0, 0.0, 1.0);
    // Falls back to the untransformed linear part instead of NaN.
    assert_mat3_eq(normal_matrix(&model), upper_left(&model));
}

#[test]
fn projection_maps_the_grid_into_wgpu_clip_space() {
    let camera = Camera::default();
    let projection = Projection::default();
    assert_eq!(projection.aspect, 1.0);

    let view_proj = projection.matrix() * camera.view_matrix();
    let clip = view_proj * Vector4::new(0.0, 0.0, 0.0, 1.0);

    // A cube at the grid origin sits 4 units in front of the camera, well
    // inside the 0.1..100.0 depth range.
    assert!((clip.w - 4.0).abs() < EPS);
    let ndc_z = clip.z / clip.w;
    assert!(ndc_z > 0.0 && ndc_z < 1.0, "depth out of range: {}", ndc_z);
}

#[test]
fn instance_model_matrix_composes_translate_rotate_scale() {
    let mut instance = Instance::new();
    instance.position = Vector3::new(1.0, 0.0, 0.0);
    instance.rotation = Quaternion::from_angle_y(Deg(90.0));
    instance.scale = Vector3::new(0.25, 0.25, 0.25);

    let model = instance.to_matrix();

    // A unit +x vertex rotates onto -z, shrinks, then translates.
    let transformed = model * Vector4::new(1.0, 0.0, 0.0, 1.0);
    assert!((transformed.x - 1.0).abs() < EPS);
    assert!((transformed.y - 0.0).abs() < EPS);
    assert!((transformed.z - -0.25).abs() < EPS);

    // Identity instance stays put.
    let identity = Instance::new().to_matrix();
    assert!(identity.is_identity());
}
