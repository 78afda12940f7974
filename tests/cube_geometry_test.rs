use cgmath::{InnerSpace, Vector3};
use spin_cubes::geometry::{
    CubeVertex, INDEX_COUNT, INDICES, NORMALS, POSITIONS, TEX_COORDS, VERTEX_COUNT, interleave,
};

const EPS: f32 = 1e-6;

#[test]
fn normals_are_unit_length_and_point_outward() {
    for i in 0..VERTEX_COUNT {
        let normal = Vector3::from(NORMALS[i]);
        let position = Vector3::from(POSITIONS[i]);

        assert!(
            (normal.magnitude() - 1.0).abs() < EPS,
            "normal {} is not unit length: {:?}",
            i,
            normal
        );
        assert!(
            normal.dot(position.normalize()) > 0.0,
            "normal {} points inward: {:?} at {:?}",
            i,
            normal,
            position
        );
    }
}

#[test]
fn indices_reference_every_vertex_and_nothing_else() {
    let mut referenced = [false; VERTEX_COUNT];
    for &index in INDICES.iter() {
        assert!(
            (index as usize) < VERTEX_COUNT,
            "index {} out of range",
            index
        );
        referenced[index as usize] = true;
    }
    assert!(
        referenced.iter().all(|&r| r),
        "orphan vertices: {:?}",
        referenced
            .iter()
            .enumerate()
            .filter(|(_, r)| !**r)
            .map(|(i, _)| i)
            .collect::<Vec<_>>()
    );
    assert_eq!(INDEX_COUNT % 3, 0);
    assert_eq!(INDEX_COUNT / 3, 12, "a cube has 12 triangles");
}

#[test]
fn triangles_wind_counter_clockwise_from_outside() {
    for triangle in INDICES.chunks(3) {
        let v0 = Vector3::from(POSITIONS[triangle[0] as usize]);
        let v1 = Vector3::from(POSITIONS[triangle[1] as usize]);
        let v2 = Vector3::from(POSITIONS[triangle[2] as usize]);
        let face_normal = Vector3::from(NORMALS[triangle[0] as usize]);

        let winding = (v1 - v0).cross(v2 - v0);
        assert!(
            winding.dot(face_normal) > 0.0,
            "triangle {:?} winds clockwise",
            triangle
        );
    }
}

#[test]
fn triangle_vertices_share_one_face_normal() {
    for triangle in INDICES.chunks(3) {
        let n0 = NORMALS[triangle[0] as usize];
        let n1 = NORMALS[triangle[1] as usize];
        let n2 = NORMALS[triangle[2] as usize];
        assert_eq!(n0, n1);
        assert_eq!(n1, n2);
    }
}

#[test]
fn interleaved_buffer_has_eight_floats_per_vertex() {
    let vertices = interleave();
    assert_eq!(vertices.len(), VERTEX_COUNT);
    assert_eq!(std::mem::size_of::<CubeVertex>(), 8 * 4);

    let bytes: &[u8] = bytemuck::cast_slice(&vertices);
    assert_eq!(bytes.len(), VERTEX_COUNT * 8 * 4);

    // Spot-check the interleaving order: position, normal, uv.
    let floats: &[f32] = bytemuck::cast_slice(&vertices);
    assert_eq!(&floats[0..3], &POSITIONS[0]);
    assert_eq!(&floats[3..6], &NORMALS[0]);
    assert_eq!(&floats[6..8], &TEX_COORDS[0]);
    assert_eq!(&floats[8..11], &POSITIONS[1]);
}

#[test]
fn uvs_cover_the_unit_square_per_face() {
    for face in TEX_COORDS.chunks(4) {
        let mut corners = face.to_vec();
        corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            corners,
            vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]
        );
    }
}
