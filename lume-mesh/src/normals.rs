use glam::Vec3;
use std::collections::BTreeMap;

use crate::scene::{SceneDescription, Shape};

/// Whether the triangle has non-zero signed area in its XY projection.
///
/// Triangles lying in a plane parallel to the Z axis fail this test even
/// though they have area in 3D.
pub fn is_non_degenerate(v1: Vec3, v2: Vec3, v3: Vec3) -> bool {
    (v2.x - v1.x) * (v3.y - v2.y) != (v3.x - v2.x) * (v2.y - v1.y)
}

/// Unit normal of `(v2 - v1) x (v3 - v2)`, or zero for a degenerate triangle.
pub fn face_normal(v1: Vec3, v2: Vec3, v3: Vec3) -> Vec3 {
    if !is_non_degenerate(v1, v2, v3) {
        return Vec3::ZERO;
    }
    let edge1 = v2 - v1;
    let edge2 = v3 - v2;
    edge1.cross(edge2).normalize()
}

/// Per-position smoothed normals for one shape.
///
/// Every face normal is added to the accumulator of each of its three position
/// indices, then each sum is normalized. Sums that cancel out to zero stay zero.
pub fn smooth_vertex_normals(scene: &SceneDescription, shape: &Shape) -> BTreeMap<u32, Vec3> {
    let mut accumulated: BTreeMap<u32, Vec3> = BTreeMap::new();

    for face in shape.faces() {
        let corners = [
            face[0].position_index(),
            face[1].position_index(),
            face[2].position_index(),
        ];
        let normal = face_normal(
            scene.position(corners[0]),
            scene.position(corners[1]),
            scene.position(corners[2]),
        );

        for corner in corners {
            *accumulated.entry(corner).or_insert(Vec3::ZERO) += normal;
        }
    }

    for normal in accumulated.values_mut() {
        *normal = normal.normalize_or_zero();
    }
    accumulated
}
