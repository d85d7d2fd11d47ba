use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dedup::VertexDeduplicator;
use crate::normalize::scale_to_unit_box;
use crate::normals::{face_normal, smooth_vertex_normals};
use crate::scene::{IndexTriple, SceneDescription, Shape};
use crate::{BoundingBox, MeshError, MeshResult, PackedVertex};

/// Welded geometry ready for upload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<PackedVertex>,
    pub indices: Vec<u32>,
    #[serde(skip)]
    pub bounding_box: BoundingBox,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MeshBuilder {
    scale_to_unit_box: bool,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale_to_unit_box(mut self, enabled: bool) -> Self {
        self.scale_to_unit_box = enabled;
        self
    }

    /// Weld every shape of `scene` into one vertex/index buffer pair.
    ///
    /// Vertices are only welded within a shape; each shape gets its own
    /// dedup map while the output buffers are shared.
    ///
    /// # Panics
    ///
    /// If a face corner lacks a position index or references a position that
    /// does not exist.
    pub fn build(&self, scene: &SceneDescription) -> MeshResult<MeshData> {
        if scene.shapes.is_empty() {
            return Err(MeshError::EmptyScene(scene.origin.clone()));
        }

        let mut data = MeshData::default();
        for shape in &scene.shapes {
            let shape_bounds = self.build_shape(scene, shape, &mut data);
            data.bounding_box.merge(&shape_bounds);
        }

        if self.scale_to_unit_box {
            scale_to_unit_box(&mut data.vertices, &data.bounding_box);
        }

        log::info!(
            "Welded {}: {} triangles -> {} vertices, {} indices",
            scene.origin,
            scene.triangle_count(),
            data.vertices.len(),
            data.indices.len()
        );
        Ok(data)
    }

    fn build_shape(&self, scene: &SceneDescription, shape: &Shape, data: &mut MeshData) -> BoundingBox {
        let smoothed = if shape.has_smoothing_group() {
            smooth_vertex_normals(scene, shape)
        } else {
            BTreeMap::new()
        };

        let mut dedup = VertexDeduplicator::new();
        let mut bounds = BoundingBox::new();
        let vertex_count_before = data.vertices.len();

        for face in shape.faces() {
            let corners = [face[0], face[1], face[2]];
            let positions = corners.map(|c| scene.position(c.position_index()));
            let normals = resolve_normals(scene, &corners, &positions, &smoothed);
            let tex_coords = resolve_tex_coords(scene, &corners);

            for k in 0..3 {
                let vertex = PackedVertex::new(positions[k], tex_coords[k], normals[k]);
                let index = dedup.insert(&mut data.vertices, vertex);
                data.indices.push(index);
                bounds.merge_point(positions[k]);
            }
        }

        log::debug!(
            "Shape '{}': {} faces, {} new vertices{}",
            shape.name,
            shape.face_count(),
            data.vertices.len() - vertex_count_before,
            if smoothed.is_empty() { "" } else { " (smoothed normals)" }
        );
        bounds
    }
}

/// Explicit normals win, then smoothed per-position normals, then the flat face normal.
fn resolve_normals(
    scene: &SceneDescription,
    corners: &[IndexTriple; 3],
    positions: &[Vec3; 3],
    smoothed: &BTreeMap<u32, Vec3>,
) -> [Vec3; 3] {
    if !scene.normals.is_empty() {
        if let [Some(n0), Some(n1), Some(n2)] = corners.map(|c| c.normal) {
            return [scene.normal(n0), scene.normal(n1), scene.normal(n2)];
        }
    }

    if !smoothed.is_empty() {
        return corners.map(|c| {
            smoothed
                .get(&c.position_index())
                .copied()
                .unwrap_or(Vec3::ZERO)
        });
    }

    let flat = face_normal(positions[0], positions[1], positions[2]);
    [flat; 3]
}

/// Texcoords with V flipped; all zero unless every corner has one.
fn resolve_tex_coords(scene: &SceneDescription, corners: &[IndexTriple; 3]) -> [Vec2; 3] {
    if !scene.texcoords.is_empty() {
        if let [Some(t0), Some(t1), Some(t2)] = corners.map(|c| c.texcoord) {
            return [t0, t1, t2].map(|t| flip_v(scene.texcoord(t)));
        }
    }
    [Vec2::ZERO; 3]
}

fn flip_v(uv: Vec2) -> Vec2 {
    Vec2::new(uv.x, 1.0 - uv.y)
}
