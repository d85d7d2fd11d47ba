use glam::{Vec2, Vec3};
use std::path::Path;

use crate::MeshResult;

/// Attribute indices of one triangle corner. `None` marks an absent attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexTriple {
    pub position: Option<u32>,
    pub normal: Option<u32>,
    pub texcoord: Option<u32>,
}

impl IndexTriple {
    pub fn new(position: u32, normal: Option<u32>, texcoord: Option<u32>) -> Self {
        Self {
            position: Some(position),
            normal,
            texcoord,
        }
    }

    /// # Panics
    ///
    /// Every corner must reference a position; input without one is malformed
    /// beyond recovery.
    pub fn position_index(&self) -> u32 {
        match self.position {
            Some(index) => index,
            None => panic!("face corner has no position index"),
        }
    }
}

/// A named triangle list. `indices` holds three corners per face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub name: String,
    pub indices: Vec<IndexTriple>,
    /// One id per face; empty when the source has no smoothing information.
    pub smoothing_group_ids: Vec<u32>,
}

impl Shape {
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn faces(&self) -> std::slice::ChunksExact<'_, IndexTriple> {
        self.indices.chunks_exact(3)
    }

    pub fn has_smoothing_group(&self) -> bool {
        self.smoothing_group_ids.iter().any(|&id| id > 0)
    }
}

/// Parsed scene: shared flat attribute arrays and the shapes indexing into them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescription {
    /// Where the scene came from, used in diagnostics.
    pub origin: String,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub shapes: Vec<Shape>,
}

impl SceneDescription {
    pub fn position(&self, index: u32) -> Vec3 {
        let base = index as usize * 3;
        assert!(
            base + 2 < self.positions.len(),
            "position index {} out of range ({} positions)",
            index,
            self.positions.len() / 3
        );
        Vec3::from_slice(&self.positions[base..base + 3])
    }

    pub fn normal(&self, index: u32) -> Vec3 {
        let base = index as usize * 3;
        assert!(
            base + 2 < self.normals.len(),
            "normal index {} out of range ({} normals)",
            index,
            self.normals.len() / 3
        );
        Vec3::from_slice(&self.normals[base..base + 3])
    }

    pub fn texcoord(&self, index: u32) -> Vec2 {
        let base = index as usize * 2;
        assert!(
            base + 1 < self.texcoords.len(),
            "texcoord index {} out of range ({} texcoords)",
            index,
            self.texcoords.len() / 2
        );
        Vec2::from_slice(&self.texcoords[base..base + 2])
    }

    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(Shape::face_count).sum()
    }
}

/// Anything that can turn a file into a [`SceneDescription`].
pub trait SceneSource {
    fn load(&self, path: &Path) -> MeshResult<SceneDescription>;
}
