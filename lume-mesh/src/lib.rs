//! OBJ import and vertex welding.
//!
//! A [`SceneDescription`] (flat attribute arrays plus triangle shapes) goes
//! through [`MeshBuilder`], which reconstructs missing normals, welds corners
//! that are approximately equal and produces a [`MeshData`] ready for upload.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

pub mod bounds;
pub mod builder;
pub mod dedup;
pub mod error;
pub mod gpu;
pub mod mesh;
pub mod normalize;
pub mod normals;
pub mod obj;
pub mod scene;
pub mod tobj_source;
pub mod viewer;

pub use bounds::BoundingBox;
pub use builder::{MeshBuilder, MeshData};
pub use error::{MeshError, MeshResult};
pub use gpu::GpuMesh;
pub use mesh::{Mesh, MeshState};
pub use obj::ObjReader;
pub use scene::{IndexTriple, SceneDescription, SceneSource, Shape};
pub use tobj_source::TobjSource;
pub use viewer::ModelViewer;

/// Interleaved vertex record as uploaded to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct PackedVertex {
    pub position: [f32; 3], // 12 bytes
    pub tex_coord: [f32; 2], // 8 bytes
    pub normal: [f32; 3],   // 12 bytes, 32 total
}

impl PackedVertex {
    pub fn new(position: Vec3, tex_coord: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            tex_coord: tex_coord.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn tex_coord(&self) -> Vec2 {
        Vec2::from_array(self.tex_coord)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}
