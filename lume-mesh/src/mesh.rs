use lume_core::debug::StackTrace;
use lume_core::device::{Device, PrimitiveTopology};
use std::path::Path;

use crate::scene::{SceneDescription, SceneSource};
use crate::{BoundingBox, GpuMesh, MeshBuilder, MeshData, MeshResult, ObjReader, PackedVertex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

/// A loaded model together with its GPU buffers.
///
/// Every load starts from scratch: whatever the mesh held before is released
/// first, and a failed load leaves nothing behind.
pub struct Mesh<D: Device> {
    state: MeshState,
    data: Option<MeshData>,
    gpu: Option<GpuMesh<D>>,
}

impl<D: Device> Default for Mesh<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Device> Mesh<D> {
    pub fn new() -> Self {
        Self {
            state: MeshState::Unloaded,
            data: None,
            gpu: None,
        }
    }

    pub fn load_obj<P: AsRef<Path>>(&mut self, device: &D, path: P, scale_to_unit_box: bool) -> MeshResult<()> {
        self.load_with(device, &ObjReader::new(), path, scale_to_unit_box)
    }

    pub fn load_with<S: SceneSource, P: AsRef<Path>>(
        &mut self,
        device: &D,
        source: &S,
        path: P,
        scale_to_unit_box: bool,
    ) -> MeshResult<()> {
        self.reset(MeshState::Loading);
        match source.load(path.as_ref()) {
            Ok(scene) => self.load_scene(device, &scene, scale_to_unit_box),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Build and upload an already parsed scene.
    pub fn load_scene(&mut self, device: &D, scene: &SceneDescription, scale_to_unit_box: bool) -> MeshResult<()> {
        self.reset(MeshState::Loading);

        let data = match MeshBuilder::new().scale_to_unit_box(scale_to_unit_box).build(scene) {
            Ok(data) => data,
            Err(err) => return Err(self.fail(err)),
        };
        let gpu = match GpuMesh::new(device, &data) {
            Ok(gpu) => gpu,
            Err(err) => return Err(self.fail(err.into())),
        };

        self.data = Some(data);
        self.gpu = Some(gpu);
        self.state = MeshState::Loaded;
        Ok(())
    }

    pub fn draw(&self, device: &D, topology: PrimitiveTopology) {
        if let Some(gpu) = &self.gpu {
            gpu.draw(device, topology);
        }
    }

    /// Release the GPU buffers. The CPU-side geometry stays available.
    pub fn clean_up(&mut self) {
        self.gpu = None;
    }

    pub fn state(&self) -> MeshState {
        self.state
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn index_count(&self) -> u32 {
        self.data.as_ref().map_or(0, MeshData::index_count)
    }

    pub fn vertices(&self) -> &[PackedVertex] {
        self.data.as_ref().map_or(&[], |data| data.vertices.as_slice())
    }

    pub fn indices(&self) -> &[u32] {
        self.data.as_ref().map_or(&[], |data| data.indices.as_slice())
    }

    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.data.as_ref().map(|data| &data.bounding_box)
    }

    pub fn data(&self) -> Option<&MeshData> {
        self.data.as_ref()
    }

    fn reset(&mut self, state: MeshState) {
        self.gpu = None;
        self.data = None;
        self.state = state;
    }

    fn fail(&mut self, err: crate::MeshError) -> crate::MeshError {
        log::error!("{}", err);
        StackTrace::print();
        self.reset(MeshState::Failed);
        err
    }
}
