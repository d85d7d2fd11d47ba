use lume_core::device::{Device, PrimitiveTopology};
use lume_core::renderer::KeyCode;
use lume_core::{Application, LumeConfig, LumeError, LumeResult};
use std::path::PathBuf;

use crate::Mesh;

pub const KEY_POINTS: KeyCode = KeyCode(80);
pub const KEY_LINES: KeyCode = KeyCode(76);
pub const KEY_TRIANGLES: KeyCode = KeyCode(84);

/// Application that loads one OBJ file and draws it every frame.
///
/// P, L and T switch between point, line and triangle topology.
pub struct ModelViewer<D: Device> {
    path: PathBuf,
    mesh: Mesh<D>,
    topology: PrimitiveTopology,
}

impl<D: Device> ModelViewer<D> {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            mesh: Mesh::new(),
            topology: PrimitiveTopology::TriangleList,
        }
    }

    pub fn mesh(&self) -> &Mesh<D> {
        &self.mesh
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }
}

impl<D: Device> Application<D> for ModelViewer<D> {
    fn initialize(&mut self, device: &D, config: &LumeConfig) -> LumeResult<()> {
        self.mesh
            .load_obj(device, &self.path, config.mesh.scale_to_unit_box)
            .map_err(|err| LumeError::ResourceCreationFailed(err.to_string()))
    }

    fn update(&mut self, _dt: f64) {}

    fn draw(&mut self, device: &D) {
        self.mesh.draw(device, self.topology);
    }

    fn process_input(&mut self, key: KeyCode) {
        self.topology = match key {
            KEY_POINTS => PrimitiveTopology::PointList,
            KEY_LINES => PrimitiveTopology::LineList,
            KEY_TRIANGLES => PrimitiveTopology::TriangleList,
            _ => self.topology,
        };
    }

    fn clean_up(&mut self) {
        self.mesh.clean_up();
    }
}
