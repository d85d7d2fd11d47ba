use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use approx::assert_relative_eq;
use lume_core::device::*;
use lume_core::renderer::{InputEvent, KeyCode, NoHooks};
use lume_core::{LumeConfig, LumeError, LumeResult, Renderer, Window};
use lume_mesh::viewer::KEY_LINES;
use lume_mesh::{Mesh, MeshBuilder, MeshError, MeshState, ModelViewer, ObjReader, PackedVertex, SceneSource, TobjSource};

#[derive(Default)]
struct Journal {
    live_buffers: usize,
    uploads: Vec<(BufferUsage, Vec<u8>)>,
    draws: Vec<(PrimitiveTopology, u32)>,
    fail_buffers: bool,
}

/// In-memory device that records uploads and draws.
#[derive(Clone, Default)]
struct RecordingDevice {
    journal: Rc<RefCell<Journal>>,
}

struct RecordingBuffer {
    journal: Rc<RefCell<Journal>>,
    usage: BufferUsage,
    size: u64,
}

impl Buffer for RecordingBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn write_data(&self, offset: u64, data: &[u8]) -> LumeResult<()> {
        assert_eq!(offset, 0);
        assert_eq!(data.len() as u64, self.size);
        self.journal.borrow_mut().uploads.push((self.usage, data.to_vec()));
        Ok(())
    }
}

impl Drop for RecordingBuffer {
    fn drop(&mut self) {
        self.journal.borrow_mut().live_buffers -= 1;
    }
}

struct RecordingVertexArray;

impl VertexArray for RecordingVertexArray {}

struct RecordingTimer;

impl TimerQuery for RecordingTimer {
    fn begin(&mut self) {}

    fn end(&mut self) -> LumeResult<u64> {
        Ok(0)
    }
}

impl Device for RecordingDevice {
    type Buffer = RecordingBuffer;
    type VertexArray = RecordingVertexArray;
    type TimerQuery = RecordingTimer;

    fn create_buffer(&self, descriptor: BufferDescriptor) -> LumeResult<RecordingBuffer> {
        let mut journal = self.journal.borrow_mut();
        if journal.fail_buffers {
            return Err(LumeError::OutOfMemory);
        }
        journal.live_buffers += 1;
        Ok(RecordingBuffer {
            journal: self.journal.clone(),
            usage: descriptor.usage,
            size: descriptor.size,
        })
    }

    fn create_vertex_array(&self, descriptor: VertexArrayDescriptor<Self>) -> LumeResult<RecordingVertexArray> {
        assert_eq!(descriptor.layout.array_stride, 32);
        Ok(RecordingVertexArray)
    }

    fn create_timer_query(&self) -> LumeResult<RecordingTimer> {
        Ok(RecordingTimer)
    }

    fn draw_indexed(&self, _vertex_array: &RecordingVertexArray, topology: PrimitiveTopology, index_count: u32) {
        self.journal.borrow_mut().draws.push((topology, index_count));
    }

    fn set_rasterizer_discard(&self, _enabled: bool) {}
}

const CUBE: &str = r#"
o Cube
v -1.0 -1.0  1.0
v  1.0 -1.0  1.0
v  1.0  1.0  1.0
v -1.0  1.0  1.0
v -1.0 -1.0 -1.0
v  1.0 -1.0 -1.0
v  1.0  1.0 -1.0
v -1.0  1.0 -1.0
vn  0  0  1
vn  0  0 -1
vn -1  0  0
vn  1  0  0
vn  0  1  0
vn  0 -1  0
s off
f 1//1 2//1 3//1 4//1
f 6//2 5//2 8//2 7//2
f 5//3 1//3 4//3 8//3
f 2//4 6//4 7//4 3//4
f 4//5 3//5 7//5 8//5
f 5//6 6//6 2//6 1//6
"#;

/// 3x3 height field with a raised center.
const TENT: &str = r#"
o Tent
v 0 0 0
v 1 0 0
v 2 0 0
v 0 1 0
v 1 1 1
v 2 1 0
v 0 2 0
v 1 2 0
v 2 2 0
s 1
f 1 2 5 4
f 2 3 6 5
f 4 5 8 7
f 5 6 9 8
"#;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("lume-mesh-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

fn downloaded_vertices(device: &RecordingDevice) -> Vec<PackedVertex> {
    let journal = device.journal.borrow();
    let (_, bytes) = journal
        .uploads
        .iter()
        .find(|(usage, _)| usage.contains(BufferUsage::VERTEX))
        .unwrap();
    bytes.chunks_exact(32).map(bytemuck::pod_read_unaligned).collect()
}

#[test]
fn flat_cube_welds_per_face() {
    let scene = ObjReader::new().parse("cube.obj", CUBE).unwrap();
    let data = MeshBuilder::new().build(&scene).unwrap();

    // 6 faces with distinct normals, 4 corners each.
    assert_eq!(data.vertices.len(), 24);
    assert_eq!(data.index_count(), 36);
    assert!(data.indices.iter().all(|&i| (i as usize) < data.vertices.len()));
    assert!(data.vertices.len() <= 3 * data.triangle_count());

    for v in &data.vertices {
        assert_relative_eq!(v.normal().length(), 1.0, epsilon = 1e-5);
    }
    assert_eq!(data.bounding_box.lower_corner(), glam::Vec3::splat(-1.0));
    assert_eq!(data.bounding_box.upper_corner(), glam::Vec3::splat(1.0));
}

#[test]
fn smoothing_group_shares_corners() {
    let scene = ObjReader::new().parse("tent.obj", TENT).unwrap();
    let data = MeshBuilder::new().build(&scene).unwrap();

    assert_eq!(data.vertices.len(), 9);
    assert_eq!(data.index_count(), 24);
    for v in &data.vertices {
        assert_relative_eq!(v.normal().length(), 1.0, epsilon = 1e-5);
        assert!(v.normal().z > 0.0);
    }

    let peak = data.vertices.iter().find(|v| v.position[2] == 1.0).unwrap();
    assert_relative_eq!(peak.normal().x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(peak.normal().y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(peak.normal().z, 1.0, epsilon = 1e-5);
}

#[test]
fn flat_tent_keeps_facets_apart() {
    let source = TENT.replace("s 1", "s off");
    let scene = ObjReader::new().parse("flat-tent.obj", &source).unwrap();
    let data = MeshBuilder::new().build(&scene).unwrap();

    assert!(data.vertices.len() > 9);
    assert!(data.vertices.len() <= 3 * data.triangle_count());
    assert!(data.indices.iter().all(|&i| (i as usize) < data.vertices.len()));
}

#[test]
fn building_is_deterministic() {
    let scene = ObjReader::new().parse("tent.obj", TENT).unwrap();
    let first = MeshBuilder::new().build(&scene).unwrap();
    let second = MeshBuilder::new().build(&scene).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unit_box_scales_uniformly() {
    let scene = ObjReader::new().parse("tent.obj", TENT).unwrap();
    let data = MeshBuilder::new().scale_to_unit_box(true).build(&scene).unwrap();

    let range = |axis: usize| {
        let values = data.vertices.iter().map(|v| v.position[axis]);
        let min = values.clone().fold(f32::INFINITY, f32::min);
        let max = values.fold(f32::NEG_INFINITY, f32::max);
        (min, max)
    };

    // X and Y span the 2-unit extent; Z is half as tall and keeps that ratio.
    for axis in 0..2 {
        let (min, max) = range(axis);
        assert_relative_eq!(min, -1.0, epsilon = 1e-6);
        assert_relative_eq!(max, 1.0, epsilon = 1e-6);
    }
    let (z_min, z_max) = range(2);
    assert_relative_eq!(z_min, -1.0, epsilon = 1e-6);
    assert_relative_eq!(z_max, 0.0, epsilon = 1e-6);

    // Bounds keep the model-space extent.
    assert_eq!(data.bounding_box.upper_corner(), glam::Vec3::new(2.0, 2.0, 1.0));
}

#[test]
fn native_and_tobj_readers_agree_without_smoothing() {
    let native = ObjReader::new().parse("cube.obj", CUBE).unwrap();
    let tobj = TobjSource::new().parse("cube.obj", CUBE).unwrap();
    let a = MeshBuilder::new().build(&native).unwrap();
    let b = MeshBuilder::new().build(&tobj).unwrap();
    assert_eq!(a.vertices.len(), b.vertices.len());
    assert_eq!(a.indices, b.indices);
}

#[test]
fn load_obj_uploads_and_draws() {
    let path = write_temp("cube.obj", CUBE);
    let device = RecordingDevice::default();
    let mut mesh = Mesh::new();
    assert_eq!(mesh.state(), MeshState::Unloaded);

    mesh.load_obj(&device, &path, false).unwrap();
    assert_eq!(mesh.state(), MeshState::Loaded);
    assert!(mesh.is_uploaded());
    assert_eq!(mesh.index_count(), 36);
    assert_eq!(device.journal.borrow().live_buffers, 2);

    let uploaded = downloaded_vertices(&device);
    assert_eq!(uploaded.as_slice(), mesh.vertices());

    mesh.draw(&device, PrimitiveTopology::TriangleList);
    assert_eq!(device.journal.borrow().draws, vec![(PrimitiveTopology::TriangleList, 36)]);

    mesh.clean_up();
    assert_eq!(device.journal.borrow().live_buffers, 0);
    assert_eq!(mesh.index_count(), 36);
    mesh.draw(&device, PrimitiveTopology::TriangleList);
    assert_eq!(device.journal.borrow().draws.len(), 1);

    std::fs::remove_file(path).ok();
}

#[test]
fn reload_replaces_buffers() {
    let cube = write_temp("reload-cube.obj", CUBE);
    let tent = write_temp("reload-tent.obj", TENT);
    let device = RecordingDevice::default();
    let mut mesh = Mesh::new();

    mesh.load_obj(&device, &cube, false).unwrap();
    assert_eq!(mesh.vertices().len(), 24);
    mesh.load_with(&device, &ObjReader::new(), &tent, true).unwrap();
    assert_eq!(mesh.vertices().len(), 9);
    assert_eq!(device.journal.borrow().live_buffers, 2);

    std::fs::remove_file(cube).ok();
    std::fs::remove_file(tent).ok();
}

#[test]
fn failed_load_discards_previous_mesh() {
    let path = write_temp("before-failure.obj", CUBE);
    let device = RecordingDevice::default();
    let mut mesh = Mesh::new();
    mesh.load_obj(&device, &path, false).unwrap();

    let missing = std::env::temp_dir().join("lume-mesh-does-not-exist.obj");
    let err = mesh.load_obj(&device, &missing, false).unwrap_err();
    assert!(matches!(err, MeshError::Io { .. }));
    assert_eq!(mesh.state(), MeshState::Failed);
    assert!(!mesh.is_uploaded());
    assert_eq!(mesh.index_count(), 0);
    assert!(mesh.bounding_box().is_none());
    assert_eq!(device.journal.borrow().live_buffers, 0);

    std::fs::remove_file(path).ok();
}

#[test]
fn file_without_faces_fails() {
    let path = write_temp("points.obj", "v 0 0 0\nv 1 0 0\n");
    let device = RecordingDevice::default();
    let mut mesh = Mesh::new();

    let err = mesh.load_obj(&device, &path, false).unwrap_err();
    assert!(matches!(err, MeshError::EmptyScene(_)));
    assert_eq!(mesh.state(), MeshState::Failed);

    std::fs::remove_file(path).ok();
}

#[test]
fn device_errors_fail_the_load() {
    let device = RecordingDevice::default();
    device.journal.borrow_mut().fail_buffers = true;
    let scene = ObjReader::new().parse("cube.obj", CUBE).unwrap();

    let mut mesh = Mesh::new();
    let err = mesh.load_scene(&device, &scene, false).unwrap_err();
    assert!(matches!(err, MeshError::Device(LumeError::OutOfMemory)));
    assert_eq!(mesh.state(), MeshState::Failed);
}

#[test]
fn tobj_source_loads_from_disk() {
    let path = write_temp("tobj-cube.obj", CUBE);
    let scene = TobjSource::new().load(&path).unwrap();
    assert_eq!(scene.shapes.len(), 1);
    assert_eq!(scene.triangle_count(), 12);
    std::fs::remove_file(path).ok();
}

/// Window that replays one batch of events per frame and closes after the last.
struct ScriptedWindow {
    frames: Vec<Vec<InputEvent>>,
    closing: bool,
}

impl Window for ScriptedWindow {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        if self.frames.is_empty() {
            self.closing = true;
            return Vec::new();
        }
        self.frames.remove(0)
    }

    fn should_close(&self) -> bool {
        self.closing
    }

    fn set_should_close(&mut self, value: bool) {
        self.closing = value;
    }

    fn swap_buffers(&mut self) {}
}

#[test]
fn viewer_draws_through_renderer() {
    let path = write_temp("viewer-cube.obj", CUBE);
    let device = RecordingDevice::default();
    let window = ScriptedWindow {
        frames: vec![Vec::new(), vec![InputEvent::Key(KEY_LINES)], vec![InputEvent::Key(KeyCode::ESCAPE)]],
        closing: false,
    };
    let mut config = LumeConfig::default();
    config.renderer.measure_gpu_time = false;
    config.mesh.scale_to_unit_box = true;

    let mut renderer = Renderer::new(device.clone(), window, NoHooks, config);
    renderer.initialize().unwrap();
    renderer.add_application(Box::new(ModelViewer::<RecordingDevice>::new(&path))).unwrap();
    renderer.run().unwrap();

    let journal = device.journal.borrow();
    assert_eq!(
        journal.draws,
        vec![
            (PrimitiveTopology::TriangleList, 36),
            (PrimitiveTopology::LineList, 36),
            (PrimitiveTopology::LineList, 36),
        ]
    );
    assert_eq!(journal.live_buffers, 0);
    drop(journal);

    std::fs::remove_file(path).ok();
}

#[test]
fn viewer_reports_missing_model() {
    let device = RecordingDevice::default();
    let mut viewer = ModelViewer::<RecordingDevice>::new(std::env::temp_dir().join("lume-mesh-no-model.obj"));
    let err = lume_core::Application::initialize(&mut viewer, &device, &LumeConfig::default()).unwrap_err();
    assert!(matches!(err, LumeError::ResourceCreationFailed(_)));
    assert_eq!(viewer.mesh().state(), MeshState::Failed);
}
