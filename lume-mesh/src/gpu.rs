use lume_core::LumeResult;
use lume_core::device::*;

use crate::{MeshData, PackedVertex};

/// Device-side copy of a [`MeshData`]. Dropping it releases the buffers.
pub struct GpuMesh<D: Device> {
    pub vertex_array: D::VertexArray,
    pub vertex_buffer: D::Buffer,
    pub index_buffer: D::Buffer,
    pub index_count: u32,
}

impl<D: Device> GpuMesh<D> {
    pub fn new(device: &D, data: &MeshData) -> LumeResult<Self> {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&data.vertices);
        let vertex_buffer = device.create_buffer(BufferDescriptor {
            size: vertex_bytes.len() as u64,
            usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
        })?;
        vertex_buffer.write_data(0, vertex_bytes)?;

        let index_bytes: &[u8] = bytemuck::cast_slice(&data.indices);
        let index_buffer = device.create_buffer(BufferDescriptor {
            size: index_bytes.len() as u64,
            usage: BufferUsage::INDEX | BufferUsage::COPY_DST,
        })?;
        index_buffer.write_data(0, index_bytes)?;

        let vertex_array = device.create_vertex_array(VertexArrayDescriptor {
            vertex_buffer: &vertex_buffer,
            index_buffer: &index_buffer,
            layout: packed_vertex_layout(),
        })?;

        Ok(Self {
            vertex_array,
            vertex_buffer,
            index_buffer,
            index_count: data.index_count(),
        })
    }

    pub fn draw(&self, device: &D, topology: PrimitiveTopology) {
        device.draw_indexed(&self.vertex_array, topology, self.index_count);
    }
}

/// Attribute layout of [`PackedVertex`]: position at location 0, texcoord at 1, normal at 2.
pub fn packed_vertex_layout() -> VertexLayout {
    VertexLayout {
        array_stride: std::mem::size_of::<PackedVertex>() as u32,
        attributes: vec![
            VertexAttribute {
                location: 0,
                format: VertexFormat::Float32x3,
                offset: std::mem::offset_of!(PackedVertex, position) as u32,
            },
            VertexAttribute {
                location: 1,
                format: VertexFormat::Float32x2,
                offset: std::mem::offset_of!(PackedVertex, tex_coord) as u32,
            },
            VertexAttribute {
                location: 2,
                format: VertexFormat::Float32x3,
                offset: std::mem::offset_of!(PackedVertex, normal) as u32,
            },
        ],
    }
}
