use glow::HasContext;

use crate::GlowDevice;

pub struct GlowVertexArray {
    pub vertex_array: glow::VertexArray,
    pub device: GlowDevice,
}

impl Drop for GlowVertexArray {
    fn drop(&mut self) {
        unsafe {
            self.device.gl.delete_vertex_array(self.vertex_array);
        }
    }
}

impl lume_core::device::VertexArray for GlowVertexArray {}
