use glow::HasContext;
use log::{info, warn};
use lume_core::device::*;
use lume_core::{LumeError, LumeResult};
use std::rc::Rc;

use crate::{GlowBuffer, GlowTimerQuery, GlowVertexArray};

pub struct GlowDeviceInner {
    pub gl: glow::Context,
}

/// Handle to a current OpenGL context. Clones share the context.
#[derive(Clone)]
pub struct GlowDevice {
    pub inner: Rc<GlowDeviceInner>,
}

impl std::ops::Deref for GlowDevice {
    type Target = GlowDeviceInner;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl GlowDevice {
    /// Wrap a current context. With `enable_debug`, driver messages are routed
    /// through [`lume_core::debug::log_debug_message`] synchronously so the
    /// logged stack trace points at the offending call.
    pub fn new(mut gl: glow::Context, enable_debug: bool) -> Self {
        let debug_output = enable_debug && gl.supports_debug();
        if enable_debug && !debug_output {
            warn!("OpenGL debug output is not supported by this context");
        }

        if debug_output {
            unsafe {
                gl.enable(glow::DEBUG_OUTPUT);
                gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
                gl.debug_message_callback(|source, ty, id, severity, message| {
                    lume_core::debug::log_debug_message(source, ty, id, severity, message);
                });
            }
            info!("OpenGL debug output enabled");
        }

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Self {
            inner: Rc::new(GlowDeviceInner { gl }),
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.inner.gl
    }
}

fn gl_topology(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::TriangleList => glow::TRIANGLES,
        PrimitiveTopology::LineList => glow::LINES,
        PrimitiveTopology::PointList => glow::POINTS,
    }
}

impl Device for GlowDevice {
    type Buffer = GlowBuffer;
    type VertexArray = GlowVertexArray;
    type TimerQuery = GlowTimerQuery;

    fn create_buffer(&self, descriptor: BufferDescriptor) -> LumeResult<GlowBuffer> {
        let size = i32::try_from(descriptor.size).map_err(|_| LumeError::OutOfMemory)?;

        unsafe {
            let buffer = self.gl.create_buffer().map_err(LumeError::ResourceCreationFailed)?;
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, Some(buffer));
            self.gl.buffer_data_size(glow::COPY_WRITE_BUFFER, size, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, None);

            Ok(GlowBuffer {
                buffer,
                size: descriptor.size,
                device: self.clone(),
            })
        }
    }

    fn create_vertex_array(&self, descriptor: VertexArrayDescriptor<Self>) -> LumeResult<GlowVertexArray> {
        let stride = descriptor.layout.array_stride as i32;

        unsafe {
            let vertex_array = self.gl.create_vertex_array().map_err(LumeError::ResourceCreationFailed)?;
            self.gl.bind_vertex_array(Some(vertex_array));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(descriptor.vertex_buffer.buffer));
            // Element buffer binding is recorded in the vertex array state.
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(descriptor.index_buffer.buffer));

            for attribute in &descriptor.layout.attributes {
                self.gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.format.components() as i32,
                    glow::FLOAT,
                    false,
                    stride,
                    attribute.offset as i32,
                );
                self.gl.enable_vertex_attrib_array(attribute.location);
            }

            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(GlowVertexArray {
                vertex_array,
                device: self.clone(),
            })
        }
    }

    fn create_timer_query(&self) -> LumeResult<GlowTimerQuery> {
        unsafe {
            let query = self.gl.create_query().map_err(LumeError::QueryFailed)?;
            Ok(GlowTimerQuery {
                query,
                active: false,
                device: self.clone(),
            })
        }
    }

    fn draw_indexed(&self, vertex_array: &GlowVertexArray, topology: PrimitiveTopology, index_count: u32) {
        unsafe {
            self.gl.bind_vertex_array(Some(vertex_array.vertex_array));
            self.gl
                .draw_elements(gl_topology(topology), index_count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }

    fn set_rasterizer_discard(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::RASTERIZER_DISCARD);
            } else {
                self.gl.disable(glow::RASTERIZER_DISCARD);
            }
        }
    }
}
