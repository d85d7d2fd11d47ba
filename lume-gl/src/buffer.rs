use glow::HasContext;
use lume_core::{LumeError, LumeResult};

use crate::GlowDevice;

pub struct GlowBuffer {
    pub buffer: glow::Buffer,
    pub size: u64,
    pub device: GlowDevice,
}

impl Drop for GlowBuffer {
    fn drop(&mut self) {
        unsafe {
            self.device.gl.delete_buffer(self.buffer);
        }
    }
}

impl lume_core::device::Buffer for GlowBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn write_data(&self, offset: u64, data: &[u8]) -> LumeResult<()> {
        if offset + data.len() as u64 > self.size {
            return Err(LumeError::BackendError(format!(
                "Write of {} bytes at offset {} exceeds buffer size {}",
                data.len(),
                offset,
                self.size
            )));
        }

        // COPY_WRITE_BUFFER leaves the bound vertex array untouched.
        unsafe {
            let gl = &self.device.gl;
            gl.bind_buffer(glow::COPY_WRITE_BUFFER, Some(self.buffer));
            gl.buffer_sub_data_u8_slice(glow::COPY_WRITE_BUFFER, offset as i32, data);
            gl.bind_buffer(glow::COPY_WRITE_BUFFER, None);
        }
        Ok(())
    }
}
