use glow::HasContext;
use lume_core::{LumeError, LumeResult};

use crate::GlowDevice;

/// `GL_TIME_ELAPSED` query. `end` blocks until the result is available.
///
/// The result is read through the 32-bit getter; `glow` only exposes the
/// 64-bit one for query buffer objects. Intervals longer than `u32::MAX`
/// nanoseconds (about 4.29 s) wrap.
pub struct GlowTimerQuery {
    pub query: glow::Query,
    pub active: bool,
    pub device: GlowDevice,
}

impl Drop for GlowTimerQuery {
    fn drop(&mut self) {
        unsafe {
            if self.active {
                self.device.gl.end_query(glow::TIME_ELAPSED);
            }
            self.device.gl.delete_query(self.query);
        }
    }
}

impl lume_core::device::TimerQuery for GlowTimerQuery {
    fn begin(&mut self) {
        if self.active {
            return;
        }
        unsafe {
            self.device.gl.begin_query(glow::TIME_ELAPSED, self.query);
        }
        self.active = true;
    }

    fn end(&mut self) -> LumeResult<u64> {
        if !self.active {
            return Err(LumeError::QueryFailed("Timer query was never started".to_string()));
        }
        self.active = false;

        unsafe {
            let gl = &self.device.gl;
            gl.end_query(glow::TIME_ELAPSED);
            while gl.get_query_parameter_u32(self.query, glow::QUERY_RESULT_AVAILABLE) == 0 {
                std::hint::spin_loop();
            }
            Ok(gl.get_query_parameter_u32(self.query, glow::QUERY_RESULT) as u64)
        }
    }
}
