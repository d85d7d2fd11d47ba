//! OpenGL backend for `lume-core` built on `glow`.
//!
//! The caller owns window and context creation; [`GlowDevice::new`] takes an
//! already current `glow::Context`.

mod buffer;
mod device;
mod query;
mod vertex_array;

pub use buffer::GlowBuffer;
pub use device::{GlowDevice, GlowDeviceInner};
pub use query::GlowTimerQuery;
pub use vertex_array::GlowVertexArray;
