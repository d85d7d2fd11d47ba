pub mod config;
pub mod debug;
pub mod device;
pub mod error;
pub mod renderer;

pub use config::LumeConfig;
pub use device::Device;
pub use error::{LumeError, LumeResult};
pub use renderer::{Application, Renderer, RendererHooks, Window};
