use std::time::Instant;

use crate::device::{Device, TimerQuery};
use crate::{LumeConfig, LumeError, LumeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ESCAPE: Self = Self(256);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Key(KeyCode),
    CursorPos { x: f64, y: f64 },
}

/// The platform window owning the GL context. Creating it is up to the host.
pub trait Window {
    fn poll_events(&mut self) -> Vec<InputEvent>;
    fn should_close(&self) -> bool;
    fn set_should_close(&mut self, value: bool);
    fn swap_buffers(&mut self);
}

pub trait Application<D: Device> {
    fn initialize(&mut self, device: &D, config: &LumeConfig) -> LumeResult<()>;
    fn update(&mut self, dt: f64);
    fn draw(&mut self, device: &D);
    fn process_input(&mut self, _key: KeyCode) {}
    fn process_cursor_pos(&mut self, _x: f64, _y: f64) {}
    fn clean_up(&mut self) {}
}

/// Per-backend extension points around the frame. Everything defaults to a no-op.
pub trait RendererHooks<D: Device> {
    fn on_initialize(&mut self, _device: &D, _config: &LumeConfig) -> LumeResult<()> {
        Ok(())
    }
    fn on_update_frame(&mut self, _dt: f64) {}
    fn on_begin_draw(&mut self, _device: &D) {}
    fn on_end_draw(&mut self, _device: &D) {}
    fn on_process_input(&mut self, _key: KeyCode) {}
    fn on_clean_up(&mut self) {}
}

pub struct NoHooks;

impl<D: Device> RendererHooks<D> for NoHooks {}

pub struct Renderer<D: Device, W: Window, H: RendererHooks<D> = NoHooks> {
    device: D,
    window: W,
    hooks: H,
    config: LumeConfig,
    applications: Vec<Box<dyn Application<D>>>,
    current: Option<usize>,
    timer: Option<D::TimerQuery>,
    measure_gpu_time: bool,
    last_gpu_time_ns: Option<u64>,
}

impl<D: Device, W: Window, H: RendererHooks<D>> Renderer<D, W, H> {
    pub fn new(device: D, window: W, hooks: H, config: LumeConfig) -> Self {
        let measure_gpu_time = config.renderer.measure_gpu_time;
        Self {
            device,
            window,
            hooks,
            config,
            applications: Vec::new(),
            current: None,
            timer: None,
            measure_gpu_time,
            last_gpu_time_ns: None,
        }
    }

    pub fn initialize(&mut self) -> LumeResult<()> {
        log::info!(
            "Initializing renderer for \"{}\" ({}x{})",
            self.config.window.title,
            self.config.window.width,
            self.config.window.height
        );
        self.hooks.on_initialize(&self.device, &self.config)
    }

    /// Register an application. The first one registered becomes the current one.
    pub fn add_application(&mut self, app: Box<dyn Application<D>>) -> LumeResult<()> {
        if self.applications.is_empty() {
            self.current = Some(0);
        }
        self.applications.push(app);
        let app = self
            .applications
            .last_mut()
            .ok_or(LumeError::Generic("application list is empty"))?;
        app.initialize(&self.device, &self.config)
    }

    /// Out-of-range indices leave the current application unchanged.
    pub fn switch_application(&mut self, index: usize) {
        if index < self.applications.len() {
            self.current = Some(index);
        }
    }

    pub fn current_application_index(&self) -> Option<usize> {
        self.current
    }

    pub fn update_frame(&mut self, dt: f64) -> LumeResult<()> {
        for event in self.window.poll_events() {
            match event {
                InputEvent::Key(key) => self.process_input(key)?,
                InputEvent::CursorPos { x, y } => self.process_cursor_pos(x, y)?,
            }
        }

        self.current_application_mut()?.update(dt);
        self.hooks.on_update_frame(dt);
        Ok(())
    }

    pub fn draw_frame(&mut self) -> LumeResult<()> {
        let index = self.current.ok_or(LumeError::Generic("no active application"))?;

        if self.measure_gpu_time {
            if self.timer.is_none() {
                self.timer = Some(self.device.create_timer_query()?);
            }

            self.device.set_rasterizer_discard(true);
            if let Some(timer) = self.timer.as_mut() {
                timer.begin();
            }

            self.hooks.on_begin_draw(&self.device);
            self.applications[index].draw(&self.device);

            let elapsed = match self.timer.as_mut() {
                Some(timer) => timer.end(),
                None => Ok(0),
            };
            self.hooks.on_end_draw(&self.device);
            self.device.set_rasterizer_discard(false);

            let elapsed = elapsed?;
            log::debug!("Geometry Processing Measured {} (ms)", elapsed / 1_000_000);
            self.last_gpu_time_ns = Some(elapsed);
        }

        self.hooks.on_begin_draw(&self.device);
        self.applications[index].draw(&self.device);
        self.hooks.on_end_draw(&self.device);
        Ok(())
    }

    pub fn last_gpu_time_ns(&self) -> Option<u64> {
        self.last_gpu_time_ns
    }

    pub fn should_exit(&self) -> bool {
        self.applications.is_empty() || self.window.should_close()
    }

    /// Drive frames until the window closes or no application is left, then clean up.
    pub fn run(&mut self) -> LumeResult<()> {
        let mut last_frame = Instant::now();
        while !self.should_exit() {
            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f64();
            last_frame = now;

            self.update_frame(dt)?;
            self.draw_frame()?;
            self.window.swap_buffers();
        }
        self.clean_up();
        Ok(())
    }

    pub fn clean_up(&mut self) {
        for app in self.applications.iter_mut() {
            app.clean_up();
        }
        self.applications.clear();
        self.current = None;
        self.timer = None;
        self.hooks.on_clean_up();
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    fn process_input(&mut self, key: KeyCode) -> LumeResult<()> {
        if key == KeyCode::ESCAPE {
            self.window.set_should_close(true);
        }
        self.hooks.on_process_input(key);
        self.current_application_mut()?.process_input(key);
        Ok(())
    }

    fn process_cursor_pos(&mut self, x: f64, y: f64) -> LumeResult<()> {
        self.current_application_mut()?.process_cursor_pos(x, y);
        Ok(())
    }

    fn current_application_mut(&mut self) -> LumeResult<&mut Box<dyn Application<D>>> {
        let index = self.current.ok_or(LumeError::Generic("no active application"))?;
        self.applications
            .get_mut(index)
            .ok_or(LumeError::Generic("no active application"))
    }
}
