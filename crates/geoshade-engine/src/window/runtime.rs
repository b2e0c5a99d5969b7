use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::device::GlowDevice;
use crate::error::EngineError;
use crate::time::{FrameClock, FrameTime};

use super::{RuntimeConfig, WindowSignal, WindowSystem};

/// Upper bound on event-loop pumps while waiting for the window to come up.
const STARTUP_PUMPS: usize = 100;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// Window + GL context driven by polling.
///
/// The `winit` event loop is pumped from `poll_events` instead of owning the
/// thread, so the caller keeps a plain `while !should_close()` loop.
pub struct GlWindow {
    event_loop: EventLoop<()>,
    platform: Platform,
    clock: FrameClock,
}

impl GlWindow {
    /// Opens the window, creates a current GL context on it, and loads the device.
    pub fn create(config: RuntimeConfig) -> Result<(Self, Rc<GlowDevice>), EngineError> {
        let mut event_loop = EventLoop::new()
            .map_err(|e| EngineError::Initialization(format!("failed to create event loop: {e}")))?;
        let mut platform = Platform::new(config);

        // Desktop platforms deliver `resumed` on the first pump.
        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut platform);

            if let Some(err) = platform.init_error.take() {
                return Err(EngineError::Initialization(err));
            }

            if let Some(device) = platform.gl.as_ref().map(|gl| gl.device.clone()) {
                let window = Self {
                    event_loop,
                    platform,
                    clock: FrameClock::new(),
                };
                return Ok((window, device));
            }

            if let PumpStatus::Exit(code) = status {
                return Err(EngineError::Initialization(format!(
                    "event loop exited during startup (code {code})"
                )));
            }
        }

        Err(EngineError::Initialization(
            "window was not created by the platform".to_string(),
        ))
    }
}

impl WindowSystem for GlWindow {
    fn should_close(&self) -> bool {
        self.platform.close_requested
    }

    fn tick(&mut self) -> FrameTime {
        self.clock.tick()
    }

    fn swap_buffers(&mut self) -> Result<(), EngineError> {
        let Some(gl) = self.platform.gl.as_ref() else {
            return Err(EngineError::Present("no GL surface".to_string()));
        };

        gl.window.pre_present_notify();
        gl.surface
            .swap_buffers(&gl.context)
            .map_err(|e| EngineError::Present(e.to_string()))
    }

    fn poll_events(&mut self) -> Vec<WindowSignal> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.platform);

        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited (code {code})");
            self.platform.close_requested = true;
        }

        std::mem::take(&mut self.platform.signals)
    }

    fn terminate(mut self) {
        if let Some(gl) = self.platform.gl.take() {
            gl.device.release();
            // Surface before context before window, per field order.
            drop(gl);
        }
        log::info!("window system terminated");
    }
}

/// GL objects bound to the window. Field order is drop order.
struct GlState {
    device: Rc<GlowDevice>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl GlState {
    fn resize(&self, size: PhysicalSize<u32>) {
        // Zero-sized surfaces (minimized windows) cannot be configured.
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        self.surface.resize(&self.context, w, h);
    }
}

/// `winit` handler collecting the state the frame loop polls for.
struct Platform {
    config: RuntimeConfig,
    gl: Option<GlState>,
    init_error: Option<String>,
    signals: Vec<WindowSignal>,
    close_requested: bool,
}

impl Platform {
    fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            gl: None,
            init_error: None,
            signals: Vec::new(),
            close_requested: false,
        }
    }
}

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gl.is_some() {
            return;
        }

        match create_gl_state(event_loop, &self.config) {
            Ok(gl) => self.gl = Some(gl),
            Err(e) => {
                log::error!("failed to create GL window: {e:#}");
                self.init_error = Some(format!("{e:#}"));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.close_requested = true;
            }

            WindowEvent::Resized(size) => {
                if let Some(gl) = self.gl.as_ref() {
                    gl.resize(size);
                }
                self.signals.push(WindowSignal::Resized {
                    width: size.width,
                    height: size.height,
                });
            }

            _ => {}
        }
    }
}

fn create_gl_state(event_loop: &ActiveEventLoop, config: &RuntimeConfig) -> Result<GlState> {
    let attrs = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64));

    let (window, gl_config) = DisplayBuilder::new()
        .with_window_attributes(Some(attrs))
        .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
        .map_err(|e| anyhow!("failed to create GL display: {e}"))?;
    let window = window.context("display builder did not create a window")?;

    let raw_handle = window
        .window_handle()
        .context("window has no native handle")?
        .as_raw();

    let (major, minor) = config.gl_version;
    let context_attrs = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
        .with_profile(GlProfile::Core)
        .build(Some(raw_handle));

    let display = gl_config.display();

    // SAFETY: the raw handle comes from `window`, which outlives the context.
    let not_current = unsafe { display.create_context(&gl_config, &context_attrs) }
        .with_context(|| format!("failed to create OpenGL {major}.{minor} core context"))?;

    let surface_attrs = window
        .build_surface_attributes(Default::default())
        .context("failed to describe window surface")?;

    // SAFETY: as above, the surface is dropped before `window`.
    let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
        .context("failed to create window surface")?;

    let context = not_current
        .make_current(&surface)
        .context("failed to make GL context current")?;

    if config.vsync {
        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            log::warn!("vsync unavailable: {e}");
        }
    }

    // SAFETY: the context was made current on this thread above and stays
    // current until `GlState` is dropped.
    let device = unsafe {
        let gl = glow::Context::from_loader_function_cstr(|symbol| display.get_proc_address(symbol));
        GlowDevice::new(gl)
    }?;

    let size = window.inner_size();
    log::info!(
        "window '{}' created ({}x{} physical)",
        config.title,
        size.width,
        size.height
    );

    Ok(GlState {
        device: Rc::new(device),
        surface,
        context,
        window,
    })
}

/// Prefers the config with the most samples.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best })
        .expect("glutin offers at least one GL config")
}
