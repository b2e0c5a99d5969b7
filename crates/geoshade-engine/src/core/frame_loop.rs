use crate::coords::Viewport;
use crate::device::GraphicsDevice;
use crate::error::EngineError;
use crate::render::FrameDriver;
use crate::window::{WindowSignal, WindowSystem};

/// Frames between periodic timing reports at `debug` level.
const REPORT_INTERVAL: u64 = 600;

/// Sets a full-window viewport. No letterboxing, no aspect correction.
pub fn resize_viewport<D: GraphicsDevice + ?Sized>(device: &D, width: u32, height: u32) {
    device.viewport(Viewport::full(width, height));
    log::debug!("viewport resized to {width}x{height}");
}

/// Runs `driver` until `window` reports a close request, then shuts down.
///
/// The driver's resources are released before the window system terminates,
/// also when presenting a frame fails; that error is returned afterwards.
pub fn run<W, D>(mut window: W, mut driver: FrameDriver<D>) -> Result<(), EngineError>
where
    W: WindowSystem,
    D: GraphicsDevice,
{
    log::info!("entering frame loop");

    let result = drive(&mut window, &mut driver);

    driver.shutdown();
    window.terminate();

    result
}

fn drive<W, D>(window: &mut W, driver: &mut FrameDriver<D>) -> Result<(), EngineError>
where
    W: WindowSystem,
    D: GraphicsDevice,
{
    while !window.should_close() {
        let ft = window.tick();

        driver.update(ft.dt);
        driver.render();

        window.swap_buffers()?;

        for signal in window.poll_events() {
            match signal {
                WindowSignal::Resized { width, height } => {
                    resize_viewport(&**driver.device(), width, height)
                }
            }
        }

        if ft.frame_index > 0 && ft.frame_index % REPORT_INTERVAL == 0 {
            log::debug!(
                "frame {}: t={:.2}s, dt={:.2}ms",
                ft.frame_index,
                driver.total_time(),
                ft.dt * 1000.0
            );
        }
    }

    log::info!("close signal observed; leaving frame loop");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::device::{Command, Primitive, RecordingDevice};
    use crate::render::rotating_points;
    use crate::shader::{Program, Shader, ShaderStage};
    use crate::time::FrameTime;

    /// Window that closes after a fixed number of frames.
    struct ScriptedWindow {
        device: Rc<RecordingDevice>,
        frames_left: usize,
        frame_index: u64,
        dt: f32,
        resize_after_first: Option<(u32, u32)>,
        fail_present: bool,
    }

    impl ScriptedWindow {
        fn new(device: Rc<RecordingDevice>, frames: usize) -> Self {
            Self {
                device,
                frames_left: frames,
                frame_index: 0,
                dt: 0.5,
                resize_after_first: None,
                fail_present: false,
            }
        }
    }

    impl WindowSystem for ScriptedWindow {
        fn should_close(&self) -> bool {
            self.frames_left == 0
        }

        fn tick(&mut self) -> FrameTime {
            let ft = FrameTime::from_dt(self.dt, self.frame_index);
            self.frame_index += 1;
            ft
        }

        fn swap_buffers(&mut self) -> Result<(), EngineError> {
            self.device.mark("swap");
            if self.fail_present {
                return Err(EngineError::Present("surface lost".to_string()));
            }
            Ok(())
        }

        fn poll_events(&mut self) -> Vec<WindowSignal> {
            self.device.mark("poll");
            self.frames_left -= 1;
            match self.resize_after_first.take() {
                Some((width, height)) => vec![WindowSignal::Resized { width, height }],
                None => Vec::new(),
            }
        }

        fn terminate(self) {
            self.device.mark("terminate");
        }
    }

    fn driver(dev: &Rc<RecordingDevice>) -> FrameDriver<RecordingDevice> {
        let program = {
            let vs = Shader::compile(dev.clone(), ShaderStage::Vertex, "v").unwrap();
            let gs = Shader::compile(dev.clone(), ShaderStage::Geometry, "g").unwrap();
            let fs = Shader::compile(dev.clone(), ShaderStage::Fragment, "f").unwrap();
            Program::link(dev.clone(), &[&vs, &gs, &fs]).unwrap()
        };
        FrameDriver::new(dev.clone(), program).unwrap()
    }

    fn is_draw_or_upload(c: &Command) -> bool {
        matches!(
            c,
            Command::DrawArrays { .. } | Command::DrawElements { .. } | Command::BufferData { .. }
        )
    }

    #[test]
    fn resize_sets_full_window_viewport() {
        let dev = RecordingDevice::new();
        resize_viewport(&dev, 400, 300);
        assert_eq!(dev.commands(), vec![Command::Viewport(Viewport::new(0, 0, 400, 300))]);
    }

    #[test]
    fn one_draw_per_frame_until_close() {
        let dev = Rc::new(RecordingDevice::new());
        let d = driver(&dev);
        dev.clear_commands();

        run(ScriptedWindow::new(dev.clone(), 3), d).unwrap();

        let draws = dev
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::DrawArrays { primitive: Primitive::Points, count: 4, .. }))
            .count();
        assert_eq!(draws, 3);
    }

    #[test]
    fn nothing_is_drawn_or_uploaded_after_close() {
        let dev = Rc::new(RecordingDevice::new());
        let d = driver(&dev);
        dev.clear_commands();

        run(ScriptedWindow::new(dev.clone(), 2), d).unwrap();

        let cmds = dev.commands();
        let last_poll = cmds
            .iter()
            .rposition(|c| *c == Command::Marker("poll"))
            .unwrap();
        assert!(!cmds[last_poll..].iter().any(is_draw_or_upload));
    }

    #[test]
    fn shutdown_releases_gpu_objects_before_terminate() {
        let dev = Rc::new(RecordingDevice::new());
        let d = driver(&dev);
        dev.clear_commands();

        run(ScriptedWindow::new(dev.clone(), 1), d).unwrap();

        let cmds = dev.commands();
        let tail: Vec<_> = cmds[cmds.len() - 3..].to_vec();
        assert!(matches!(tail[0], Command::DeleteProgram(_)));
        assert!(matches!(tail[1], Command::DeleteBuffer(_)));
        assert_eq!(tail[2], Command::Marker("terminate"));
        assert_eq!(dev.live_buffer_count(), 0);
        assert_eq!(dev.live_program_count(), 0);
    }

    #[test]
    fn already_closed_window_draws_nothing() {
        let dev = Rc::new(RecordingDevice::new());
        let d = driver(&dev);
        dev.clear_commands();

        run(ScriptedWindow::new(dev.clone(), 0), d).unwrap();

        assert!(!dev.commands().iter().any(is_draw_or_upload));
        assert_eq!(dev.commands().last(), Some(&Command::Marker("terminate")));
    }

    #[test]
    fn resize_signal_updates_viewport() {
        let dev = Rc::new(RecordingDevice::new());
        let d = driver(&dev);
        let mut window = ScriptedWindow::new(dev.clone(), 2);
        window.resize_after_first = Some((1024, 768));

        run(window, d).unwrap();

        let viewports: Vec<_> = dev
            .commands()
            .into_iter()
            .filter(|c| matches!(c, Command::Viewport(_)))
            .collect();
        assert_eq!(viewports, vec![Command::Viewport(Viewport::full(1024, 768))]);
    }

    #[test]
    fn uploads_follow_accumulated_time() {
        let dev = Rc::new(RecordingDevice::new());
        let d = driver(&dev);
        dev.clear_commands();

        // Two frames of 0.5s each.
        run(ScriptedWindow::new(dev.clone(), 2), d).unwrap();

        let uploads: Vec<Vec<u8>> = dev
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::BufferData { data, .. } => Some(data),
                _ => None,
            })
            .collect();
        assert_eq!(
            uploads,
            vec![
                bytemuck::cast_slice::<_, u8>(&rotating_points(0.5)).to_vec(),
                bytemuck::cast_slice::<_, u8>(&rotating_points(1.0)).to_vec(),
            ]
        );
    }

    #[test]
    fn present_failure_still_shuts_down_in_order() {
        let dev = Rc::new(RecordingDevice::new());
        let d = driver(&dev);
        let mut window = ScriptedWindow::new(dev.clone(), 5);
        window.fail_present = true;

        let err = run(window, d).unwrap_err();

        assert!(matches!(err, EngineError::Present(_)));
        assert_eq!(dev.live_buffer_count(), 0);
        assert_eq!(dev.live_program_count(), 0);
        assert_eq!(dev.commands().last(), Some(&Command::Marker("terminate")));
        let draws = dev
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::DrawArrays { .. }))
            .count();
        assert_eq!(draws, 1);
    }
}
