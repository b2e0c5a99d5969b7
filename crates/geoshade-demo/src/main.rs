mod config;

use std::rc::Rc;

use anyhow::{Context, Result};
use geoshade_engine::core::run;
use geoshade_engine::device::GraphicsDevice;
use geoshade_engine::logging::init_logging;
use geoshade_engine::render::FrameDriver;
use geoshade_engine::shader::{Program, Shader, ShaderPaths};
use geoshade_engine::window::GlWindow;

use config::DemoConfig;

fn main() -> Result<()> {
    let config = DemoConfig::default();
    init_logging(config.logging.clone());

    let (window, device) =
        GlWindow::create(config.runtime.clone()).context("failed to open the demo window")?;

    let program = link_program(&device, &config.shaders).context("failed to build shaders")?;
    let driver = FrameDriver::new(device, program)?;

    run(window, driver)?;

    log::info!("bye");
    Ok(())
}

/// Compiles vertex, geometry and fragment stages and links them.
///
/// The stage objects are released when this returns; the program keeps the
/// linked binary.
fn link_program<D: GraphicsDevice>(device: &Rc<D>, paths: &ShaderPaths) -> Result<Program<D>> {
    let stages = paths
        .stages()
        .into_iter()
        .map(|(stage, path)| Shader::from_file(device.clone(), stage, path))
        .collect::<Result<Vec<_>, _>>()?;

    let refs: Vec<&Shader<D>> = stages.iter().collect();
    Ok(Program::link(device.clone(), &refs)?)
}
