use std::rc::Rc;

use crate::device::{GraphicsDevice, ProgramId, UniformLocation};
use crate::error::EngineError;

use super::Shader;

/// Linked shader program, released on drop.
///
/// Stages are detached right after linking, so they can be dropped as soon as
/// `link` returns.
pub struct Program<D: GraphicsDevice> {
    device: Rc<D>,
    id: ProgramId,
}

impl<D: GraphicsDevice> Program<D> {
    /// Attaches `stages` (in any order) and links them.
    pub fn link(device: Rc<D>, stages: &[&Shader<D>]) -> Result<Self, EngineError> {
        let id = device.create_program()?;
        let program = Self { device, id };

        for stage in stages {
            program.device.attach_shader(id, stage.id());
        }
        let linked = program.device.link_program(id);
        for stage in stages {
            program.device.detach_shader(id, stage.id());
        }

        if let Err(log) = linked {
            log::error!("program link failed:\n{log}");
            return Err(EngineError::ShaderLink { log });
        }

        log::info!("shader program linked ({id:?}, {} stages)", stages.len());
        Ok(program)
    }

    #[inline]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.device.uniform_location(self.id, name)
    }

    /// Makes this the active program.
    pub fn bind(&self) {
        self.device.use_program(Some(self.id));
    }

    /// Clears the active program.
    pub fn unbind(&self) {
        self.device.use_program(None);
    }
}

impl<D: GraphicsDevice> Drop for Program<D> {
    fn drop(&mut self) {
        self.device.delete_program(self.id);
        log::debug!("{:?} released", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Command, RecordingDevice};
    use crate::shader::ShaderStage;

    fn stages(dev: &Rc<RecordingDevice>) -> [Shader<RecordingDevice>; 3] {
        [
            Shader::compile(dev.clone(), ShaderStage::Vertex, "v").unwrap(),
            Shader::compile(dev.clone(), ShaderStage::Geometry, "g").unwrap(),
            Shader::compile(dev.clone(), ShaderStage::Fragment, "f").unwrap(),
        ]
    }

    #[test]
    fn link_attaches_every_stage_then_detaches() {
        let dev = Rc::new(RecordingDevice::new());
        let [vs, gs, fs] = stages(&dev);
        dev.clear_commands();

        let program = Program::link(dev.clone(), &[&vs, &gs, &fs]).unwrap();
        let p = program.id();

        assert_eq!(
            dev.commands(),
            vec![
                Command::CreateProgram(p),
                Command::AttachShader(p, vs.id()),
                Command::AttachShader(p, gs.id()),
                Command::AttachShader(p, fs.id()),
                Command::LinkProgram(p),
                Command::DetachShader(p, vs.id()),
                Command::DetachShader(p, gs.id()),
                Command::DetachShader(p, fs.id()),
            ]
        );
    }

    #[test]
    fn stages_can_be_dropped_after_link() {
        let dev = Rc::new(RecordingDevice::new());
        let program = {
            let [vs, gs, fs] = stages(&dev);
            Program::link(dev.clone(), &[&vs, &gs, &fs]).unwrap()
        };

        assert_eq!(dev.live_shader_count(), 0);
        assert_eq!(dev.live_program_count(), 1);

        program.bind();
        program.unbind();
        assert_eq!(
            dev.commands().last(),
            Some(&Command::UseProgram(None))
        );
    }

    #[test]
    fn link_failure_carries_log_and_releases_program() {
        let dev = Rc::new(RecordingDevice::failing_link());
        let [vs, gs, fs] = stages(&dev);

        let err = Program::link(dev.clone(), &[&vs, &gs, &fs]).err().unwrap();

        assert!(matches!(err, EngineError::ShaderLink { ref log } if !log.is_empty()));
        assert_eq!(dev.live_program_count(), 0);
    }

    #[test]
    fn uniform_location_lookup() {
        let dev = Rc::new(RecordingDevice::new());
        let [vs, gs, fs] = stages(&dev);
        let program = Program::link(dev.clone(), &[&vs, &gs, &fs]).unwrap();

        let world = program.uniform_location("worldMatrix");
        assert!(world.is_some());
        assert_eq!(world, program.uniform_location("worldMatrix"));
        assert_eq!(program.uniform_location(""), None);
    }
}
