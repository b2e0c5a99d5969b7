use std::rc::Rc;

use glam::Vec2;

use crate::coords::ColorRgba;
use crate::device::{BufferTarget, BufferUsage, GraphicsDevice, Primitive, VertexAttrib};
use crate::error::EngineError;
use crate::shader::Program;

use super::buffer::GpuBuffer;

/// Number of points streamed each frame.
pub const POINT_COUNT: usize = 4;

/// Placeholder points uploaded at startup; replaced before the first draw.
pub const INITIAL_POINTS: [Vec2; POINT_COUNT] = [
    Vec2::new(-0.5, 0.5),
    Vec2::new(0.5, 0.5),
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
];

/// Four points on the unit circle at angle `theta` (radians).
///
/// Points 0/1 and 2/3 are antipodal pairs; point 2 is point 0 rotated by -90°.
pub fn rotating_points(theta: f32) -> [Vec2; POINT_COUNT] {
    let (s, c) = theta.sin_cos();
    [
        Vec2::new(c, s),
        Vec2::new(-c, -s),
        Vec2::new(s, -c),
        Vec2::new(-s, c),
    ]
}

/// Per-frame point renderer.
///
/// Owns the dynamic point buffer and the linked program. Each frame the full
/// point set is recomputed from the accumulated time and re-uploaded; there
/// are no partial updates.
pub struct FrameDriver<D: GraphicsDevice> {
    device: Rc<D>,
    program: Program<D>,
    points_vbo: GpuBuffer<D>,
    points: [Vec2; POINT_COUNT],
    total_time: f32,
    clear_color: ColorRgba,
}

impl<D: GraphicsDevice> FrameDriver<D> {
    /// Uploads the initial points and takes ownership of `program`.
    pub fn new(device: Rc<D>, program: Program<D>) -> Result<Self, EngineError> {
        let points = INITIAL_POINTS;
        let points_vbo = GpuBuffer::with_data(
            device.clone(),
            BufferTarget::Array,
            bytemuck::cast_slice(&points),
            BufferUsage::Dynamic,
        )?;

        log::debug!("frame driver ready ({POINT_COUNT} points, {:?})", points_vbo.id());

        Ok(Self {
            device,
            program,
            points_vbo,
            points,
            total_time: 0.0,
            clear_color: ColorRgba::black(),
        })
    }

    #[inline]
    pub fn device(&self) -> &Rc<D> {
        &self.device
    }

    #[inline]
    pub fn points(&self) -> &[Vec2; POINT_COUNT] {
        &self.points
    }

    #[inline]
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Accumulates `dt` seconds and recomputes the points.
    pub fn update(&mut self, dt: f32) {
        self.total_time += dt;
        self.points = rotating_points(self.total_time);
    }

    /// Clears, streams the points and draws them as `POINTS` primitives.
    pub fn render(&mut self) {
        let device = &*self.device;

        device.clear(self.clear_color);

        self.points_vbo.bind();
        self.points_vbo.upload_bound(bytemuck::cast_slice(&self.points));
        device.vertex_attrib_pointer(VertexAttrib::new(
            0,
            2,
            std::mem::size_of::<Vec2>() as u32,
            0,
        ));
        self.points_vbo.unbind();
        device.enable_vertex_attrib(0);

        self.program.bind();
        device.draw_arrays(Primitive::Points, 0, POINT_COUNT as u32);
        self.program.unbind();

        device.disable_vertex_attrib(0);

        log::trace!("frame drawn at t={:.3}s", self.total_time);
    }

    /// Releases the program, then the point buffer.
    pub fn shutdown(self) {
        let Self {
            program,
            points_vbo,
            total_time,
            ..
        } = self;

        drop(program);
        drop(points_vbo);

        log::info!("frame driver shut down after {total_time:.2}s");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Command, RecordingDevice};
    use crate::shader::{Shader, ShaderStage};

    const EPS: f32 = 1e-6;

    fn program(dev: &Rc<RecordingDevice>) -> Program<RecordingDevice> {
        let vs = Shader::compile(dev.clone(), ShaderStage::Vertex, "v").unwrap();
        let gs = Shader::compile(dev.clone(), ShaderStage::Geometry, "g").unwrap();
        let fs = Shader::compile(dev.clone(), ShaderStage::Fragment, "f").unwrap();
        Program::link(dev.clone(), &[&vs, &gs, &fs]).unwrap()
    }

    #[test]
    fn points_at_zero_are_axis_aligned() {
        let p = rotating_points(0.0);
        assert_eq!(p[0], Vec2::new(1.0, 0.0));
        assert_eq!(p[1], Vec2::new(-1.0, 0.0));
        assert_eq!(p[2], Vec2::new(0.0, -1.0));
        assert_eq!(p[3], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn points_keep_their_symmetry_over_time() {
        for step in 0..2000 {
            let t = step as f32 * 0.0173;
            let [p0, p1, p2, p3] = rotating_points(t);

            assert_eq!(p0, -p1, "t={t}");
            assert_eq!(p3, -p2, "t={t}");
            // rotate(p0, -90°) = (y, -x)
            assert_eq!(p2, Vec2::new(p0.y, -p0.x), "t={t}");

            for p in [p0, p1, p2, p3] {
                assert!((p.length() - 1.0).abs() < EPS, "t={t} |p|={}", p.length());
            }
        }
    }

    #[test]
    fn update_accumulates_time() {
        let dev = Rc::new(RecordingDevice::new());
        let mut driver = FrameDriver::new(dev.clone(), program(&dev)).unwrap();
        assert_eq!(driver.points(), &INITIAL_POINTS);

        driver.update(0.25);
        driver.update(0.5);
        assert!((driver.total_time() - 0.75).abs() < EPS);
        assert_eq!(driver.points(), &rotating_points(0.75));
    }

    #[test]
    fn render_streams_all_points_and_draws_four() {
        let dev = Rc::new(RecordingDevice::new());
        let mut driver = FrameDriver::new(dev.clone(), program(&dev)).unwrap();
        let vbo = driver.points_vbo.id();
        let prog = driver.program.id();
        driver.update(1.0);
        dev.clear_commands();

        driver.render();

        let expected = rotating_points(1.0);
        assert_eq!(
            dev.commands(),
            vec![
                Command::Clear(ColorRgba::black()),
                Command::BindBuffer(BufferTarget::Array, Some(vbo)),
                Command::BufferData {
                    target: BufferTarget::Array,
                    data: bytemuck::cast_slice::<_, u8>(&expected).to_vec(),
                    usage: BufferUsage::Dynamic,
                },
                Command::VertexAttribPointer(VertexAttrib::new(0, 2, 8, 0)),
                Command::BindBuffer(BufferTarget::Array, None),
                Command::EnableVertexAttrib(0),
                Command::UseProgram(Some(prog)),
                Command::DrawArrays {
                    primitive: Primitive::Points,
                    first: 0,
                    count: 4,
                },
                Command::UseProgram(None),
                Command::DisableVertexAttrib(0),
            ]
        );
    }

    #[test]
    fn shutdown_releases_program_before_buffer() {
        let dev = Rc::new(RecordingDevice::new());
        let driver = FrameDriver::new(dev.clone(), program(&dev)).unwrap();
        let vbo = driver.points_vbo.id();
        let prog = driver.program.id();
        dev.clear_commands();

        driver.shutdown();

        assert_eq!(
            dev.commands(),
            vec![Command::DeleteProgram(prog), Command::DeleteBuffer(vbo)]
        );
        assert_eq!(dev.live_buffer_count(), 0);
        assert_eq!(dev.live_program_count(), 0);
    }
}
