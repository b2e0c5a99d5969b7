use std::rc::Rc;

use crate::device::{BufferId, BufferTarget, BufferUsage, GraphicsDevice};
use crate::error::EngineError;

/// Owned device buffer.
///
/// The device object is deleted exactly once, when this value is dropped.
/// Keeping an `Rc` to the device ties the buffer to the context that created it.
pub struct GpuBuffer<D: GraphicsDevice> {
    device: Rc<D>,
    id: BufferId,
    target: BufferTarget,
    usage: BufferUsage,
    len: usize,
}

impl<D: GraphicsDevice> GpuBuffer<D> {
    /// Creates a buffer and fills it with `data`.
    ///
    /// The buffer is bound to `target` only for the upload and unbound afterwards.
    pub fn with_data(
        device: Rc<D>,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<Self, EngineError> {
        let id = device.create_buffer()?;
        let buffer = Self {
            device,
            id,
            target,
            usage,
            len: data.len(),
        };

        buffer.bind();
        buffer.device.buffer_data(target, data, usage);
        buffer.unbind();

        log::trace!("{id:?} created: {target:?}, {} bytes, {usage:?}", data.len());
        Ok(buffer)
    }

    #[inline]
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Size of the current store in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn device(&self) -> &Rc<D> {
        &self.device
    }

    pub fn bind(&self) {
        self.device.bind_buffer(self.target, Some(self.id));
    }

    /// Clears the binding point this buffer uses.
    pub fn unbind(&self) {
        self.device.bind_buffer(self.target, None);
    }

    /// Replaces the whole store with `data`. The buffer must be bound.
    pub fn upload_bound(&mut self, data: &[u8]) {
        self.device.buffer_data(self.target, data, self.usage);
        self.len = data.len();
    }
}

impl<D: GraphicsDevice> Drop for GpuBuffer<D> {
    fn drop(&mut self) {
        self.device.delete_buffer(self.id);
        log::trace!("{:?} released", self.id);
    }
}
