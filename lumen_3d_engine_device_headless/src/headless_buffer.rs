/// Buffer - headless implementation of the Buffer trait

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use lumen_3d_engine::lumen3d::{Error, Result};
use lumen_3d_engine::lumen3d::graphics_device::{Buffer, BufferUsage};

use crate::headless_recorder::Recorder;

/// CPU-side buffer
pub struct HeadlessBuffer {
    label: String,
    usage: BufferUsage,
    data: Mutex<Vec<u8>>,
    recorder: Arc<Recorder>,
}

impl HeadlessBuffer {
    pub(crate) fn new(label: String, usage: BufferUsage, data: &[u8], recorder: Arc<Recorder>) -> Self {
        recorder.live_buffers.fetch_add(1, Ordering::SeqCst);
        recorder.buffer_bytes.fetch_add(data.len() as u64, Ordering::SeqCst);
        Self {
            label,
            usage,
            data: Mutex::new(data.to_vec()),
            recorder,
        }
    }

    /// Copy of the current contents
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().map(|data| data.clone()).unwrap_or_default()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Buffer for HeadlessBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let mut contents = self.data.lock()
            .map_err(|_| Error::BackendError(format!("Buffer '{}' lock poisoned", self.label)))?;
        let start = offset as usize;
        let end = start.checked_add(data.len()).filter(|end| *end <= contents.len());
        let Some(end) = end else {
            return Err(Error::InvalidResource(format!(
                "update of {} bytes at offset {} overflows buffer '{}' ({} bytes)",
                data.len(),
                offset,
                self.label,
                contents.len()
            )));
        };
        contents[start..end].copy_from_slice(data);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.data.lock().map(|data| data.len() as u64).unwrap_or(0)
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }
}

impl Drop for HeadlessBuffer {
    fn drop(&mut self) {
        let size = self.size();
        self.recorder.live_buffers.fetch_sub(1, Ordering::SeqCst);
        self.recorder.buffer_bytes.fetch_sub(size, Ordering::SeqCst);
    }
}
