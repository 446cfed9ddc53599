/// Command log and live resource counters shared by the headless device and
/// its resources

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use lumen_3d_engine::lumen3d::graphics_device::{ClearFlags, UniformValue, Viewport};

/// One command received by the headless device
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateBuffer { label: String, size: u64 },
    CreateProgram { label: String },
    CreateVertexArray { attributes: usize, indexed: bool },
    UseProgram { label: String },
    BindVertexArray,
    /// Upload resolved back to the uniform's full name
    UploadUniform { name: String, value: UniformValue },
    SetPipelineState { blend: bool, depth_write: bool },
    SetViewport(Viewport),
    Clear { color: [f32; 4], flags: ClearFlags },
    Draw { vertex_count: u32 },
    DrawIndexed { index_count: u32 },
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    commands: Mutex<Vec<Command>>,
    pub(crate) live_buffers: AtomicUsize,
    pub(crate) live_programs: AtomicUsize,
    pub(crate) buffer_bytes: AtomicU64,
}

impl Recorder {
    pub(crate) fn push(&self, command: Command) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command);
        }
    }
}

/// Read access to what a headless device recorded
///
/// Stays valid after the device itself is moved behind
/// `Arc<Mutex<dyn GraphicsDevice>>`.
#[derive(Debug, Clone)]
pub struct HeadlessInspector {
    recorder: Arc<Recorder>,
}

impl HeadlessInspector {
    pub(crate) fn new(recorder: Arc<Recorder>) -> Self {
        Self { recorder }
    }

    /// Snapshot of the command log
    pub fn commands(&self) -> Vec<Command> {
        self.recorder
            .commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }

    /// Forget every recorded command
    pub fn clear_commands(&self) {
        if let Ok(mut commands) = self.recorder.commands.lock() {
            commands.clear();
        }
    }

    /// Number of recorded commands matching `predicate`
    pub fn count(&self, predicate: impl Fn(&Command) -> bool) -> usize {
        self.recorder
            .commands
            .lock()
            .map(|commands| commands.iter().filter(|c| predicate(c)).count())
            .unwrap_or(0)
    }

    /// Every value uploaded to `name`, oldest first
    pub fn uploads(&self, name: &str) -> Vec<UniformValue> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                Command::UploadUniform { name: n, value } if n == name => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Last value uploaded to `name`
    pub fn last_upload(&self, name: &str) -> Option<UniformValue> {
        self.uploads(name).pop()
    }

    /// Draw commands (indexed or not) in call order
    pub fn draws(&self) -> Vec<Command> {
        self.commands()
            .into_iter()
            .filter(|c| matches!(c, Command::Draw { .. } | Command::DrawIndexed { .. }))
            .collect()
    }

    /// Buffers not yet dropped
    pub fn live_buffers(&self) -> usize {
        self.recorder.live_buffers.load(Ordering::SeqCst)
    }

    /// Programs not yet dropped
    pub fn live_programs(&self) -> usize {
        self.recorder.live_programs.load(Ordering::SeqCst)
    }

    /// Bytes held by live buffers
    pub fn buffer_bytes(&self) -> u64 {
        self.recorder.buffer_bytes.load(Ordering::SeqCst)
    }
}
