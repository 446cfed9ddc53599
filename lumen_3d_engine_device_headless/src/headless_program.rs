/// Program and VertexArray - headless implementations

use std::sync::atomic::Ordering;
use std::sync::Arc;
use lumen_3d_engine::lumen3d::graphics_device::{
    Buffer, IndexType, Program, ProgramReflection, VertexArray,
};

use crate::headless_recorder::Recorder;

/// Linked program holding the reflected interface of its two stages
pub struct HeadlessProgram {
    label: String,
    reflection: ProgramReflection,
    recorder: Arc<Recorder>,
}

impl HeadlessProgram {
    pub(crate) fn new(label: String, reflection: ProgramReflection, recorder: Arc<Recorder>) -> Self {
        recorder.live_programs.fetch_add(1, Ordering::SeqCst);
        Self { label, reflection, recorder }
    }
}

impl Program for HeadlessProgram {
    fn reflection(&self) -> &ProgramReflection {
        &self.reflection
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for HeadlessProgram {
    fn drop(&mut self) {
        self.recorder.live_programs.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Vertex array keeping its buffers alive
pub struct HeadlessVertexArray {
    pub(crate) attribute_count: usize,
    pub(crate) index_type: Option<IndexType>,
    pub(crate) _buffers: Vec<Arc<dyn Buffer>>,
}

impl VertexArray for HeadlessVertexArray {
    fn attribute_count(&self) -> usize {
        self.attribute_count
    }

    fn index_type(&self) -> Option<IndexType> {
        self.index_type
    }
}
