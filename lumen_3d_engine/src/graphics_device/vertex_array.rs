/// Vertex array trait and descriptor
///
/// A vertex array binds vertex buffers to the attribute slots of one program,
/// plus an optional index buffer.

use std::sync::Arc;
use crate::graphics_device::{Buffer, BufferFormat, IndexType};

/// One attribute stream of a vertex array
#[derive(Clone)]
pub struct VertexAttributeDesc {
    /// Attribute name in the vertex shader (e.g. "vertPosition")
    pub name: String,
    /// Tightly packed source buffer
    pub buffer: Arc<dyn Buffer>,
    /// Element format of the stream
    pub format: BufferFormat,
}

/// Descriptor for creating a vertex array
#[derive(Clone, Default)]
pub struct VertexArrayDesc {
    /// Attribute streams
    pub attributes: Vec<VertexAttributeDesc>,
    /// Index buffer and its element type
    pub index_buffer: Option<(Arc<dyn Buffer>, IndexType)>,
}

/// Vertex array resource trait
///
/// Holds references to its buffers; released when the last reference is
/// dropped.
pub trait VertexArray: Send + Sync {
    /// Number of attribute streams bound to an active program attribute
    fn attribute_count(&self) -> usize;

    /// Index type, or `None` for non-indexed arrays
    fn index_type(&self) -> Option<IndexType>;
}
