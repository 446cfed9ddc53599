/// Buffer trait and buffer descriptor

use crate::error::Result;

/// Buffer usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex attribute data
    Vertex,
    /// Index data
    Index,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
    /// Debug label (shows up in backend logs)
    pub label: String,
}

/// Buffer data format for vertex attributes
///
/// Defines the data type and component count of one attribute element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    R32_SFLOAT,          // float (4 bytes)
    R32G32_SFLOAT,       // vec2 (8 bytes)
    R32G32B32_SFLOAT,    // vec3 (12 bytes)
    R32G32B32A32_SFLOAT, // vec4 (16 bytes)
}

impl BufferFormat {
    /// Returns size in bytes for this format
    pub fn size_bytes(&self) -> u32 {
        self.component_count() * 4
    }

    /// Number of 32-bit components per element
    pub fn component_count(&self) -> u32 {
        match self {
            BufferFormat::R32_SFLOAT => 1,
            BufferFormat::R32G32_SFLOAT => 2,
            BufferFormat::R32G32B32_SFLOAT => 3,
            BufferFormat::R32G32B32A32_SFLOAT => 4,
        }
    }
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types.
/// The buffer is released when the last reference is dropped.
pub trait Buffer: Send + Sync {
    /// Update buffer data
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset into the buffer in bytes
    /// * `data` - Data to write
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;

    /// Size in bytes
    fn size(&self) -> u64;

    /// Usage the buffer was created with
    fn usage(&self) -> BufferUsage;
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
