/// Fixed-function pipeline state, draw topology and frame clearing

use bitflags::bitflags;

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Triangle list
    TriangleList,
    /// Triangle strip
    TriangleStrip,
    /// Line list
    LineList,
    /// Point list
    PointList,
}

impl PrimitiveTopology {
    /// Number of complete primitives formed by `count` vertices or indices
    pub fn primitive_count(&self, count: u32) -> u32 {
        match self {
            PrimitiveTopology::TriangleList => count / 3,
            PrimitiveTopology::TriangleStrip => count.saturating_sub(2),
            PrimitiveTopology::LineList => count / 2,
            PrimitiveTopology::PointList => count,
        }
    }
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 16-bit indices (max 65535 vertices)
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

// ===== RASTERIZATION =====

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    /// Counter-clockwise vertices define front face
    CounterClockwise,
    /// Clockwise vertices define front face
    Clockwise,
}

/// Rasterization fixed-function state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizationState {
    /// Face culling mode
    pub cull_mode: CullMode,
    /// Front face winding order
    pub front_face: FrontFace,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            front_face: FrontFace::CounterClockwise,
        }
    }
}

// ===== DEPTH =====

/// Comparison operator for the depth test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Never pass
    Never,
    /// Pass if value < reference
    Less,
    /// Pass if value == reference
    Equal,
    /// Pass if value <= reference
    LessOrEqual,
    /// Pass if value > reference
    Greater,
    /// Pass if value != reference
    NotEqual,
    /// Pass if value >= reference
    GreaterOrEqual,
    /// Always pass
    Always,
}

/// Depth testing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthState {
    /// Enable depth testing
    pub depth_test_enable: bool,
    /// Enable writing to depth buffer
    pub depth_write_enable: bool,
    /// Depth comparison operator
    pub depth_compare_op: CompareOp,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare_op: CompareOp::Less,
        }
    }
}

// ===== COLOR BLEND =====

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    /// result = src * srcFactor + dst * dstFactor
    Add,
    /// result = src * srcFactor - dst * dstFactor
    Subtract,
    /// result = dst * dstFactor - src * srcFactor
    ReverseSubtract,
}

/// Color blending state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlendState {
    /// Enable blending
    pub blend_enable: bool,
    /// Source blend factor
    pub src_factor: BlendFactor,
    /// Destination blend factor
    pub dst_factor: BlendFactor,
    /// Blend operation
    pub blend_op: BlendOp,
}

impl ColorBlendState {
    /// Classic "over" alpha blending
    pub fn alpha_blending() -> Self {
        Self {
            blend_enable: true,
            src_factor: BlendFactor::SrcAlpha,
            dst_factor: BlendFactor::OneMinusSrcAlpha,
            blend_op: BlendOp::Add,
        }
    }
}

impl Default for ColorBlendState {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::Zero,
            blend_op: BlendOp::Add,
        }
    }
}

// ===== PIPELINE STATE =====

/// Complete fixed-function state applied before a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineState {
    /// Rasterization state
    pub rasterization: RasterizationState,
    /// Depth testing state
    pub depth: DepthState,
    /// Color blending state
    pub color_blend: ColorBlendState,
}

impl PipelineState {
    /// Depth test and write on, back-face culling, counter-clockwise front
    /// faces, no blending
    pub fn opaque() -> Self {
        Self::default()
    }

    /// Same as `opaque` with alpha blending on and depth writes off
    pub fn transparent() -> Self {
        Self {
            rasterization: RasterizationState::default(),
            depth: DepthState {
                depth_write_enable: false,
                ..DepthState::default()
            },
            color_blend: ColorBlendState::alpha_blending(),
        }
    }
}

// ===== VIEWPORT & CLEAR =====

/// Viewport rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Viewport covering a whole surface of the given size
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }
}

bitflags! {
    /// Frame buffer planes cleared by `GraphicsDevice::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const COLOR = 0b001;
        const DEPTH = 0b010;
        const STENCIL = 0b100;
    }
}

impl Default for ClearFlags {
    fn default() -> Self {
        ClearFlags::COLOR | ClearFlags::DEPTH
    }
}

#[cfg(test)]
#[path = "pipeline_state_tests.rs"]
mod tests;
