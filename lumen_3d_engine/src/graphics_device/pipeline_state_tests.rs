//! Unit tests for pipeline_state.rs
//!
//! Tests IndexType, PrimitiveTopology, the opaque/transparent presets and
//! ClearFlags.

use crate::graphics_device::{
    IndexType, PrimitiveTopology, PipelineState, CullMode, FrontFace,
    CompareOp, BlendFactor, BlendOp, ColorBlendState, ClearFlags, Viewport,
};

// ============================================================================
// INDEX TYPE TESTS
// ============================================================================

#[test]
fn test_index_type_size_bytes() {
    assert_eq!(IndexType::U16.size_bytes(), 2);
    assert_eq!(IndexType::U32.size_bytes(), 4);
}

#[test]
fn test_index_type_buffer_size() {
    let index_count = 36u32;
    assert_eq!(index_count * IndexType::U16.size_bytes(), 72);
    assert_eq!(index_count * IndexType::U32.size_bytes(), 144);
}

// ============================================================================
// TOPOLOGY TESTS
// ============================================================================

#[test]
fn test_triangle_list_primitive_count() {
    assert_eq!(PrimitiveTopology::TriangleList.primitive_count(36), 12);
    assert_eq!(PrimitiveTopology::TriangleList.primitive_count(2), 0);
}

#[test]
fn test_other_topologies_primitive_count() {
    assert_eq!(PrimitiveTopology::TriangleStrip.primitive_count(5), 3);
    assert_eq!(PrimitiveTopology::TriangleStrip.primitive_count(1), 0);
    assert_eq!(PrimitiveTopology::LineList.primitive_count(6), 3);
    assert_eq!(PrimitiveTopology::PointList.primitive_count(7), 7);
}

// ============================================================================
// PIPELINE STATE PRESETS
// ============================================================================

#[test]
fn test_opaque_state() {
    let state = PipelineState::opaque();

    assert_eq!(state.rasterization.cull_mode, CullMode::Back);
    assert_eq!(state.rasterization.front_face, FrontFace::CounterClockwise);
    assert!(state.depth.depth_test_enable);
    assert!(state.depth.depth_write_enable);
    assert_eq!(state.depth.depth_compare_op, CompareOp::Less);
    assert!(!state.color_blend.blend_enable);
}

#[test]
fn test_transparent_state_blends_without_depth_writes() {
    let state = PipelineState::transparent();

    assert_eq!(state.rasterization, PipelineState::opaque().rasterization);
    assert!(state.depth.depth_test_enable);
    assert!(!state.depth.depth_write_enable);
    assert!(state.color_blend.blend_enable);
    assert_eq!(state.color_blend.src_factor, BlendFactor::SrcAlpha);
    assert_eq!(state.color_blend.dst_factor, BlendFactor::OneMinusSrcAlpha);
    assert_eq!(state.color_blend.blend_op, BlendOp::Add);
}

#[test]
fn test_default_color_blend_is_replace() {
    let blend = ColorBlendState::default();
    assert!(!blend.blend_enable);
    assert_eq!(blend.src_factor, BlendFactor::One);
    assert_eq!(blend.dst_factor, BlendFactor::Zero);
}

// ============================================================================
// VIEWPORT & CLEAR FLAGS
// ============================================================================

#[test]
fn test_viewport_from_size() {
    let viewport = Viewport::from_size(480, 320);
    assert_eq!(viewport.x, 0.0);
    assert_eq!(viewport.y, 0.0);
    assert_eq!(viewport.width, 480.0);
    assert_eq!(viewport.height, 320.0);
}

#[test]
fn test_clear_flags_default_is_color_and_depth() {
    let flags = ClearFlags::default();
    assert!(flags.contains(ClearFlags::COLOR));
    assert!(flags.contains(ClearFlags::DEPTH));
    assert!(!flags.contains(ClearFlags::STENCIL));
}

#[test]
fn test_clear_flags_combination() {
    let flags = ClearFlags::COLOR | ClearFlags::STENCIL;
    assert_eq!(flags.bits(), 0b101);
    assert!(!flags.contains(ClearFlags::DEPTH));
}
