//! Unit tests for geometry.rs
//!
//! Tests validation, index encoding and the box/sphere producers.

use crate::resource::Geometry;
use crate::graphics_device::IndexType;
use crate::error::Error;
use glam::Vec3;

// ============================================================================
// HELPERS
// ============================================================================

fn triangle() -> Geometry {
    Geometry::new(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        vec![0, 1, 2],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
    )
    .unwrap()
}

fn vertex(values: &[f32], index: u32) -> Vec3 {
    let i = index as usize * 3;
    Vec3::new(values[i], values[i + 1], values[i + 2])
}

/// Counts triangles whose winding does not agree with `outward(centroid)`
fn inward_triangles(geometry: &Geometry, outward: impl Fn(Vec3, u32) -> Vec3) -> usize {
    geometry
        .indices()
        .chunks_exact(3)
        .filter(|tri| {
            let a = vertex(geometry.positions(), tri[0]);
            let b = vertex(geometry.positions(), tri[1]);
            let c = vertex(geometry.positions(), tri[2]);
            let face = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            face.dot(outward(centroid, tri[0])) <= 0.0
        })
        .count()
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn test_valid_geometry_accessors() {
    let geometry = triangle();
    assert_eq!(geometry.vertex_count(), 3);
    assert_eq!(geometry.index_count(), 3);
    assert_eq!(geometry.triangle_count(), 1);
    assert!(geometry.is_indexed());
    assert!(geometry.has_normals());
    assert!(geometry.has_uvs());
}

#[test]
fn test_non_indexed_geometry() {
    let geometry = Geometry::new(vec![0.0; 18], Vec::new(), Vec::new(), Vec::new()).unwrap();
    assert!(!geometry.is_indexed());
    assert!(!geometry.has_normals());
    assert!(!geometry.has_uvs());
    assert_eq!(geometry.vertex_count(), 6);
    assert_eq!(geometry.triangle_count(), 2);
}

#[test]
fn test_rejects_partial_position() {
    let result = Geometry::new(vec![0.0; 7], Vec::new(), Vec::new(), Vec::new());
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_rejects_mismatched_normals_and_uvs() {
    let normals = Geometry::new(vec![0.0; 9], Vec::new(), vec![0.0; 6], Vec::new());
    assert!(matches!(normals, Err(Error::InvalidResource(_))));

    let uvs = Geometry::new(vec![0.0; 9], Vec::new(), Vec::new(), vec![0.0; 4]);
    assert!(matches!(uvs, Err(Error::InvalidResource(_))));
}

#[test]
fn test_rejects_bad_indices() {
    let partial = Geometry::new(vec![0.0; 9], vec![0, 1], Vec::new(), Vec::new());
    assert!(matches!(partial, Err(Error::InvalidResource(_))));

    let out_of_range = Geometry::new(vec![0.0; 9], vec![0, 1, 3], Vec::new(), Vec::new());
    match out_of_range {
        Err(Error::InvalidResource(msg)) => assert!(msg.contains("index 3")),
        other => panic!("unexpected result: {:?}", other),
    }
}

// ============================================================================
// INDEX ENCODING
// ============================================================================

#[test]
fn test_small_indices_use_u16() {
    let geometry = triangle();
    assert_eq!(geometry.index_type(), IndexType::U16);
    assert_eq!(geometry.index_bytes(), vec![0, 0, 1, 0, 2, 0]);
}

#[test]
fn test_large_indices_use_u32() {
    let vertex_count = 70_000usize;
    let geometry = Geometry::new(
        vec![0.0; vertex_count * 3],
        vec![0, 1, 69_999],
        Vec::new(),
        Vec::new(),
    )
    .unwrap();

    assert_eq!(geometry.index_type(), IndexType::U32);
    let bytes = geometry.index_bytes();
    assert_eq!(bytes.len(), 12);
    assert_eq!(&bytes[8..12], &69_999u32.to_le_bytes());
}

// ============================================================================
// PRODUCERS
// ============================================================================

#[test]
fn test_unit_cube_layout() {
    let cube = Geometry::unit_cube();
    assert_eq!(cube.vertex_count(), 24);
    assert_eq!(cube.index_count(), 36);
    assert_eq!(cube.triangle_count(), 12);
    assert_eq!(cube.normals().len(), cube.positions().len());
    assert_eq!(cube.uvs().len(), 48);

    for value in cube.positions() {
        assert!((value.abs() - 0.5).abs() < 1e-6);
    }
}

#[test]
fn test_cuboid_segments_and_extent() {
    let cuboid = Geometry::cuboid(2.0, 4.0, 6.0, 2, 3, 1);
    // (w+1)(h+1) vertices per face pair
    let expected = 2 * (2 * 4) + 2 * (3 * 2) + 2 * (3 * 4);
    assert_eq!(cuboid.vertex_count(), expected);

    let max = cuboid.positions().chunks_exact(3).fold(Vec3::ZERO, |acc, p| {
        acc.max(Vec3::new(p[0].abs(), p[1].abs(), p[2].abs()))
    });
    assert!((max - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
}

#[test]
fn test_cuboid_faces_wind_outward() {
    let cube = Geometry::cuboid(1.0, 1.0, 1.0, 2, 2, 2);
    let normals = cube.normals().to_vec();
    let inward = inward_triangles(&cube, |_, first| vertex(&normals, first));
    assert_eq!(inward, 0);
}

#[test]
fn test_sphere_layout() {
    let sphere = Geometry::sphere(2.0, 8, 6);
    assert_eq!(sphere.vertex_count(), 9 * 7);
    // pole rows contribute one triangle per segment
    assert_eq!(sphere.triangle_count(), 8 * (2 * 6 - 2));
    assert_eq!(sphere.uvs().len() as u32, sphere.vertex_count() * 2);

    for p in sphere.positions().chunks_exact(3) {
        let length = Vec3::new(p[0], p[1], p[2]).length();
        assert!((length - 2.0).abs() < 1e-5);
    }
}

#[test]
fn test_sphere_winds_outward() {
    let sphere = Geometry::sphere(1.0, 12, 8);
    let inward = inward_triangles(&sphere, |centroid, _| centroid);
    assert_eq!(inward, 0);
}

#[test]
fn test_sphere_segment_minimums() {
    let sphere = Geometry::sphere(1.0, 0, 0);
    assert_eq!(sphere.vertex_count(), 4 * 3);
}
