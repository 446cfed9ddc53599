//! Resource-level geometry type.
//!
//! A `Geometry` is validated, flat vertex data: positions (xyz triplets),
//! optional triangle indices, optional normals (xyz triplets, one per vertex)
//! and optional texture coordinates (uv pairs, one per vertex).
//!
//! Geometries are shared between drawables through `Arc<Geometry>`; the
//! render context uses pointer identity to decide whether a drawable's GPU
//! buffers can be reused.

use glam::Vec3;
use crate::error::{Error, Result};
use crate::graphics_device::IndexType;

// ============================================================================
// GEOMETRY
// ============================================================================

/// Flat triangle geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    positions: Vec<f32>,
    indices: Vec<u32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
}

fn invalid(message: String) -> Error {
    crate::engine_error!("lumen3d::Geometry", "{}", message);
    Error::InvalidResource(message)
}

impl Geometry {
    /// Create a geometry from flat arrays
    ///
    /// `indices`, `normals` and `uvs` may be empty.
    ///
    /// # Errors
    ///
    /// `InvalidResource` when a length is inconsistent or an index is out of
    /// range.
    pub fn new(
        positions: Vec<f32>,
        indices: Vec<u32>,
        normals: Vec<f32>,
        uvs: Vec<f32>,
    ) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(invalid(format!(
                "position count {} is not a multiple of 3",
                positions.len()
            )));
        }
        let vertex_count = positions.len() / 3;

        if !normals.is_empty() && normals.len() != positions.len() {
            return Err(invalid(format!(
                "{} normal components for {} vertices",
                normals.len(),
                vertex_count
            )));
        }

        if !uvs.is_empty() && uvs.len() != vertex_count * 2 {
            return Err(invalid(format!(
                "{} uv components for {} vertices",
                uvs.len(),
                vertex_count
            )));
        }

        if indices.len() % 3 != 0 {
            return Err(invalid(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }

        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(invalid(format!(
                "index {} out of range ({} vertices)",
                index, vertex_count
            )));
        }

        Ok(Self { positions, indices, normals, uvs })
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn vertex_count(&self) -> u32 {
        (self.positions.len() / 3) as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Number of triangles drawn from this geometry
    pub fn triangle_count(&self) -> u32 {
        if self.is_indexed() {
            self.index_count() / 3
        } else {
            self.vertex_count() / 3
        }
    }

    /// Smallest index type able to address every vertex
    pub fn index_type(&self) -> IndexType {
        if self.indices.iter().all(|&i| i <= u16::MAX as u32) {
            IndexType::U16
        } else {
            IndexType::U32
        }
    }

    /// Index data encoded with `index_type()`
    pub fn index_bytes(&self) -> Vec<u8> {
        match self.index_type() {
            IndexType::U16 => {
                let narrow: Vec<u16> = self.indices.iter().map(|&i| i as u16).collect();
                bytemuck::cast_slice(&narrow).to_vec()
            }
            IndexType::U32 => bytemuck::cast_slice(&self.indices).to_vec(),
        }
    }

    // ========================================================================
    // PRODUCERS
    // ========================================================================

    /// Axis-aligned box centered on the origin
    ///
    /// Each face is a grid of `segments` quads with outward normals and uvs.
    /// Segment counts below 1 are raised to 1.
    pub fn cuboid(
        width: f32,
        height: f32,
        depth: f32,
        width_segments: u32,
        height_segments: u32,
        depth_segments: u32,
    ) -> Self {
        let (ws, hs, ds) = (width_segments.max(1), height_segments.max(1), depth_segments.max(1));
        let mut builder = BoxBuilder::default();

        // +x, -x, +y, -y, +z, -z
        builder.plane([2, 1, 0], -1.0, -1.0, [depth, height, width], ds, hs);
        builder.plane([2, 1, 0], 1.0, -1.0, [depth, height, -width], ds, hs);
        builder.plane([0, 2, 1], 1.0, 1.0, [width, depth, height], ws, ds);
        builder.plane([0, 2, 1], 1.0, -1.0, [width, depth, -height], ws, ds);
        builder.plane([0, 1, 2], 1.0, -1.0, [width, height, depth], ws, hs);
        builder.plane([0, 1, 2], -1.0, -1.0, [width, height, -depth], ws, hs);

        Self {
            positions: builder.positions,
            indices: builder.indices,
            normals: builder.normals,
            uvs: builder.uvs,
        }
    }

    /// Unit cube (1 x 1 x 1, one segment per face)
    pub fn unit_cube() -> Self {
        Self::cuboid(1.0, 1.0, 1.0, 1, 1, 1)
    }

    /// UV sphere centered on the origin
    ///
    /// Rings run from the north pole (+y) to the south pole. Degenerate
    /// triangles at the poles are skipped. Segment counts are raised to at
    /// least 3 around and 2 from pole to pole.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);

        let mut positions = Vec::with_capacity(((ws + 1) * (hs + 1) * 3) as usize);
        let mut normals = Vec::with_capacity(positions.capacity());
        let mut uvs = Vec::with_capacity(((ws + 1) * (hs + 1) * 2) as usize);
        let mut indices = Vec::new();

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let theta = v * std::f32::consts::PI;

            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let phi = u * std::f32::consts::TAU;

                let direction = Vec3::new(
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                );
                positions.extend_from_slice(&(direction * radius).to_array());
                normals.extend_from_slice(&direction.normalize_or_zero().to_array());
                uvs.extend_from_slice(&[u, 1.0 - v]);
            }
        }

        let row = ws + 1;
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { positions, indices, normals, uvs }
    }
}

// ============================================================================
// BOX BUILDER
// ============================================================================

#[derive(Default)]
struct BoxBuilder {
    positions: Vec<f32>,
    indices: Vec<u32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    vertex_count: u32,
}

impl BoxBuilder {
    /// Append one face
    ///
    /// `axes` maps (u, v, w) to x/y/z indices; `size` is (width, height,
    /// depth) along (u, v, w), the sign of depth selecting the face side.
    fn plane(
        &mut self,
        axes: [usize; 3],
        u_direction: f32,
        v_direction: f32,
        size: [f32; 3],
        grid_x: u32,
        grid_y: u32,
    ) {
        let [u, v, w] = axes;
        let [width, height, depth] = size;
        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;
        let columns = grid_x + 1;

        for iy in 0..=grid_y {
            let y = iy as f32 * segment_height - height / 2.0;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_width - width / 2.0;

                let mut position = [0.0f32; 3];
                position[u] = x * u_direction;
                position[v] = y * v_direction;
                position[w] = depth / 2.0;
                self.positions.extend_from_slice(&position);

                let mut normal = [0.0f32; 3];
                normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };
                self.normals.extend_from_slice(&normal);

                self.uvs.push(ix as f32 / grid_x as f32);
                self.uvs.push(1.0 - iy as f32 / grid_y as f32);
            }
        }

        let base = self.vertex_count;
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = base + ix + columns * iy;
                let b = base + ix + columns * (iy + 1);
                let c = base + (ix + 1) + columns * (iy + 1);
                let d = base + (ix + 1) + columns * iy;

                self.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        self.vertex_count += columns * (grid_y + 1);
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
