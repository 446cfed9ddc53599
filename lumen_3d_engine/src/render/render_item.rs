/// RenderItem: the GPU-side state of one drawable.
///
/// Built once per (geometry, program) pair and reused across frames. Owns
/// the vertex/index buffers and the vertex array; dropping the item releases
/// them. World matrix and material are refreshed every frame before drawing.

use std::sync::Arc;
use glam::Mat4;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, BufferFormat, BufferUsage, GraphicsDevice, IndexType, PipelineState,
    PrimitiveTopology, Program, VertexArray, VertexArrayDesc, VertexAttributeDesc,
};
use crate::resource::{Geometry, Material};
use super::material_uniforms::{self, FrameUniforms};
use super::program_cache::ProgramKey;
use super::uniform::UniformSet;

/// How the item is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    /// Indexed triangle list
    Indexed { index_count: u32, index_type: IndexType },
    /// Non-indexed triangle list over every vertex
    Arrays { vertex_count: u32 },
}

pub struct RenderItem {
    geometry: Arc<Geometry>,
    program_key: ProgramKey,
    program: Arc<dyn Program>,
    vertex_array: Arc<dyn VertexArray>,
    buffers: Vec<Arc<dyn Buffer>>,
    uniforms: UniformSet,
    command: DrawCommand,
    world: Mat4,
    material: Material,
}

fn vertex_buffer(
    device: &mut dyn GraphicsDevice,
    data: &[f32],
    label: &str,
) -> Result<Arc<dyn Buffer>> {
    let bytes: &[u8] = bytemuck::cast_slice(data);
    device.create_buffer(
        BufferDesc {
            size: bytes.len() as u64,
            usage: BufferUsage::Vertex,
            label: label.to_string(),
        },
        bytes,
    )
}

impl RenderItem {
    /// Upload `geometry` and bind it to `program`'s attributes
    pub fn build(
        device: &mut dyn GraphicsDevice,
        program_key: ProgramKey,
        program: Arc<dyn Program>,
        geometry: &Arc<Geometry>,
        material: &Material,
    ) -> Result<Self> {
        let mut buffers = Vec::with_capacity(4);
        let mut attributes = Vec::with_capacity(3);

        let positions = vertex_buffer(device, geometry.positions(), "positions")?;
        attributes.push(VertexAttributeDesc {
            name: "vertPosition".to_string(),
            buffer: Arc::clone(&positions),
            format: BufferFormat::R32G32B32_SFLOAT,
        });
        buffers.push(positions);

        if geometry.has_normals() {
            let normals = vertex_buffer(device, geometry.normals(), "normals")?;
            attributes.push(VertexAttributeDesc {
                name: "vertNormal".to_string(),
                buffer: Arc::clone(&normals),
                format: BufferFormat::R32G32B32_SFLOAT,
            });
            buffers.push(normals);
        }

        if geometry.has_uvs() {
            let uvs = vertex_buffer(device, geometry.uvs(), "uvs")?;
            attributes.push(VertexAttributeDesc {
                name: "uv".to_string(),
                buffer: Arc::clone(&uvs),
                format: BufferFormat::R32G32_SFLOAT,
            });
            buffers.push(uvs);
        }

        let (index_buffer, command) = if geometry.is_indexed() {
            let index_type = geometry.index_type();
            let bytes = geometry.index_bytes();
            let buffer = device.create_buffer(
                BufferDesc {
                    size: bytes.len() as u64,
                    usage: BufferUsage::Index,
                    label: "indices".to_string(),
                },
                &bytes,
            )?;
            buffers.push(Arc::clone(&buffer));
            (
                Some((buffer, index_type)),
                DrawCommand::Indexed { index_count: geometry.index_count(), index_type },
            )
        } else {
            (None, DrawCommand::Arrays { vertex_count: geometry.vertex_count() })
        };

        let vertex_array = device.create_vertex_array(
            &program,
            VertexArrayDesc { attributes, index_buffer },
        )?;

        Ok(Self {
            geometry: Arc::clone(geometry),
            program_key,
            uniforms: UniformSet::new(&program),
            program,
            vertex_array,
            buffers,
            command,
            world: Mat4::IDENTITY,
            material: material.clone(),
        })
    }

    /// Whether this item was built from `geometry` with the program `key`
    pub fn matches(&self, geometry: &Arc<Geometry>, key: ProgramKey) -> bool {
        Arc::ptr_eq(&self.geometry, geometry) && self.program_key == key
    }

    /// Refresh the per-frame drawable state
    pub fn update(&mut self, world: Mat4, material: &Material) {
        self.world = world;
        self.material.clone_from(material);
    }

    /// Bind, upload the uniform set and issue the draw call
    ///
    /// Returns the number of triangles drawn.
    pub fn draw(
        &mut self,
        device: &mut dyn GraphicsDevice,
        frame: &FrameUniforms,
        pipeline: &PipelineState,
    ) -> Result<u32> {
        device.use_program(&self.program)?;
        device.bind_vertex_array(&self.vertex_array)?;
        device.set_pipeline_state(pipeline)?;

        let values = material_uniforms::assemble(&self.material, &self.world, frame);
        self.uniforms.upload_all(device, values)?;

        let topology = PrimitiveTopology::TriangleList;
        match self.command {
            DrawCommand::Indexed { index_count, index_type } => {
                device.draw_indexed(topology, index_count, index_type, 0)?;
                Ok(topology.primitive_count(index_count))
            }
            DrawCommand::Arrays { vertex_count } => {
                device.draw(topology, vertex_count, 0)?;
                Ok(topology.primitive_count(vertex_count))
            }
        }
    }

    pub fn program_key(&self) -> ProgramKey {
        self.program_key
    }

    pub fn program(&self) -> &Arc<dyn Program> {
        &self.program
    }

    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    pub fn command(&self) -> DrawCommand {
        self.command
    }

    pub fn buffers(&self) -> &[Arc<dyn Buffer>] {
        &self.buffers
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }
}

#[cfg(test)]
#[path = "render_item_tests.rs"]
mod tests;
