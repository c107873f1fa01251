//! The closed set of buffer slots shared by producer and shader code.
//!
//! Both the wgpu descriptors and the generated WGSL binding declarations are
//! derived from [`BufferIndex`]; nothing else names a slot number.

use std::mem::size_of;

use crate::layout::{GpuLayout, GpuLightBlock, GpuUniforms, Vertex};

/// Bind group holding the per-frame blocks.
pub const FRAME_BIND_GROUP: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferIndex {
    SceneUniforms,
    SceneLights,
    VertexPositions,
}

/// How a buffer reaches the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// `@group(FRAME_BIND_GROUP) @binding(n)` uniform block.
    Uniform,
    /// Vertex buffer slot passed to `set_vertex_buffer`.
    Vertex,
}

impl BufferIndex {
    pub const ALL: [BufferIndex; 3] = [
        BufferIndex::SceneUniforms,
        BufferIndex::SceneLights,
        BufferIndex::VertexPositions,
    ];

    pub fn kind(self) -> BufferKind {
        match self {
            Self::SceneUniforms | Self::SceneLights => BufferKind::Uniform,
            Self::VertexPositions => BufferKind::Vertex,
        }
    }

    /// Binding number for uniform blocks, slot number for vertex buffers.
    pub fn index(self) -> u32 {
        match self {
            Self::SceneUniforms => 0,
            Self::SceneLights => 1,
            Self::VertexPositions => 0,
        }
    }

    /// Size in bytes of one element bound at this index.
    pub fn element_size(self) -> u64 {
        match self {
            Self::SceneUniforms => size_of::<GpuUniforms>() as u64,
            Self::SceneLights => size_of::<GpuLightBlock>() as u64,
            Self::VertexPositions => size_of::<Vertex>() as u64,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SceneUniforms => "scene-uniforms",
            Self::SceneLights => "scene-lights",
            Self::VertexPositions => "vertex-positions",
        }
    }

    /// WGSL variable name and record type of a uniform block.
    fn wgsl_variable(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::SceneUniforms => Some(("uniforms", GpuUniforms::NAME)),
            Self::SceneLights => Some(("scene_lights", GpuLightBlock::NAME)),
            Self::VertexPositions => None,
        }
    }
}

/// Layout entries for every uniform block of the frame bind group.
pub fn frame_layout_entries() -> Vec<wgpu::BindGroupLayoutEntry> {
    BufferIndex::ALL
        .iter()
        .filter(|index| index.kind() == BufferKind::Uniform)
        .map(|index| wgpu::BindGroupLayoutEntry {
            binding: index.index(),
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(index.element_size()),
            },
            count: None,
        })
        .collect()
}

/// Vertex buffer layouts ordered by slot.
pub fn vertex_buffer_layouts() -> Vec<wgpu::VertexBufferLayout<'static>> {
    BufferIndex::ALL
        .iter()
        .filter(|index| index.kind() == BufferKind::Vertex)
        .map(|_| Vertex::buffer_layout())
        .collect()
}

/// `var<uniform>` declarations for the frame bind group.
pub fn wgsl_bindings() -> String {
    let mut out = String::new();
    for index in BufferIndex::ALL {
        if let Some((name, record)) = index.wgsl_variable() {
            out.push_str(&format!(
                "@group({FRAME_BIND_GROUP}) @binding({})\nvar<uniform> {name}: {record};\n",
                index.index()
            ));
        }
    }
    out
}
