use crate::core::asset::{normal_matrix, MaterialParams, MeshData, MeshVertex};
use glam::Mat4;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FrameUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) camera_pos: [f32; 4],
    pub(crate) light_dir: [f32; 4],
    pub(crate) light_color: [f32; 4],
    pub(crate) env: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshUniforms {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) normal_mat: [[f32; 4]; 4],
    pub(crate) base_color: [f32; 4],
    pub(crate) pbr: [f32; 4],
}

impl MeshUniforms {
    pub(crate) fn new(world: Mat4, material: &MaterialParams) -> Self {
        Self {
            model: world.to_cols_array_2d(),
            normal_mat: Mat4::from_mat3(normal_matrix(&world)).to_cols_array_2d(),
            base_color: material.base_color,
            pbr: [
                material.metallic,
                material.roughness,
                material.env_intensity,
                0.0,
            ],
        }
    }
}

pub(crate) const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

pub(crate) fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// GPU copy of one primitive plus its per-draw uniforms.
pub(crate) struct GpuMesh {
    pub(crate) node: usize,
    pub(crate) material: MaterialParams,
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

pub(crate) fn upload_mesh(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    mesh: &MeshData,
) -> GpuMesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh_vertices"),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh_indices"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    let uniforms = MeshUniforms::new(Mat4::IDENTITY, &mesh.material);
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh_uniforms"),
        contents: bytemuck::bytes_of(&uniforms),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("mesh_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    GpuMesh {
        node: mesh.node,
        material: mesh.material,
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
        uniform_buffer,
        bind_group,
    }
}
