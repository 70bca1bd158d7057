use crate::constants::{AMBIENT_INTENSITY, ENV_STRENGTH, LIGHT_COLOR, LIGHT_INTENSITY, LIGHT_POSITION};
use crate::core::{EnvironmentImage, ModelAsset};
use glam::{Mat4, Vec3};
use web_sys as web;

mod env;
mod helpers;
mod mesh;
mod targets;
use mesh::{FrameUniforms, GpuMesh, MeshUniforms};
use targets::RenderTargets;

// ===================== WebGPU state =====================

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bg: wgpu::BindGroup,
    mesh_bgl: wgpu::BindGroupLayout,
    env: env::EnvResources,
    targets: RenderTargets,
    meshes: Vec<GpuMesh>,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    view_proj: Mat4,
    cam_eye: Vec3,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // Transparent canvas: the page shows through wherever the model is not drawn.
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::MESH_WGSL.into()),
        });
        let stages = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bgl"),
            entries: &[helpers::uniform_layout_entry(0, stages)],
        });
        let mesh_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_bgl"),
            entries: &[helpers::uniform_layout_entry(0, stages)],
        });
        let env = env::create_env_resources(&device, &queue);
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pl"),
            bind_group_layouts: &[&frame_bgl, &mesh_bgl, &env.bgl],
            push_constant_ranges: &[],
        });
        let pipeline =
            helpers::make_mesh_pipeline(&device, &pl, &shader, format, mesh::vertex_layout());

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bg"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });
        let (width, height) = (config.width, config.height);
        let targets = RenderTargets::new(&device, width, height);
        log::info!("[render] WebGPU ready: {:?} {}x{}", format, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            frame_buffer,
            frame_bg,
            mesh_bgl,
            env,
            targets,
            meshes: Vec::new(),
            width,
            height,
            clear_color: wgpu::Color::TRANSPARENT,
            view_proj: Mat4::IDENTITY,
            cam_eye: Vec3::ZERO,
        })
    }

    pub fn set_camera(&mut self, view_proj: Mat4, eye: Vec3) {
        self.view_proj = view_proj;
        self.cam_eye = eye;
    }

    pub fn upload_model(&mut self, asset: &ModelAsset) {
        self.meshes = asset
            .meshes
            .iter()
            .map(|m| mesh::upload_mesh(&self.device, &self.mesh_bgl, m))
            .collect();
        log::info!("[render] uploaded {} meshes", self.meshes.len());
    }

    pub fn has_model(&self) -> bool {
        !self.meshes.is_empty()
    }

    pub fn set_environment(&mut self, image: &EnvironmentImage) {
        self.env.set_image(&self.device, &self.queue, image);
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets.recreate(&self.device, width, height);
        }
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw every mesh with the world matrix `node_world` returns for its node.
    pub fn render(&mut self, node_world: impl Fn(usize) -> Mat4) -> Result<(), wgpu::SurfaceError> {
        let light = Vec3::from(LIGHT_POSITION).normalize_or_zero();
        let fu = FrameUniforms {
            view_proj: self.view_proj.to_cols_array_2d(),
            camera_pos: self.cam_eye.extend(1.0).to_array(),
            light_dir: light.extend(LIGHT_INTENSITY).to_array(),
            light_color: [LIGHT_COLOR[0], LIGHT_COLOR[1], LIGHT_COLOR[2], AMBIENT_INTENSITY],
            env: [
                if self.env.loaded { 1.0 } else { 0.0 },
                ENV_STRENGTH,
                0.0,
                0.0,
            ],
        };
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&fu));
        for m in &self.meshes {
            let mu = MeshUniforms::new(node_world(m.node), &m.material);
            self.queue
                .write_buffer(&m.uniform_buffer, 0, bytemuck::bytes_of(&mu));
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.frame_bg, &[]);
            rpass.set_bind_group(2, &self.env.bind_group, &[]);
            for m in &self.meshes {
                rpass.set_bind_group(1, &m.bind_group, &[]);
                rpass.set_vertex_buffer(0, m.vertex_buffer.slice(..));
                rpass.set_index_buffer(m.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..m.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
