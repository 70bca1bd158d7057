//! Model and environment asset decoding (host-testable, no web APIs).

use crate::core::clip::{Clip, ClipChannel, ClipKeys, ClipProperty, Interpolation};
use crate::core::error::{AssetLoadError, EnvironmentLoadError};
use glam::{Mat3, Mat4, Quat, Vec3};
use smallvec::SmallVec;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Surface parameters the renderer needs per mesh, including how strongly
/// the environment map is reflected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub env_intensity: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            metallic: 1.0,
            roughness: 1.0,
            env_intensity: 1.0,
        }
    }
}

/// One triangle primitive, in the local space of its node.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub node: usize,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub material: MaterialParams,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodePose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl NodePose {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Scene node. Parents always precede their children in `ModelAsset::nodes`.
#[derive(Debug, Clone)]
pub struct ModelNode {
    pub name: Option<String>,
    pub parent: Option<usize>,
    pub rest: NodePose,
}

#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub nodes: Vec<ModelNode>,
    pub meshes: Vec<MeshData>,
    pub clips: Vec<Clip>,
}

impl ModelAsset {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}

/// Extensions listed in `extensionsRequired`. None of them are decoded here.
fn required_extensions(bytes: &[u8]) -> Vec<String> {
    let json = match gltf::binary::Glb::from_slice(bytes) {
        Ok(glb) => glb.json,
        Err(_) => std::borrow::Cow::Borrowed(bytes),
    };
    gltf::json::Root::from_slice(&json)
        .map(|root| root.extensions_required)
        .unwrap_or_default()
}

/// Parse a binary glTF (`.glb`). Buffers must live in the embedded BIN chunk.
pub fn parse_glb(bytes: &[u8]) -> Result<ModelAsset, AssetLoadError> {
    if let Some(ext) = required_extensions(bytes).into_iter().next() {
        return Err(AssetLoadError::UnsupportedExtension(ext));
    }
    let gltf = gltf::Gltf::from_slice(bytes)?;
    let blob = gltf.blob.as_deref();
    let mut buffers: Vec<&[u8]> = Vec::new();
    for buffer in gltf.buffers() {
        match (buffer.source(), blob) {
            (gltf::buffer::Source::Bin, Some(bin)) => buffers.push(bin),
            _ => return Err(AssetLoadError::MissingBuffer(buffer.index())),
        }
    }
    let get = |b: gltf::Buffer<'_>| buffers.get(b.index()).copied();

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or(AssetLoadError::Empty)?;

    let mut nodes = Vec::new();
    let mut meshes = Vec::new();
    // gltf node index -> position in `nodes`
    let mut remap = vec![None; gltf.nodes().len()];
    let mut stack: Vec<(gltf::Node<'_>, Option<usize>)> =
        scene.nodes().map(|n| (n, None)).collect();
    stack.reverse();
    while let Some((node, parent)) = stack.pop() {
        let (t, r, s) = node.transform().decomposed();
        let idx = nodes.len();
        remap[node.index()] = Some(idx);
        nodes.push(ModelNode {
            name: node.name().map(str::to_string),
            parent,
            rest: NodePose {
                translation: Vec3::from(t),
                rotation: Quat::from_array(r),
                scale: Vec3::from(s),
            },
        });
        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::warn!("[assets] skipping non-triangle primitive in {:?}", mesh.name());
                    continue;
                }
                let reader = primitive.reader(get);
                let Some(positions) = reader.read_positions() else {
                    continue;
                };
                let positions: Vec<[f32; 3]> = positions.collect();
                let indices: Vec<u32> = match reader.read_indices() {
                    Some(ix) => ix.into_u32().collect(),
                    None => (0..positions.len() as u32).collect(),
                };
                let normals: Vec<[f32; 3]> = match reader.read_normals() {
                    Some(n) => n.collect(),
                    None => compute_normals(&positions, &indices),
                };
                let pbr = primitive.material().pbr_metallic_roughness();
                meshes.push(MeshData {
                    name: mesh.name().unwrap_or("mesh").to_string(),
                    node: idx,
                    vertices: positions
                        .iter()
                        .zip(normals.iter())
                        .map(|(p, n)| MeshVertex {
                            position: *p,
                            normal: *n,
                        })
                        .collect(),
                    indices,
                    material: MaterialParams {
                        base_color: pbr.base_color_factor(),
                        metallic: pbr.metallic_factor(),
                        roughness: pbr.roughness_factor(),
                        ..MaterialParams::default()
                    },
                });
            }
        }
        let children: SmallVec<[gltf::Node<'_>; 8]> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push((child, Some(idx)));
        }
    }
    if meshes.is_empty() {
        return Err(AssetLoadError::Empty);
    }

    let mut clips = Vec::new();
    for anim in gltf.animations() {
        let mut channels = Vec::new();
        for channel in anim.channels() {
            let Some(node) = remap[channel.target().node().index()] else {
                continue;
            };
            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Step => Interpolation::Step,
                gltf::animation::Interpolation::Linear => Interpolation::Linear,
                gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
            };
            let reader = channel.reader(get);
            let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            use gltf::animation::util::ReadOutputs;
            let (property, keys) = match outputs {
                ReadOutputs::Translations(it) => (
                    ClipProperty::Translation,
                    ClipKeys::Vec3(it.map(Vec3::from).collect()),
                ),
                ReadOutputs::Scales(it) => (
                    ClipProperty::Scale,
                    ClipKeys::Vec3(it.map(Vec3::from).collect()),
                ),
                ReadOutputs::Rotations(it) => (
                    ClipProperty::Rotation,
                    ClipKeys::Quat(it.into_f32().map(Quat::from_array).collect()),
                ),
                ReadOutputs::MorphTargetWeights(_) => continue,
            };
            channels.push(ClipChannel::new(node, property, interpolation, times, keys));
        }
        if !channels.is_empty() {
            clips.push(Clip::new(anim.name().unwrap_or("clip"), channels));
        }
    }

    let asset = ModelAsset {
        nodes,
        meshes,
        clips,
    };
    log::info!(
        "[assets] model parsed: nodes={} meshes={} triangles={} clips={}",
        asset.nodes.len(),
        asset.meshes.len(),
        asset.triangle_count(),
        asset.clips.len()
    );
    Ok(asset)
}

/// Area-weighted vertex normals for primitives that ship without them.
pub fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        let n = (pb - pa).cross(pc - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

/// Inverse-transpose of the upper 3x3, for transforming normals.
pub fn normal_matrix(model: &Mat4) -> Mat3 {
    Mat3::from_mat4(*model).inverse().transpose()
}

/// Decoded equirectangular environment image, RGBA8.
#[derive(Debug, Clone)]
pub struct EnvironmentImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub fn decode_environment(bytes: &[u8]) -> Result<EnvironmentImage, EnvironmentLoadError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = img.dimensions();
    Ok(EnvironmentImage {
        width,
        height,
        rgba: img.into_raw(),
    })
}
