// Host-side tests for model parsing, clip sampling and load slots.

use glam::{Mat4, Quat, Vec3};
use scroll_stage::core::asset::{compute_normals, normal_matrix, NodePose};
use scroll_stage::core::clip::{Clip, ClipChannel, ClipKeys, ClipProperty, Interpolation};
use scroll_stage::core::{
    decode_environment, parse_glb, AssetLoadError, EnvironmentLoadError, LoadSlot, NodeAnimator,
};

fn push_f32s(bin: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        bin.extend_from_slice(&v.to_le_bytes());
    }
}

fn pad_to_4(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

fn glb(json: &str, bin: Option<&[u8]>) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    pad_to_4(&mut json, b' ');
    let mut chunks = Vec::new();
    chunks.extend_from_slice(&(json.len() as u32).to_le_bytes());
    chunks.extend_from_slice(b"JSON");
    chunks.extend_from_slice(&json);
    if let Some(bin) = bin {
        let mut bin = bin.to_vec();
        pad_to_4(&mut bin, 0);
        chunks.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        chunks.extend_from_slice(b"BIN\0");
        chunks.extend_from_slice(&bin);
    }
    let mut out = Vec::new();
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&((12 + chunks.len()) as u32).to_le_bytes());
    out.extend_from_slice(&chunks);
    out
}

/// One triangle under a translated root node, optionally with a translation clip
/// lifting the mesh node from y=0 to y=10 over two seconds.
fn spoon_glb(with_clip: bool) -> Vec<u8> {
    let mut bin = Vec::new();
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    pad_to_4(&mut bin, 0);
    push_f32s(&mut bin, &[0.0, 2.0]);
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 0.0, 10.0, 0.0]);
    assert_eq!(bin.len(), 76);

    let animations = if with_clip {
        r#","animations":[{"name":"lift","samplers":[{"input":2,"output":3,"interpolation":"LINEAR"}],
            "channels":[{"sampler":0,"target":{"node":1,"path":"translation"}}]}]"#
    } else {
        ""
    };
    let json = format!(
        r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],
        "nodes":[{{"name":"root","children":[1],"translation":[0.0,1.0,0.0]}},{{"name":"bowl","mesh":0}}],
        "meshes":[{{"name":"spoon","primitives":[{{"attributes":{{"POSITION":0}},"indices":1}}]}}],
        "buffers":[{{"byteLength":76}}],
        "bufferViews":[
            {{"buffer":0,"byteOffset":0,"byteLength":36}},
            {{"buffer":0,"byteOffset":36,"byteLength":6}},
            {{"buffer":0,"byteOffset":44,"byteLength":8}},
            {{"buffer":0,"byteOffset":52,"byteLength":24}}],
        "accessors":[
            {{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0.0,0.0,0.0],"max":[1.0,1.0,0.0]}},
            {{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}},
            {{"bufferView":2,"componentType":5126,"count":2,"type":"SCALAR","min":[0.0],"max":[2.0]}},
            {{"bufferView":3,"componentType":5126,"count":2,"type":"VEC3"}}]{animations}}}"#
    );
    glb(&json, Some(&bin))
}

#[test]
fn parses_a_triangle_and_its_hierarchy() {
    let asset = parse_glb(&spoon_glb(false)).unwrap();

    assert_eq!(asset.nodes.len(), 2);
    assert_eq!(asset.nodes[0].name.as_deref(), Some("root"));
    assert_eq!(asset.nodes[0].parent, None);
    assert_eq!(asset.nodes[1].parent, Some(0));
    assert_eq!(asset.nodes[0].rest.translation, Vec3::new(0.0, 1.0, 0.0));

    assert_eq!(asset.meshes.len(), 1);
    let mesh = &asset.meshes[0];
    assert_eq!(mesh.name, "spoon");
    assert_eq!(mesh.node, 1);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(asset.triangle_count(), 1);
    assert!(asset.clips.is_empty());

    // The primitive ships without normals, so they are computed from winding
    for v in &mesh.vertices {
        assert_eq!(v.normal, [0.0, 0.0, 1.0]);
    }
    assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
}

#[test]
fn parses_translation_clip_and_scrubs_it() {
    let asset = parse_glb(&spoon_glb(true)).unwrap();
    assert_eq!(asset.clips.len(), 1);
    assert_eq!(asset.clips[0].name, "lift");
    assert_eq!(asset.clips[0].duration, 2.0);

    let mut animator = NodeAnimator::new(&asset);
    assert!(animator.has_clips());
    // Before any scrub the rest pose applies
    let rest = animator.node_world(1).transform_point3(Vec3::ZERO);
    assert!((rest - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);

    animator.scrub(0.5);
    let mid = animator.node_world(1).transform_point3(Vec3::ZERO);
    assert!((mid - Vec3::new(0.0, 6.0, 0.0)).length() < 1e-5);

    animator.scrub(2.0);
    let end = animator.node_world(1).transform_point3(Vec3::ZERO);
    assert!((end - Vec3::new(0.0, 11.0, 0.0)).length() < 1e-5);

    assert_eq!(animator.node_world(99), Mat4::IDENTITY);
}

#[test]
fn model_without_meshes_is_empty() {
    let json = r#"{"asset":{"version":"2.0"},"scenes":[{"nodes":[0]}],"nodes":[{"name":"lonely"}]}"#;
    let err = parse_glb(&glb(json, None)).unwrap_err();
    assert!(matches!(err, AssetLoadError::Empty), "{err}");
}

#[test]
fn garbage_bytes_fail_to_parse() {
    let err = parse_glb(b"definitely not a model").unwrap_err();
    assert!(matches!(err, AssetLoadError::Parse(_)), "{err}");
}

#[test]
fn draco_compressed_model_names_the_extension() {
    let json = r#"{"asset":{"version":"2.0"},"extensionsUsed":["KHR_draco_mesh_compression"],"extensionsRequired":["KHR_draco_mesh_compression"],"scenes":[{"nodes":[0]}],"nodes":[{"name":"spoon"}]}"#;
    let err = parse_glb(&glb(json, None)).unwrap_err();
    assert!(
        matches!(&err, AssetLoadError::UnsupportedExtension(ext) if ext == "KHR_draco_mesh_compression"),
        "{err}"
    );
    assert!(err.to_string().contains("KHR_draco_mesh_compression"));
}

#[test]
fn computed_normals_are_unit_and_skip_bad_indices() {
    let positions = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, -2.0]];
    let normals = compute_normals(&positions, &[0, 1, 2, 0, 1, 7]);
    for n in normals {
        assert!((Vec3::from(n) - Vec3::Y).length() < 1e-6);
    }
}

#[test]
fn normal_matrix_undoes_non_uniform_scale() {
    let m = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
    let n = normal_matrix(&m) * Vec3::new(1.0, 1.0, 0.0);
    assert!((n - Vec3::new(0.5, 1.0, 0.0)).length() < 1e-6);
}

#[test]
fn step_channels_hold_the_previous_key() {
    let channel = ClipChannel::new(
        0,
        ClipProperty::Scale,
        Interpolation::Step,
        vec![0.0, 1.0],
        ClipKeys::Vec3(vec![Vec3::ONE, Vec3::splat(3.0)]),
    );
    let clip = Clip::new("pulse", vec![channel]);
    let mut poses = [NodePose::default()];

    clip.sample(0.99, &mut poses);
    assert_eq!(poses[0].scale, Vec3::ONE);
    clip.sample(1.0, &mut poses);
    assert_eq!(poses[0].scale, Vec3::splat(3.0));
}

#[test]
fn cubic_spline_channels_sample_between_values_only() {
    let turn = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let tangent = Quat::from_xyzw(9.0, 9.0, 9.0, 9.0);
    let channel = ClipChannel::new(
        0,
        ClipProperty::Rotation,
        Interpolation::CubicSpline,
        vec![0.0, 1.0],
        ClipKeys::Quat(vec![tangent, Quat::IDENTITY, tangent, tangent, turn, tangent]),
    );
    let mut pose = NodePose::default();

    channel.apply(1.0, &mut pose);
    assert!(pose.rotation.abs_diff_eq(turn, 1e-6));
    channel.apply(0.5, &mut pose);
    let half = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
    assert!(pose.rotation.abs_diff_eq(half, 1e-5));
}

#[test]
fn decodes_environment_png() {
    let mut img = image::RgbaImage::new(2, 1);
    img.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .unwrap();

    let env = decode_environment(&bytes).unwrap();
    assert_eq!((env.width, env.height), (2, 1));
    assert_eq!(&env.rgba[4..8], &[10, 20, 30, 255]);

    let err = decode_environment(b"nope").unwrap_err();
    assert!(matches!(err, EnvironmentLoadError::Decode(_)));
}

#[test]
fn load_slot_hands_out_its_result_once() {
    let slot: LoadSlot<u32, String> = LoadSlot::new();
    let writer = slot.clone();
    assert!(slot.is_pending());
    assert!(slot.take().is_none());

    assert!(writer.settle(Ok(7)));
    assert!(!writer.settle(Err("late".into())));
    assert!(!slot.is_pending());

    assert_eq!(slot.take(), Some(Ok(7)));
    assert_eq!(slot.take(), None);
    assert!(!writer.settle(Ok(8)));
}
