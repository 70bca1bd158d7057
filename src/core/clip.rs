//! Embedded model animation clips, scrubbed by whole-page scroll progress.

use crate::core::asset::{ModelAsset, NodePose};
use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipProperty {
    Translation,
    Rotation,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
    /// Sampled as linear between key values; tangents are dropped at load.
    CubicSpline,
}

#[derive(Debug, Clone)]
pub enum ClipKeys {
    Vec3(Vec<Vec3>),
    Quat(Vec<Quat>),
}

impl ClipKeys {
    fn len(&self) -> usize {
        match self {
            Self::Vec3(v) => v.len(),
            Self::Quat(v) => v.len(),
        }
    }

    /// Keep every third element starting at 1 (in-tangent, value, out-tangent).
    fn spline_values(self) -> Self {
        match self {
            Self::Vec3(v) => Self::Vec3(v.into_iter().skip(1).step_by(3).collect()),
            Self::Quat(v) => Self::Quat(v.into_iter().skip(1).step_by(3).collect()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClipChannel {
    pub node: usize,
    pub property: ClipProperty,
    interpolation: Interpolation,
    times: Vec<f32>,
    keys: ClipKeys,
}

impl ClipChannel {
    pub fn new(
        node: usize,
        property: ClipProperty,
        interpolation: Interpolation,
        times: Vec<f32>,
        keys: ClipKeys,
    ) -> Self {
        let keys = match interpolation {
            Interpolation::CubicSpline => keys.spline_values(),
            _ => keys,
        };
        Self {
            node,
            property,
            interpolation,
            times,
            keys,
        }
    }

    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Bracketing key indices and blend factor at `time`.
    fn locate(&self, time: f32) -> Option<(usize, usize, f32)> {
        let n = self.times.len().min(self.keys.len());
        if n == 0 {
            return None;
        }
        let i = self.times[..n].partition_point(|&t| t <= time);
        if i == 0 {
            return Some((0, 0, 0.0));
        }
        if i >= n {
            return Some((n - 1, n - 1, 0.0));
        }
        let (a, b) = (i - 1, i);
        let span = self.times[b] - self.times[a];
        let f = if span > 0.0 {
            (time - self.times[a]) / span
        } else {
            0.0
        };
        Some(match self.interpolation {
            Interpolation::Step => (a, a, 0.0),
            _ => (a, b, f),
        })
    }

    pub fn apply(&self, time: f32, pose: &mut NodePose) {
        let Some((a, b, f)) = self.locate(time) else {
            return;
        };
        match (&self.keys, self.property) {
            (ClipKeys::Vec3(v), ClipProperty::Translation) => pose.translation = v[a].lerp(v[b], f),
            (ClipKeys::Vec3(v), ClipProperty::Scale) => pose.scale = v[a].lerp(v[b], f),
            (ClipKeys::Quat(q), ClipProperty::Rotation) => pose.rotation = q[a].slerp(q[b], f),
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct Clip {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<ClipChannel>,
}

impl Clip {
    pub fn new(name: &str, channels: Vec<ClipChannel>) -> Self {
        let duration = channels
            .iter()
            .map(ClipChannel::end_time)
            .fold(0.0_f32, f32::max);
        Self {
            name: name.to_string(),
            duration,
            channels,
        }
    }

    pub fn sample(&self, time: f32, poses: &mut [NodePose]) {
        let time = time.clamp(0.0, self.duration);
        for channel in &self.channels {
            if let Some(pose) = poses.get_mut(channel.node) {
                channel.apply(time, pose);
            }
        }
    }
}

/// Node hierarchy of the loaded model plus its clips. Holds the current pose
/// and the node world matrices (relative to the model root).
#[derive(Debug, Clone)]
pub struct NodeAnimator {
    parents: Vec<Option<usize>>,
    rest: Vec<NodePose>,
    poses: Vec<NodePose>,
    clips: Vec<Clip>,
    world: Vec<Mat4>,
    progress: Option<f32>,
}

impl NodeAnimator {
    pub fn new(asset: &ModelAsset) -> Self {
        let rest: Vec<NodePose> = asset.nodes.iter().map(|n| n.rest).collect();
        let mut animator = Self {
            parents: asset.nodes.iter().map(|n| n.parent).collect(),
            poses: rest.clone(),
            rest,
            clips: asset.clips.clone(),
            world: vec![Mat4::IDENTITY; asset.nodes.len()],
            progress: None,
        };
        animator.update_world();
        animator
    }

    pub fn has_clips(&self) -> bool {
        !self.clips.is_empty()
    }

    /// Pose every clip at `progress * clip.duration`. No-op when unchanged.
    pub fn scrub(&mut self, progress: f32) {
        let progress = progress.clamp(0.0, 1.0);
        if self.clips.is_empty() || self.progress == Some(progress) {
            return;
        }
        self.progress = Some(progress);
        self.poses.copy_from_slice(&self.rest);
        for clip in &self.clips {
            clip.sample(progress * clip.duration, &mut self.poses);
        }
        self.update_world();
    }

    fn update_world(&mut self) {
        for i in 0..self.poses.len() {
            let local = self.poses[i].matrix();
            self.world[i] = match self.parents[i] {
                Some(p) if p < i => self.world[p] * local,
                _ => local,
            };
        }
    }

    pub fn node_world(&self, node: usize) -> Mat4 {
        self.world.get(node).copied().unwrap_or(Mat4::IDENTITY)
    }

    pub fn pose(&self, node: usize) -> Option<&NodePose> {
        self.poses.get(node)
    }
}
