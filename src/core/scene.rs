use glam::{EulerRot, Mat4, Quat, Vec3};
use smallvec::SmallVec;

/// Mutable position/rotation/scale of one node. Rotation is Euler XYZ in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn local_matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, q, self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Outer,
    Inner,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Position,
    Rotation,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One animatable scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Node(Node, Property, Axis),
    TitleOpacity,
    /// translateY of the i-th title text element, in percent of its height.
    TitleText(usize),
}

impl Target {
    pub const fn position(node: Node, axis: Axis) -> Self {
        Self::Node(node, Property::Position, axis)
    }

    pub const fn rotation(node: Node, axis: Axis) -> Self {
        Self::Node(node, Property::Rotation, axis)
    }
}

/// Read/write access to animatable fields.
pub trait Animatable {
    fn read(&self, target: Target) -> f32;
    fn write(&mut self, target: Target, value: f32);
}

/// Fixed three-level transform chain: outer group, inner group, model.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    pub outer: Transform,
    pub inner: Transform,
    pub model: Transform,
}

impl SceneGraph {
    pub fn node(&self, node: Node) -> &Transform {
        match node {
            Node::Outer => &self.outer,
            Node::Inner => &self.inner,
            Node::Model => &self.model,
        }
    }

    pub fn node_mut(&mut self, node: Node) -> &mut Transform {
        match node {
            Node::Outer => &mut self.outer,
            Node::Inner => &mut self.inner,
            Node::Model => &mut self.model,
        }
    }

    /// World matrix of `node`, composed down from the outer group.
    pub fn world_matrix(&self, node: Node) -> Mat4 {
        let outer = self.outer.local_matrix();
        match node {
            Node::Outer => outer,
            Node::Inner => outer * self.inner.local_matrix(),
            Node::Model => outer * self.inner.local_matrix() * self.model.local_matrix(),
        }
    }
}

/// State of the DOM title block driven by the timelines.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleState {
    pub opacity: f32,
    pub text_offsets: SmallVec<[f32; 8]>,
}

impl TitleState {
    pub fn hidden(text_count: usize, offset: f32) -> Self {
        Self {
            opacity: 0.0,
            text_offsets: SmallVec::from_elem(offset, text_count),
        }
    }
}

/// Everything the timelines animate.
#[derive(Debug, Clone)]
pub struct Rig {
    pub scene: SceneGraph,
    pub title: TitleState,
}

#[inline]
fn axis_of(v: &Vec3, axis: Axis) -> f32 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
        Axis::Z => v.z,
    }
}

#[inline]
fn axis_of_mut(v: &mut Vec3, axis: Axis) -> &mut f32 {
    match axis {
        Axis::X => &mut v.x,
        Axis::Y => &mut v.y,
        Axis::Z => &mut v.z,
    }
}

impl Animatable for Rig {
    fn read(&self, target: Target) -> f32 {
        match target {
            Target::Node(node, prop, axis) => {
                let t = self.scene.node(node);
                match prop {
                    Property::Position => axis_of(&t.position, axis),
                    Property::Rotation => axis_of(&t.rotation, axis),
                    Property::Scale => axis_of(&t.scale, axis),
                }
            }
            Target::TitleOpacity => self.title.opacity,
            Target::TitleText(i) => self.title.text_offsets.get(i).copied().unwrap_or(0.0),
        }
    }

    fn write(&mut self, target: Target, value: f32) {
        match target {
            Target::Node(node, prop, axis) => {
                let t = self.scene.node_mut(node);
                let v = match prop {
                    Property::Position => &mut t.position,
                    Property::Rotation => &mut t.rotation,
                    Property::Scale => &mut t.scale,
                };
                *axis_of_mut(v, axis) = value;
            }
            Target::TitleOpacity => self.title.opacity = value,
            Target::TitleText(i) => {
                if let Some(slot) = self.title.text_offsets.get_mut(i) {
                    *slot = value;
                }
            }
        }
    }
}
