//! Scene nodes and the per-node state they carry.

use std::collections::HashMap;

use cgmath::{Matrix4, One, Quaternion, Rad, Rotation3, SquareMatrix, Vector3, Zero};

use crate::gfx::material::Material;
use crate::simulation::behaviors::Behavior;

/// Handle to a node in a [`Scene`](super::Scene) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a mesh in the scene's mesh library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Well-known keys of [`NodeData`]
pub mod keys {
    pub const RADIUS: &str = "radius";
    pub const LENGTH: &str = "length";
    pub const MASS: &str = "mass";
    pub const RESTITUTION: &str = "restitution";
    pub const ANGULAR_SPEED: &str = "angular_speed";
    pub const ANGULAR_ACCELERATION: &str = "angular_acceleration";
    pub const INITIAL_PUSH: &str = "initial_push";
    pub const ANGLE: &str = "angle";
    pub const ANGULAR_VELOCITY: &str = "angular_velocity";
}

/// Local transform, composed as translation * rotation * scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Rotation from Euler angles in radians, applied X then Y then Z in the local frame
    pub fn with_euler(self, x: f32, y: f32, z: f32) -> Self {
        self.with_rotation(euler_xyz(x, y, z))
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Quaternion for intrinsic XYZ Euler angles
pub fn euler_xyz(x: f32, y: f32, z: f32) -> Quaternion<f32> {
    Quaternion::from_angle_x(Rad(x)) * Quaternion::from_angle_y(Rad(y)) * Quaternion::from_angle_z(Rad(z))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallPhase {
    Waiting,
    OnRamp,
    InAir,
    OnGround,
}

impl BallPhase {
    fn rank(self) -> u8 {
        match self {
            BallPhase::Waiting => 0,
            BallPhase::OnRamp => 1,
            BallPhase::InAir => 2,
            BallPhase::OnGround => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominoPhase {
    Standing,
    Toppling,
    Fallen,
}

/// Object-specific motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Passive,
    Ball(BallPhase),
    Domino(DominoPhase),
}

impl MotionState {
    /// Whether `next` is a forward step of the same state machine
    pub fn can_transition(self, next: MotionState) -> bool {
        match (self, next) {
            (MotionState::Ball(from), MotionState::Ball(to)) => to.rank() > from.rank(),
            (MotionState::Domino(from), MotionState::Domino(to)) => matches!(
                (from, to),
                (DominoPhase::Standing, DominoPhase::Toppling)
                    | (DominoPhase::Toppling, DominoPhase::Fallen)
            ),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataValue {
    Scalar(f32),
    Vector(Vector3<f32>),
}

/// Named per-node parameters.
///
/// Constants are fixed when the node is built. Values can be rewritten every tick, but
/// never under a key that is already a constant.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    constants: HashMap<String, DataValue>,
    values: HashMap<String, DataValue>,
}

impl NodeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constant(mut self, key: impl Into<String>, value: DataValue) -> Self {
        self.constants.insert(key.into(), value);
        self
    }

    pub fn with_scalar(self, key: impl Into<String>, value: f32) -> Self {
        self.with_constant(key, DataValue::Scalar(value))
    }

    pub fn get(&self, key: &str) -> Option<DataValue> {
        self.constants
            .get(key)
            .or_else(|| self.values.get(key))
            .copied()
    }

    pub fn scalar(&self, key: &str) -> Option<f32> {
        match self.get(key)? {
            DataValue::Scalar(value) => Some(value),
            DataValue::Vector(_) => None,
        }
    }

    pub fn vector(&self, key: &str) -> Option<Vector3<f32>> {
        match self.get(key)? {
            DataValue::Vector(value) => Some(value),
            DataValue::Scalar(_) => None,
        }
    }

    pub fn is_constant(&self, key: &str) -> bool {
        self.constants.contains_key(key)
    }

    /// Stores a mutable value. Returns `false` and leaves the data untouched when `key`
    /// names a constant.
    pub fn set(&mut self, key: impl Into<String>, value: DataValue) -> bool {
        let key = key.into();
        if self.constants.contains_key(&key) {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    pub fn set_scalar(&mut self, key: impl Into<String>, value: f32) -> bool {
        self.set(key, DataValue::Scalar(value))
    }
}

/// A positioned entity in the transform tree
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub velocity: Vector3<f32>,
    pub mesh: Option<MeshId>,
    pub material: Option<Material>,
    pub data: NodeData,
    /// Model label resolved by the asset layer, for nodes drawn from a loaded model
    pub asset: Option<String>,
    state: MotionState,
    pub(crate) behavior: Option<Behavior>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) world: Matrix4<f32>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            velocity: Vector3::zero(),
            mesh: None,
            material: None,
            data: NodeData::new(),
            asset: None,
            state: MotionState::Passive,
            behavior: None,
            parent: None,
            children: Vec::new(),
            world: Matrix4::identity(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshId) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }

    pub fn with_state(mut self, state: MotionState) -> Self {
        self.state = state;
        self
    }

    pub fn with_behavior(mut self, behavior: impl Into<Behavior>) -> Self {
        self.behavior = Some(behavior.into());
        self
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Attaches a behavior after insertion, once its collaborators have ids
    pub fn set_behavior(&mut self, behavior: impl Into<Behavior>) {
        self.behavior = Some(behavior.into());
    }

    /// Detaches the behavior; the node keeps its current transform and state
    pub fn clear_behavior(&mut self) -> Option<Behavior> {
        self.behavior.take()
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn ball_phase(&self) -> Option<BallPhase> {
        match self.state {
            MotionState::Ball(phase) => Some(phase),
            _ => None,
        }
    }

    pub fn domino_phase(&self) -> Option<DominoPhase> {
        match self.state {
            MotionState::Domino(phase) => Some(phase),
            _ => None,
        }
    }

    /// Moves the state machine forward. Backward or cross-type moves are refused.
    pub fn transition(&mut self, next: MotionState) -> bool {
        if !self.state.can_transition(next) {
            return false;
        }
        log::info!("{}: {:?} -> {:?}", self.name, self.state, next);
        self.state = next;
        true
    }

    /// Impact override: any ball that has started moving goes airborne.
    pub fn force_in_air(&mut self) -> bool {
        match self.state {
            MotionState::Ball(BallPhase::Waiting) | MotionState::Ball(BallPhase::InAir) => false,
            MotionState::Ball(_) => {
                log::info!("{}: {:?} -> InAir (impact)", self.name, self.state);
                self.state = MotionState::Ball(BallPhase::InAir);
                true
            }
            _ => false,
        }
    }

    /// Reset path; the only way back to an initial state
    pub(crate) fn restore_state(&mut self, state: MotionState) {
        self.state = state;
    }

    pub fn radius(&self) -> Option<f32> {
        self.data.scalar(keys::RADIUS)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// Cached world matrix from the most recent traversal
    pub fn world(&self) -> Matrix4<f32> {
        self.world
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("velocity", &self.velocity)
            .field("asset", &self.asset)
            .field("state", &self.state)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_transform_matrix_order() {
        let transform = Transform::from_position(Vector3::new(1.0, 0.0, 0.0))
            .with_euler(0.0, 0.0, FRAC_PI_2)
            .with_uniform_scale(2.0);
        // Scale first, then rotate +X onto +Y, then translate
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_euler_order_matches_xyz() {
        let q = euler_xyz(FRAC_PI_2, FRAC_PI_2, 0.0);
        // Intrinsic X then Y: local +Z ends up on world +X
        let z = q * Vector3::unit_z();
        assert!((z - Vector3::unit_x()).magnitude() < 1e-5);
    }

    #[test]
    fn test_ball_transitions_are_forward_only() {
        let mut node = SceneNode::new("ball").with_state(MotionState::Ball(BallPhase::Waiting));
        assert!(node.transition(MotionState::Ball(BallPhase::OnRamp)));
        assert!(!node.transition(MotionState::Ball(BallPhase::Waiting)));
        assert!(node.transition(MotionState::Ball(BallPhase::OnGround)));
        assert!(!node.transition(MotionState::Domino(DominoPhase::Fallen)));
        assert_eq!(node.ball_phase(), Some(BallPhase::OnGround));
    }

    #[test]
    fn test_force_in_air() {
        let mut waiting = SceneNode::new("a").with_state(MotionState::Ball(BallPhase::Waiting));
        assert!(!waiting.force_in_air());

        let mut grounded = SceneNode::new("b").with_state(MotionState::Ball(BallPhase::OnGround));
        assert!(grounded.force_in_air());
        assert_eq!(grounded.ball_phase(), Some(BallPhase::InAir));

        let mut passive = SceneNode::new("c");
        assert!(!passive.force_in_air());
    }

    #[test]
    fn test_domino_is_monotonic() {
        let mut node = SceneNode::new("domino").with_state(MotionState::Domino(DominoPhase::Standing));
        assert!(!node.transition(MotionState::Domino(DominoPhase::Fallen)));
        assert!(node.transition(MotionState::Domino(DominoPhase::Toppling)));
        assert!(node.transition(MotionState::Domino(DominoPhase::Fallen)));
        assert!(!node.transition(MotionState::Domino(DominoPhase::Standing)));
        assert!(!node.transition(MotionState::Domino(DominoPhase::Toppling)));
    }

    #[test]
    fn test_constants_are_frozen() {
        let mut data = NodeData::new().with_scalar(keys::RADIUS, 1.0);
        assert!(!data.set_scalar(keys::RADIUS, 5.0));
        assert_eq!(data.scalar(keys::RADIUS), Some(1.0));

        assert!(data.set_scalar(keys::ANGLE, 0.3));
        assert_eq!(data.scalar(keys::ANGLE), Some(0.3));
        assert_eq!(data.vector(keys::ANGLE), None);
        assert!(data.is_constant(keys::RADIUS));
    }
}
