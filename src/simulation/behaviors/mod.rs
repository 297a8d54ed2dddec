//! Per-node update behaviors
//!
//! Each animated object class has one behavior type implementing [`Updatable`]. The scene
//! stores them in the tagged [`Behavior`] enum and hands each one the scene and the
//! simulation context during traversal.

pub mod ball;
pub mod domino;
pub mod spinner;

pub use ball::{BallObstacles, CoastingBall, RollingBall, RollingBallLinks};
pub use domino::Domino;
pub use spinner::Spinner;

use cgmath::Vector3;

use crate::gfx::scene::{MotionState, NodeId, Scene, SceneNode, Transform};
use crate::simulation::context::SimulationContext;

/// Behavior lifecycle hooks called by the scene
pub trait Updatable {
    /// Advance the node by one fixed step
    ///
    /// # Arguments
    /// * `id` - Node this behavior is attached to
    /// * `scene` - Whole scene; collaborator nodes are looked up by their wired ids
    /// * `ctx` - Simulation clock and focus
    /// * `delta_time` - Fixed step length in seconds
    fn update(&mut self, id: NodeId, scene: &mut Scene, ctx: &mut SimulationContext, delta_time: f32);

    /// Restore the node (and any node this behavior owns) to its initial state
    fn reset(&mut self, id: NodeId, scene: &mut Scene);
}

pub enum Behavior {
    RollingBall(RollingBall),
    CoastingBall(CoastingBall),
    Spinner(Spinner),
    Domino(Domino),
}

impl Behavior {
    pub fn name(&self) -> &'static str {
        match self {
            Behavior::RollingBall(_) => "rolling ball",
            Behavior::CoastingBall(_) => "coasting ball",
            Behavior::Spinner(_) => "spinner",
            Behavior::Domino(_) => "domino",
        }
    }
}

impl Updatable for Behavior {
    fn update(&mut self, id: NodeId, scene: &mut Scene, ctx: &mut SimulationContext, delta_time: f32) {
        match self {
            Behavior::RollingBall(b) => b.update(id, scene, ctx, delta_time),
            Behavior::CoastingBall(b) => b.update(id, scene, ctx, delta_time),
            Behavior::Spinner(b) => b.update(id, scene, ctx, delta_time),
            Behavior::Domino(b) => b.update(id, scene, ctx, delta_time),
        }
    }

    fn reset(&mut self, id: NodeId, scene: &mut Scene) {
        match self {
            Behavior::RollingBall(b) => b.reset(id, scene),
            Behavior::CoastingBall(b) => b.reset(id, scene),
            Behavior::Spinner(b) => b.reset(id, scene),
            Behavior::Domino(b) => b.reset(id, scene),
        }
    }
}

impl From<RollingBall> for Behavior {
    fn from(behavior: RollingBall) -> Self {
        Behavior::RollingBall(behavior)
    }
}

impl From<CoastingBall> for Behavior {
    fn from(behavior: CoastingBall) -> Self {
        Behavior::CoastingBall(behavior)
    }
}

impl From<Spinner> for Behavior {
    fn from(behavior: Spinner) -> Self {
        Behavior::Spinner(behavior)
    }
}

impl From<Domino> for Behavior {
    fn from(behavior: Domino) -> Self {
        Behavior::Domino(behavior)
    }
}

/// Initial transform, velocity and state of a node, restored on reset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSnapshot {
    pub transform: Transform,
    pub velocity: Vector3<f32>,
    pub state: MotionState,
}

impl NodeSnapshot {
    pub fn capture(node: &SceneNode) -> Self {
        Self {
            transform: node.transform,
            velocity: node.velocity,
            state: node.state(),
        }
    }

    pub fn restore(&self, node: &mut SceneNode) {
        node.transform = self.transform;
        node.velocity = self.velocity;
        node.restore_state(self.state);
    }
}
