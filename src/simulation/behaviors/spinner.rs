use cgmath::{Quaternion, Rad, Rotation3};

use super::Updatable;
use crate::gfx::scene::{keys, NodeId, Scene};
use crate::simulation::context::SimulationContext;

/// Constant-rate rotation about the node's local Y axis.
///
/// The rate is the node's `angular_speed` constant; the accumulated angle lives in the
/// node's `angle` value. There is no terminal state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spinner;

impl Spinner {
    pub fn new() -> Self {
        Self
    }
}

impl Updatable for Spinner {
    fn update(&mut self, id: NodeId, scene: &mut Scene, _ctx: &mut SimulationContext, delta_time: f32) {
        let Some(node) = scene.node_mut(id) else {
            return;
        };
        let Some(speed) = node.data.scalar(keys::ANGULAR_SPEED) else {
            return;
        };

        let angle = node.data.scalar(keys::ANGLE).unwrap_or(0.0) + speed * delta_time;
        node.data.set_scalar(keys::ANGLE, angle);
        node.data.set_scalar(keys::ANGULAR_VELOCITY, speed);
        node.transform.rotation = Quaternion::from_angle_y(Rad(angle));
    }

    fn reset(&mut self, id: NodeId, scene: &mut Scene) {
        if let Some(node) = scene.node_mut(id) {
            node.data.set_scalar(keys::ANGLE, 0.0);
            node.transform.rotation = Quaternion::from_angle_y(Rad(0.0));
        }
    }
}
