use std::f32::consts::FRAC_PI_2;

use cgmath::{Quaternion, Rad, Rotation3};

use super::Updatable;
use crate::gfx::scene::{keys, DominoPhase, MotionState, NodeId, Scene};
use crate::simulation::context::SimulationContext;

pub const DEFAULT_ANGULAR_ACCELERATION: f32 = 3.0;

/// `Standing -> Toppling -> Fallen` pivot of a domino.
///
/// Sits on the pivot node; the visible slab is a child (`mesh`) that is recolored once
/// when the domino comes to rest.
pub struct Domino {
    pub mesh: NodeId,
    pub standing_color: [f32; 3],
    pub fallen_color: [f32; 3],
}

impl Domino {
    pub fn new(mesh: NodeId, standing_color: [f32; 3], fallen_color: [f32; 3]) -> Self {
        Self {
            mesh,
            standing_color,
            fallen_color,
        }
    }

    fn paint(&self, scene: &mut Scene, color: [f32; 3]) {
        if let Some(material) = scene.node_mut(self.mesh).and_then(|node| node.material.as_mut()) {
            material.color = color;
        }
    }
}

impl Updatable for Domino {
    fn update(&mut self, id: NodeId, scene: &mut Scene, _ctx: &mut SimulationContext, delta_time: f32) {
        let Some(node) = scene.node_mut(id) else {
            return;
        };
        if node.domino_phase() != Some(DominoPhase::Toppling) {
            return;
        }

        let acceleration = node
            .data
            .scalar(keys::ANGULAR_ACCELERATION)
            .unwrap_or(DEFAULT_ANGULAR_ACCELERATION);
        let omega = node.data.scalar(keys::ANGULAR_VELOCITY).unwrap_or(0.0);
        let mut angle = node.data.scalar(keys::ANGLE).unwrap_or(0.0) + omega * delta_time;
        node.data.set_scalar(keys::ANGULAR_VELOCITY, omega + acceleration * delta_time);

        let mut fell = false;
        if angle > FRAC_PI_2 {
            angle = FRAC_PI_2;
            fell = node.transition(MotionState::Domino(DominoPhase::Fallen));
        }

        node.data.set_scalar(keys::ANGLE, angle);
        node.transform.rotation = Quaternion::from_angle_z(Rad(-angle));

        if fell {
            log::info!("{} has fallen", node.name);
            self.paint(scene, self.fallen_color);
        }
    }

    fn reset(&mut self, id: NodeId, scene: &mut Scene) {
        if let Some(node) = scene.node_mut(id) {
            node.restore_state(MotionState::Domino(DominoPhase::Standing));
            node.data.set_scalar(keys::ANGLE, 0.0);
            node.data.set_scalar(keys::ANGULAR_VELOCITY, 0.0);
            node.transform.rotation = Quaternion::from_angle_z(Rad(0.0));
        }
        self.paint(scene, self.standing_color);
    }
}
