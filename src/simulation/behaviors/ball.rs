//! Ball behaviors: the ramp-launched rolling ball and the ball it strikes

use cgmath::{InnerSpace, Quaternion, Rad, Rotation3, Vector3};

use super::{NodeSnapshot, Updatable};
use crate::gfx::scene::{BallPhase, MotionState, NodeId, Scene, SceneNode};
use crate::physics::collision::{
    handle_angled_wall, handle_ball_ball, handle_ball_domino, handle_bar_ball, handle_ground,
    handle_static_wall, AngledWall, GroundPlane, StaticWall,
};
use crate::simulation::context::SimulationContext;

/// Below this speed a ball stops spinning visually
const ROLL_SPEED_THRESHOLD: f32 = 0.01;

/// Nodes the rolling ball reads or collides with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingBallLinks {
    pub ramp: NodeId,
    pub bar: NodeId,
    pub disc: NodeId,
    pub pivot: NodeId,
    /// Ball struck head-on; focus moves to it on contact
    pub target: NodeId,
}

/// Static surfaces the rolling ball is checked against every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallObstacles {
    pub ground: GroundPlane,
    pub wall: StaticWall,
    pub angled_wall: AngledWall,
}

/// `Waiting -> OnRamp -> InAir -> OnGround`, with bar hits forcing `InAir`
pub struct RollingBall {
    pub links: RollingBallLinks,
    pub obstacles: BallObstacles,
    pub gravity: Vector3<f32>,
    /// Simulated seconds before the ball is released
    pub start_delay: f32,
    /// The ball leaves the ramp once its x drops below this
    pub ramp_end_x: f32,
    initial: NodeSnapshot,
}

impl RollingBall {
    /// Wraps the ball's current node state as the state restored on reset
    pub fn new(
        node: &SceneNode,
        links: RollingBallLinks,
        obstacles: BallObstacles,
        gravity: Vector3<f32>,
        start_delay: f32,
        ramp_end_x: f32,
    ) -> Self {
        Self {
            links,
            obstacles,
            gravity,
            start_delay,
            ramp_end_x,
            initial: NodeSnapshot::capture(node),
        }
    }

    fn integrate(&self, node: &mut SceneNode, ramp_normal: Vector3<f32>, delta_time: f32) {
        match node.ball_phase() {
            Some(BallPhase::OnRamp) => {
                let along_ramp = self.gravity - ramp_normal * self.gravity.dot(ramp_normal);
                node.velocity += along_ramp * delta_time;
                node.transform.position += node.velocity * delta_time;

                if node.transform.position.x < self.ramp_end_x {
                    node.transition(MotionState::Ball(BallPhase::InAir));
                }
            }
            Some(BallPhase::InAir) => {
                node.velocity += self.gravity * delta_time;
                node.transform.position += node.velocity * delta_time;
            }
            Some(BallPhase::OnGround) => {
                node.velocity.y = 0.0;
                let planar = Vector3::new(node.velocity.x, 0.0, node.velocity.z);
                node.transform.position += planar * delta_time;
            }
            Some(BallPhase::Waiting) | None => {}
        }
    }
}

impl Updatable for RollingBall {
    fn update(&mut self, id: NodeId, scene: &mut Scene, ctx: &mut SimulationContext, delta_time: f32) {
        let Some(node) = scene.node_mut(id) else {
            return;
        };

        if node.ball_phase() == Some(BallPhase::Waiting) {
            if ctx.time() <= self.start_delay {
                return;
            }
            node.transition(MotionState::Ball(BallPhase::OnRamp));
        }

        let links = self.links;
        if handle_bar_ball(scene, id, links.bar, links.disc, links.pivot).is_some() {
            return;
        }

        let obstacles = self.obstacles;
        handle_static_wall(scene, id, &obstacles.wall);
        handle_angled_wall(scene, id, &obstacles.angled_wall);
        handle_ground(scene, id, &obstacles.ground);
        if handle_ball_ball(scene, id, links.target).is_some() {
            ctx.set_focus(links.target);
        }

        let ramp_normal = scene
            .world_rotation(links.ramp)
            .map(|rotation| (rotation * Vector3::unit_y()).normalize())
            .unwrap_or_else(Vector3::unit_y);

        let Some(node) = scene.node_mut(id) else {
            return;
        };
        self.integrate(node, ramp_normal, delta_time);
        apply_rolling(node, delta_time);
    }

    fn reset(&mut self, id: NodeId, scene: &mut Scene) {
        if let Some(node) = scene.node_mut(id) {
            self.initial.restore(node);
        }
    }
}

/// Ball at rest until struck; knocks over the domino it runs into
pub struct CoastingBall {
    pub domino: NodeId,
    pub domino_mesh: NodeId,
    initial: NodeSnapshot,
}

impl CoastingBall {
    pub fn new(node: &SceneNode, domino: NodeId, domino_mesh: NodeId) -> Self {
        Self {
            domino,
            domino_mesh,
            initial: NodeSnapshot::capture(node),
        }
    }
}

impl Updatable for CoastingBall {
    fn update(&mut self, id: NodeId, scene: &mut Scene, _ctx: &mut SimulationContext, delta_time: f32) {
        handle_ball_domino(scene, id, self.domino, self.domino_mesh);

        let Some(node) = scene.node_mut(id) else {
            return;
        };
        node.transform.position += node.velocity * delta_time;
        apply_rolling(node, delta_time);
    }

    fn reset(&mut self, id: NodeId, scene: &mut Scene) {
        if let Some(node) = scene.node_mut(id) {
            self.initial.restore(node);
        }
    }
}

/// Spins the ball about the horizontal axis perpendicular to its velocity so it looks
/// like it rolls without slipping
pub fn apply_rolling(node: &mut SceneNode, delta_time: f32) {
    let Some(radius) = node.radius().filter(|r| *r > 0.0) else {
        return;
    };
    let velocity = node.velocity;
    let speed = velocity.magnitude();
    if speed <= ROLL_SPEED_THRESHOLD {
        return;
    }

    let axis = Vector3::new(velocity.z, 0.0, -velocity.x);
    if axis.magnitude2() < crate::physics::EPSILON {
        // Purely vertical motion has no rolling axis
        return;
    }

    let angle = speed * delta_time / radius;
    let delta = Quaternion::from_axis_angle(axis.normalize(), Rad(angle));
    node.transform.rotation = (delta * node.transform.rotation).normalize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{keys, NodeData};
    use cgmath::{One, Zero};

    #[test]
    fn test_rolling_axis_is_perpendicular_to_velocity() {
        let mut node = SceneNode::new("ball").with_data(NodeData::new().with_scalar(keys::RADIUS, 2.0));
        node.velocity = Vector3::new(4.0, 0.0, 0.0);
        apply_rolling(&mut node, 0.5);

        // Moving +X rolls about -Z by |v|·dt/r = 1 rad
        let expected = Quaternion::from_axis_angle(-Vector3::unit_z(), Rad(1.0));
        assert!((node.transform.rotation - expected).magnitude() < 1e-5);
    }

    #[test]
    fn test_slow_or_vertical_ball_does_not_roll() {
        let mut node = SceneNode::new("ball").with_data(NodeData::new().with_scalar(keys::RADIUS, 1.0));
        node.velocity = Vector3::new(0.005, 0.0, 0.0);
        apply_rolling(&mut node, 1.0);
        assert_eq!(node.transform.rotation, Quaternion::one());

        node.velocity = Vector3::new(0.0, -9.0, 0.0);
        apply_rolling(&mut node, 1.0);
        assert_eq!(node.transform.rotation, Quaternion::one());

        node.velocity = Vector3::zero();
        apply_rolling(&mut node, 1.0);
        assert_eq!(node.transform.rotation, Quaternion::one());
    }
}
