//! Point velocities on chains of rotating joints.

use cgmath::{InnerSpace, Vector3, Zero};

use crate::gfx::scene::{keys, NodeId, Scene};

/// One link of a rotating assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatingJoint {
    /// World-space center of rotation
    pub origin: Vector3<f32>,
    /// Unit rotation axis in world space
    pub axis: Vector3<f32>,
    /// Radians per second about `axis`
    pub angular_speed: f32,
}

impl RotatingJoint {
    pub fn new(origin: Vector3<f32>, axis: Vector3<f32>, angular_speed: f32) -> Self {
        Self {
            origin,
            axis,
            angular_speed,
        }
    }

    /// Velocity of `point` due to this joint alone
    pub fn point_velocity(&self, point: Vector3<f32>) -> Vector3<f32> {
        (self.axis * self.angular_speed).cross(point - self.origin)
    }
}

/// Velocity of `point` carried by a chain of joints, root joint first.
///
/// Each joint contributes the velocity it imparts on the next joint's origin, and the
/// last joint the velocity of `point` itself.
pub fn compound_point_velocity(joints: &[RotatingJoint], point: Vector3<f32>) -> Vector3<f32> {
    joints
        .iter()
        .enumerate()
        .fold(Vector3::zero(), |velocity, (index, joint)| {
            let target = joints.get(index + 1).map_or(point, |next| next.origin);
            velocity + joint.point_velocity(target)
        })
}

/// Surface velocity at `point` on a bar carried by a spinning disc and a swinging pivot.
///
/// The disc turns about world +Y at its world position. The pivot turns about its own
/// local +Y mapped to world space. Angular speeds come from each node's
/// `angular_speed` constant; a node without one contributes nothing.
pub fn bar_surface_velocity(
    scene: &Scene,
    disc: NodeId,
    pivot: NodeId,
    point: Vector3<f32>,
) -> Option<Vector3<f32>> {
    let disc_node = scene.node(disc)?;
    let pivot_node = scene.node(pivot)?;

    let disc_joint = RotatingJoint::new(
        scene.world_position(disc)?,
        Vector3::unit_y(),
        disc_node.data.scalar(keys::ANGULAR_SPEED).unwrap_or(0.0),
    );

    let pivot_axis = scene.direction_to_world(pivot, Vector3::unit_y())?;
    if pivot_axis.magnitude2() < super::EPSILON {
        return None;
    }
    let pivot_joint = RotatingJoint::new(
        scene.world_position(pivot)?,
        pivot_axis.normalize(),
        pivot_node.data.scalar(keys::ANGULAR_SPEED).unwrap_or(0.0),
    );

    Some(compound_point_velocity(&[disc_joint, pivot_joint], point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{NodeData, SceneNode};

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn test_single_joint() {
        let joint = RotatingJoint::new(Vector3::zero(), Vector3::unit_y(), 2.0);
        // ω·Y × X = -2Z
        assert!(approx(
            compound_point_velocity(&[joint], Vector3::unit_x()),
            Vector3::new(0.0, 0.0, -2.0)
        ));
    }

    #[test]
    fn test_two_link_chain_sums_contributions() {
        let disc = RotatingJoint::new(Vector3::zero(), Vector3::unit_y(), 0.5);
        let pivot = RotatingJoint::new(Vector3::new(2.0, 0.0, 0.0), Vector3::unit_y(), 3.0);
        let point = Vector3::new(2.0, 0.0, 1.0);

        let expected = disc.point_velocity(pivot.origin) + pivot.point_velocity(point);
        assert!(approx(compound_point_velocity(&[disc, pivot], point), expected));
        // Disc moves the pivot along -Z, the pivot moves the point along +X
        assert!(approx(expected, Vector3::new(3.0, 0.0, -1.0)));
        // Order matters: the root joint comes first
        assert!(!approx(compound_point_velocity(&[pivot, disc], point), expected));
    }

    #[test]
    fn test_empty_chain_is_at_rest() {
        assert_eq!(compound_point_velocity(&[], Vector3::unit_x()), Vector3::zero());
    }

    #[test]
    fn test_bar_surface_velocity_from_scene() {
        let mut scene = Scene::new();
        let disc = scene.add_root_child(
            SceneNode::new("disc").with_data(NodeData::new().with_scalar(keys::ANGULAR_SPEED, 0.5)),
        );
        let pivot = scene
            .add(
                disc,
                SceneNode::new("pivot")
                    .with_position(Vector3::new(2.0, 0.0, 0.0))
                    .with_data(NodeData::new().with_scalar(keys::ANGULAR_SPEED, 3.0)),
            )
            .unwrap();
        scene.propagate_transforms();

        let velocity = bar_surface_velocity(&scene, disc, pivot, Vector3::new(2.0, 0.0, 1.0)).unwrap();
        assert!(approx(velocity, Vector3::new(3.0, 0.0, -1.0)));
    }
}
