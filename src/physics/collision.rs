//! Collision handlers for the contraption's ball pairs.
//!
//! Every handler takes the node ids of its participants, mutates only those nodes and
//! reports `Some(CollisionEvent)` when contact happened. A failed precondition (missing
//! radius or length, missing mesh bounds, degenerate normal) is reported as no contact.
//!
//! Balls are direct children of the scene root, so their local position is their world
//! position and handlers move them by editing `transform.position`.

use cgmath::{InnerSpace, MetricSpace, Vector3, Zero};

use super::geometry::{distance_point_to_segment, sphere_aabb_collision};
use super::kinematics::bar_surface_velocity;
use super::EPSILON;
use crate::gfx::scene::{keys, BallPhase, DominoPhase, MotionState, NodeId, Scene};

/// Restitution of the swinging bar; above 1 so the bar adds energy
pub const DEFAULT_BAR_RESTITUTION: f32 = 1.2;
/// Extra separation applied after a bar hit to avoid re-contact next tick
pub const BAR_SEPARATION_SLOP: f32 = 0.01;
pub const DEFAULT_STRIKER_MASS: f32 = 1.0;
pub const DEFAULT_TARGET_MASS: f32 = 2.0;
pub const DEFAULT_DOMINO_PUSH: f32 = 1.0;

/// Transient contact report; never kept across ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub point: Vector3<f32>,
    /// Unit contact normal, pointing toward the moving ball
    pub normal: Vector3<f32>,
    /// Penetration depth before the response was applied
    pub depth: f32,
}

/// Horizontal floor at a fixed height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub height: f32,
}

/// Infinite plane `p·normal = offset` that reflects approaching balls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticWall {
    pub normal: Vector3<f32>,
    pub offset: f32,
    pub restitution: f32,
}

impl StaticWall {
    pub fn new(normal: Vector3<f32>, offset: f32, restitution: f32) -> Self {
        let normal = if normal.magnitude2() < EPSILON {
            Vector3::zero()
        } else {
            normal.normalize()
        };
        Self {
            normal,
            offset,
            restitution,
        }
    }
}

/// Wall that redirects anything crossing `boundary_x` along a fixed direction.
///
/// The response is scripted: the ball keeps its speed and leaves along
/// `redirect_direction` no matter how it arrived. `normal` is the orientation the wall
/// needs to perform that bounce for the one incoming velocity it was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngledWall {
    pub boundary_x: f32,
    pub redirect_direction: Vector3<f32>,
    pub normal: Vector3<f32>,
}

impl AngledWall {
    /// Builds the wall for a known incoming velocity and desired outgoing direction
    pub fn from_redirect(
        boundary_x: f32,
        incoming: Vector3<f32>,
        outgoing_direction: Vector3<f32>,
    ) -> Self {
        let redirect_direction = if outgoing_direction.magnitude2() < EPSILON {
            Vector3::unit_x()
        } else {
            outgoing_direction.normalize()
        };
        let outgoing = redirect_direction * incoming.magnitude();
        let bisector = outgoing - incoming;
        let normal = if bisector.magnitude2() < EPSILON {
            redirect_direction
        } else {
            bisector.normalize()
        };

        Self {
            boundary_x,
            redirect_direction,
            normal,
        }
    }
}

fn positive_radius(scene: &Scene, id: NodeId) -> Option<f32> {
    scene.node(id)?.radius().filter(|r| *r > EPSILON)
}

/// Ball against the floor: snap onto it, stop vertical motion, mark the ball grounded
pub fn handle_ground(scene: &mut Scene, ball: NodeId, ground: &GroundPlane) -> Option<CollisionEvent> {
    let radius = positive_radius(scene, ball)?;
    let node = scene.node_mut(ball)?;
    let position = node.transform.position;

    let bottom = position.y - radius;
    if bottom > ground.height {
        return None;
    }

    node.transform.position.y = ground.height + radius;
    node.velocity.y = 0.0;
    node.transition(MotionState::Ball(BallPhase::OnGround));

    Some(CollisionEvent {
        point: Vector3::new(position.x, ground.height, position.z),
        normal: Vector3::unit_y(),
        depth: ground.height - bottom,
    })
}

/// Ball against a static plane: snap out along the normal and reflect the normal
/// velocity component scaled by the wall's restitution
pub fn handle_static_wall(scene: &mut Scene, ball: NodeId, wall: &StaticWall) -> Option<CollisionEvent> {
    if wall.normal.magnitude2() < EPSILON {
        return None;
    }
    let radius = positive_radius(scene, ball)?;
    let node = scene.node_mut(ball)?;
    let n = wall.normal;

    let gap = node.transform.position.dot(n) - wall.offset - radius;
    let normal_speed = node.velocity.dot(n);
    if gap > 0.0 || normal_speed >= 0.0 {
        return None;
    }

    node.transform.position -= n * gap;
    node.velocity -= n * (normal_speed * (1.0 + wall.restitution));

    log::debug!(
        "{} hit wall (depth {:.3}), velocity now {:?}",
        node.name,
        -gap,
        node.velocity
    );

    Some(CollisionEvent {
        point: node.transform.position - n * radius,
        normal: n,
        depth: -gap,
    })
}

/// Ball crossing the angled wall's boundary: snap back and leave along the redirect
/// direction at unchanged speed
pub fn handle_angled_wall(scene: &mut Scene, ball: NodeId, wall: &AngledWall) -> Option<CollisionEvent> {
    let radius = positive_radius(scene, ball)?;
    let node = scene.node_mut(ball)?;
    let position = node.transform.position;

    let leading = position.x - radius;
    if leading >= wall.boundary_x {
        return None;
    }

    node.transform.position.x = wall.boundary_x + radius;
    node.velocity = wall.redirect_direction * node.velocity.magnitude();

    log::debug!("{} redirected by angled wall, velocity now {:?}", node.name, node.velocity);

    Some(CollisionEvent {
        point: Vector3::new(wall.boundary_x, position.y, position.z),
        normal: wall.normal,
        depth: wall.boundary_x - leading,
    })
}

/// Ball against the swinging bar.
///
/// The bar is the segment `(0, ±length/2, 0)` in the bar's local frame. An approaching
/// ball gets an impulse relative to the bar's surface velocity and is pushed clear;
/// any contact launches the ball into the air.
pub fn handle_bar_ball(
    scene: &mut Scene,
    ball: NodeId,
    bar: NodeId,
    disc: NodeId,
    pivot: NodeId,
) -> Option<CollisionEvent> {
    let ball_radius = positive_radius(scene, ball)?;
    let bar_node = scene.node(bar)?;
    let bar_radius = bar_node.radius()?;
    let bar_length = bar_node.data.scalar(keys::LENGTH)?;
    let restitution = bar_node
        .data
        .scalar(keys::RESTITUTION)
        .unwrap_or(DEFAULT_BAR_RESTITUTION);

    let half = bar_length * 0.5;
    let a = scene.point_to_world(bar, Vector3::new(0.0, -half, 0.0))?;
    let b = scene.point_to_world(bar, Vector3::new(0.0, half, 0.0))?;
    let center = scene.node(ball)?.transform.position;

    let projection = distance_point_to_segment(center, a, b);
    let min_distance = ball_radius + bar_radius;
    if projection.distance >= min_distance {
        return None;
    }

    // A center on the bar axis has no contact direction: launch without an impulse
    let on_axis = projection.distance < EPSILON;
    let normal = if on_axis {
        Vector3::zero()
    } else {
        (center - projection.closest_point) / projection.distance
    };
    let bar_velocity =
        bar_surface_velocity(scene, disc, pivot, projection.closest_point).unwrap_or_else(Vector3::zero);
    let overlap = min_distance - projection.distance;

    let node = scene.node_mut(ball)?;
    let along_normal = (node.velocity - bar_velocity).dot(normal);
    if along_normal < 0.0 {
        let impulse = -(1.0 + restitution) * along_normal;
        node.velocity += normal * impulse;
        node.transform.position += normal * (overlap + BAR_SEPARATION_SLOP);
    }
    node.force_in_air();

    log::debug!(
        "{} struck by bar at t={:.2} (bar velocity {:?}), velocity now {:?}",
        node.name,
        projection.t,
        bar_velocity,
        node.velocity
    );

    Some(CollisionEvent {
        point: projection.closest_point,
        normal: if on_axis { Vector3::unit_y() } else { normal },
        depth: overlap,
    })
}

/// Head-on exchange of x velocity between two balls.
///
/// Masses come from each ball's `mass` constant (1 and 2 when absent). Both balls lose
/// their y and z velocity.
pub fn handle_ball_ball(scene: &mut Scene, striker: NodeId, target: NodeId) -> Option<CollisionEvent> {
    if striker == target {
        return None;
    }
    let radius_a = positive_radius(scene, striker)?;
    let radius_b = positive_radius(scene, target)?;

    let node_a = scene.node(striker)?;
    let node_b = scene.node(target)?;
    let (pos_a, pos_b) = (node_a.transform.position, node_b.transform.position);
    let mass_a = node_a.data.scalar(keys::MASS).unwrap_or(DEFAULT_STRIKER_MASS);
    let mass_b = node_b.data.scalar(keys::MASS).unwrap_or(DEFAULT_TARGET_MASS);
    let (u_a, u_b) = (node_a.velocity.x, node_b.velocity.x);

    let distance = pos_a.distance(pos_b);
    let reach = radius_a + radius_b;
    if distance > reach || distance < EPSILON {
        return None;
    }

    let total = mass_a + mass_b;
    let v_a = (u_a * (mass_a - mass_b) + 2.0 * mass_b * u_b) / total;
    let v_b = (u_b * (mass_b - mass_a) + 2.0 * mass_a * u_a) / total;

    if let Some(node) = scene.node_mut(striker) {
        node.velocity = Vector3::new(v_a, 0.0, 0.0);
    }
    if let Some(node) = scene.node_mut(target) {
        node.velocity = Vector3::new(v_b, 0.0, 0.0);
    }

    log::debug!("Ball-ball contact: x velocities {:.3},{:.3} -> {:.3},{:.3}", u_a, u_b, v_a, v_b);

    let normal = (pos_b - pos_a) / distance;
    Some(CollisionEvent {
        point: pos_a + normal * radius_a,
        normal,
        depth: reach - distance,
    })
}

/// Ball against a standing domino's mesh bounds: start the topple and stop the ball
pub fn handle_ball_domino(
    scene: &mut Scene,
    ball: NodeId,
    domino: NodeId,
    domino_mesh: NodeId,
) -> Option<CollisionEvent> {
    let domino_node = scene.node(domino)?;
    if domino_node.domino_phase() != Some(DominoPhase::Standing) {
        return None;
    }
    let push = domino_node
        .data
        .scalar(keys::INITIAL_PUSH)
        .unwrap_or(DEFAULT_DOMINO_PUSH);

    let radius = positive_radius(scene, ball)?;
    let bounds = scene.world_bounds(domino_mesh)?;
    let center = scene.node(ball)?.transform.position;
    if !sphere_aabb_collision(center, radius, &bounds) {
        return None;
    }

    let closest = bounds.closest_point(center);
    let offset = center - closest;
    let normal = if offset.magnitude2() < EPSILON {
        Vector3::unit_y()
    } else {
        offset.normalize()
    };

    let domino_node = scene.node_mut(domino)?;
    domino_node.transition(MotionState::Domino(DominoPhase::Toppling));
    domino_node.data.set_scalar(keys::ANGULAR_VELOCITY, push);

    if let Some(node) = scene.node_mut(ball) {
        node.velocity = Vector3::zero();
    }

    Some(CollisionEvent {
        point: closest,
        normal,
        depth: radius - offset.magnitude(),
    })
}
