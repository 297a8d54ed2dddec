//! Narrow-phase collision core
//!
//! Special-cased collision tests and impulse responses between the scene's balls and the
//! static or animated props they run into. There is no broad phase: every handler is
//! called with the exact pair of node ids it needs.

pub mod aabb;
pub mod collision;
pub mod geometry;
pub mod kinematics;

pub use aabb::Aabb;
pub use collision::{
    handle_angled_wall, handle_ball_ball, handle_ball_domino, handle_bar_ball, handle_ground,
    handle_static_wall, AngledWall, CollisionEvent, GroundPlane, StaticWall,
};
pub use geometry::{distance_point_to_segment, sphere_aabb_collision, SegmentProjection};
pub use kinematics::{bar_surface_velocity, compound_point_velocity, RotatingJoint};

/// Tolerance for degenerate lengths and normals
pub const EPSILON: f32 = 1e-6;
