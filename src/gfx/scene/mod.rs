//! # Scene Graph Module
//!
//! Hierarchical node tree driven once per fixed simulation step.
//!
//! ## Key Components
//!
//! - [`Scene`] - Arena that owns every node and the mesh library
//! - [`SceneNode`] - Transform, material, motion state and behavior of one entity
//! - [`NodeData`] - Named constants frozen at construction plus per-tick values
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use contraption::gfx::scene::{Scene, SceneNode};
//!
//! let mut scene = Scene::new();
//! let parent = scene.add_root_child(SceneNode::new("parent").with_position(Vector3::new(1.0, 0.0, 0.0)));
//! let child = scene.add(parent, SceneNode::new("child")).unwrap();
//! scene.propagate_transforms();
//! assert_eq!(scene.world_position(child), Some(Vector3::new(1.0, 0.0, 0.0)));
//! ```

pub mod node;
pub mod scene;

pub use node::{
    euler_xyz, keys, BallPhase, DataValue, DominoPhase, MeshId, MotionState, NodeData, NodeId,
    SceneNode, Transform,
};
pub use scene::{Scene, SceneStatistics};
