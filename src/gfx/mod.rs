//! # Graphics Module
//!
//! Scene graph, mesh data, materials and lights, plus the plain-data handoff to an
//! external shading stage. Nothing here talks to a GPU.
//!
//! ## Architecture Overview
//!
//! - **Scene Management** ([`scene`]) - Node arena, transforms and traversal
//! - **Geometry** ([`geometry`]) - Procedural meshes and their bounding boxes
//! - **Materials** ([`material`]) - Phong parameters and hex colors
//! - **Lighting** ([`lighting`]) - Fixed three-light rig with markers and a tracking spot
//! - **Shading Handoff** ([`shading`]) - `bytemuck` uniforms collected once per frame
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Matrix4, SquareMatrix};
//! use contraption::gfx::{scene::Scene, shading::ShadingFrame};
//!
//! let scene = Scene::new();
//! let frame = ShadingFrame::collect(&scene, None, &Matrix4::identity());
//! assert!(frame.objects.is_empty());
//! ```

pub mod geometry;
pub mod lighting;
pub mod material;
pub mod scene;
pub mod shading;

// Re-export commonly used types
pub use lighting::{LightDescriptor, LightRig};
pub use material::Material;
pub use shading::ShadingFrame;
