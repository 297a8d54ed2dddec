//! # Contraption Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use contraption::prelude::*;
//!
//! let mut driver = contraption::default().unwrap();
//! driver.advance(1.0 / 60.0);
//! let frame = driver.shading_frame(&Matrix4::identity());
//! assert!(!frame.objects.is_empty());
//! ```

// Re-export scene types
pub use crate::gfx::geometry::{generate_box, generate_cylinder, generate_sphere, GeometryData};
pub use crate::gfx::lighting::{LightDescriptor, LightRig};
pub use crate::gfx::material::Material;
pub use crate::gfx::scene::{
    keys, BallPhase, DominoPhase, MotionState, NodeData, NodeId, Scene, SceneNode, Transform,
};
pub use crate::gfx::shading::ShadingFrame;

// Re-export simulation framework
pub use crate::simulation::behaviors::{Behavior, Updatable};
pub use crate::simulation::context::SimulationContext;
pub use crate::simulation::{Contraption, FrameDriver, Simulation};

pub use crate::config::SceneConfig;
pub use crate::error::{LaunchError, SceneError};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Zero};
