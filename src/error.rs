//! Error types for scene-level operations

use thiserror::Error;

use crate::gfx::scene::NodeId;

/// Misuse of the scene and light APIs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The id does not belong to this scene.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    /// Light index outside the fixed light array.
    #[error("light index {index} out of range (rig has {count} lights)")]
    InvalidLightIndex { index: usize, count: usize },
}

/// Failure to assemble a runnable scene
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}
