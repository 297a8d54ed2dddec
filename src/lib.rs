// src/lib.rs
//! Contraption
//!
//! Scene-graph and collision core for a Rube-Goldberg style 3D scene: a tree of animated
//! nodes stepped with a fixed timestep, special-cased narrow-phase ball collisions, and
//! transforms and lights handed to a shading stage as plain data.

pub mod config;
pub mod error;
pub mod gfx;
pub mod physics;
pub mod prelude;
pub mod simulation;

pub use config::{ConfigError, SceneConfig};
pub use error::{LaunchError, SceneError};
pub use simulation::{Contraption, FrameDriver};

use gfx::scene::Scene;

/// Builds the contraption described by `config` into a fresh scene and driver
pub fn launch(config: SceneConfig) -> Result<FrameDriver, LaunchError> {
    let mut driver = FrameDriver::new(Scene::new());
    driver.set_fixed_timestep(config.timestep);
    driver.set_max_substeps(config.max_substeps);
    driver.attach_simulation(Box::new(Contraption::new(config)?))?;
    Ok(driver)
}

/// Creates a driver running the default scene
pub fn default() -> Result<FrameDriver, LaunchError> {
    launch(SceneConfig::default())
}
