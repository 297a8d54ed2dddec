//! Core simulation trait
//!
//! Defines the interface a scene simulation implements to be driven by the
//! [`FrameDriver`](super::manager::FrameDriver).

use crate::error::SceneError;
use crate::gfx::lighting::LightRig;
use crate::gfx::scene::Scene;
use crate::simulation::context::SimulationContext;

/// Lifecycle of a simulation running on a scene
pub trait Simulation {
    /// Initialize the simulation
    ///
    /// Called once when the simulation is attached. Builds nodes, registers meshes and
    /// wires behaviors.
    ///
    /// # Arguments
    /// * `scene` - Mutable reference to the scene for adding objects
    fn initialize(&mut self, scene: &mut Scene) -> Result<(), SceneError>;

    /// Advance the simulation by one fixed step
    ///
    /// # Arguments
    /// * `delta_time` - Fixed step length in seconds
    /// * `scene` - Scene whose nodes the behaviors update
    fn update(&mut self, delta_time: f32, scene: &mut Scene);

    /// Get simulation name for logs and status output
    fn name(&self) -> &str;

    /// Whether simulation is currently running
    fn is_running(&self) -> bool;

    /// Start/pause simulation
    fn set_running(&mut self, running: bool);

    /// Reset simulation to initial state
    fn reset(&mut self, scene: &mut Scene);

    /// Clock and focus of the current run, if the simulation keeps one
    fn context(&self) -> Option<&SimulationContext> {
        None
    }

    /// Lights the simulation hands to the shading stage
    fn lights(&self) -> Option<&LightRig> {
        None
    }

    fn lights_mut(&mut self) -> Option<&mut LightRig> {
        None
    }

    /// Optional: Custom cleanup when simulation is removed
    fn cleanup(&mut self, _scene: &mut Scene) {
        // Default: no cleanup needed
    }
}
