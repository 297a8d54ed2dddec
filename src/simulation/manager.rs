//! Fixed-timestep frame driver
//!
//! Owns the scene and the attached simulation, and turns wall-clock frame time into a
//! whole number of fixed simulation steps.

use cgmath::Matrix4;

use super::traits::Simulation;
use crate::error::SceneError;
use crate::gfx::scene::Scene;
use crate::gfx::shading::ShadingFrame;

pub const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// Tolerance for float drift when the accumulator holds exactly `n` steps
const ACCUMULATOR_SLOP: f64 = 1e-6;

/// Drives a simulation on its scene with a fixed timestep
pub struct FrameDriver {
    scene: Scene,
    simulation: Option<Box<dyn Simulation>>,
    is_paused: bool,
    time_scale: f32,
    accumulated_time: f64,
    fixed_timestep: f32,
    max_substeps: u32,
    ticks: u64,
}

impl FrameDriver {
    /// Create a driver around an existing scene
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            simulation: None,
            is_paused: false,
            time_scale: 1.0,
            accumulated_time: 0.0,
            fixed_timestep: DEFAULT_TIMESTEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            ticks: 0,
        }
    }

    /// Attach a simulation and build it into the scene
    ///
    /// # Arguments
    /// * `simulation` - Boxed simulation implementing the Simulation trait
    pub fn attach_simulation(&mut self, mut simulation: Box<dyn Simulation>) -> Result<(), SceneError> {
        // Clean up previous simulation if any
        if let Some(mut old_sim) = self.simulation.take() {
            old_sim.cleanup(&mut self.scene);
        }

        simulation.initialize(&mut self.scene)?;
        log::info!(
            "Attached simulation '{}' ({} nodes)",
            simulation.name(),
            self.scene.len()
        );
        self.simulation = Some(simulation);
        self.is_paused = false;
        self.accumulated_time = 0.0;
        self.ticks = 0;
        Ok(())
    }

    /// Remove current simulation
    pub fn detach_simulation(&mut self) -> Option<Box<dyn Simulation>> {
        let mut sim = self.simulation.take()?;
        sim.cleanup(&mut self.scene);
        Some(sim)
    }

    /// Run exactly one fixed step of a running simulation
    ///
    /// # Returns
    /// `false` when no simulation is attached or it is paused
    pub fn tick(&mut self) -> bool {
        let Some(simulation) = &mut self.simulation else {
            return false;
        };
        if !simulation.is_running() {
            return false;
        }
        simulation.update(self.fixed_timestep, &mut self.scene);
        self.ticks += 1;
        log::trace!("tick {} (dt = {})", self.ticks, self.fixed_timestep);
        true
    }

    /// Feed wall-clock time and run the fixed steps it covers
    ///
    /// At most `max_substeps` steps run per call; time beyond that is dropped.
    ///
    /// # Arguments
    /// * `elapsed` - Wall-clock seconds since the previous call
    ///
    /// # Returns
    /// Number of fixed steps run
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if self.is_paused || !self.simulation.as_ref().is_some_and(|s| s.is_running()) {
            return 0;
        }

        self.accumulated_time += f64::from(elapsed.max(0.0) * self.time_scale);
        let dt = f64::from(self.fixed_timestep);

        let mut steps = 0;
        while self.accumulated_time + ACCUMULATOR_SLOP >= dt && steps < self.max_substeps {
            self.tick();
            self.accumulated_time -= dt;
            steps += 1;
        }

        if steps == self.max_substeps && self.accumulated_time + ACCUMULATOR_SLOP >= dt {
            log::debug!(
                "Dropping {:.4}s of frame time after {} substeps",
                self.accumulated_time,
                steps
            );
            self.accumulated_time = 0.0;
        }
        self.accumulated_time = self.accumulated_time.max(0.0);

        steps
    }

    /// Restore the scene and the simulation to their initial state
    pub fn reset(&mut self) {
        if let Some(simulation) = &mut self.simulation {
            simulation.reset(&mut self.scene);
        }
        self.accumulated_time = 0.0;
        self.ticks = 0;
    }

    /// Collect transforms, materials and lights for the shading stage
    ///
    /// # Arguments
    /// * `view` - Camera view matrix lights are transformed with
    pub fn shading_frame(&self, view: &Matrix4<f32>) -> ShadingFrame {
        let lights = self.simulation.as_ref().and_then(|s| s.lights());
        ShadingFrame::collect(&self.scene, lights, view)
    }

    /// Flip a light on or off and recolor its marker
    ///
    /// # Returns
    /// The light's new state, `false` when the simulation has no lights
    pub fn toggle_light(&mut self, index: usize) -> Result<bool, SceneError> {
        let Some(rig) = self.simulation.as_mut().and_then(|s| s.lights_mut()) else {
            return Ok(false);
        };
        let enabled = rig.toggle(index)?;
        rig.sync_markers(&mut self.scene)?;
        Ok(enabled)
    }

    /// Get current simulation name
    pub fn current_simulation_name(&self) -> Option<&str> {
        self.simulation.as_ref().map(|s| s.name())
    }

    /// Check if a simulation is currently attached
    pub fn has_simulation(&self) -> bool {
        self.simulation.is_some()
    }

    pub fn simulation(&self) -> Option<&dyn Simulation> {
        self.simulation.as_deref()
    }

    /// Check if simulation is paused
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Set pause state
    ///
    /// # Arguments
    /// * `paused` - Whether to pause the simulation
    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
        if let Some(simulation) = &mut self.simulation {
            simulation.set_running(!paused);
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set time scale
    ///
    /// # Arguments
    /// * `scale` - Time scale multiplier (1.0 = normal speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0); // Prevent negative time
    }

    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Change the fixed step; non-positive values are ignored
    pub fn set_fixed_timestep(&mut self, timestep: f32) {
        if timestep > 0.0 && timestep.is_finite() {
            self.fixed_timestep = timestep;
            self.accumulated_time = 0.0; // Reset accumulator
        }
    }

    pub fn set_max_substeps(&mut self, max_substeps: u32) {
        self.max_substeps = max_substeps.max(1);
    }

    pub fn max_substeps(&self) -> u32 {
        self.max_substeps
    }

    /// Fixed steps run since attach or the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds, from the simulation's clock when it keeps one
    pub fn simulated_time(&self) -> f32 {
        self.simulation
            .as_ref()
            .and_then(|s| s.context())
            .map(|ctx| ctx.time())
            .unwrap_or(self.ticks as f32 * self.fixed_timestep)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::SceneNode;
    use cgmath::Vector3;

    /// Moves one node along +X at unit speed
    struct Drift {
        node: Option<crate::gfx::scene::NodeId>,
        running: bool,
        cleaned: bool,
    }

    impl Drift {
        fn new() -> Self {
            Self {
                node: None,
                running: false,
                cleaned: false,
            }
        }
    }

    impl Simulation for Drift {
        fn initialize(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
            self.node = Some(scene.add_root_child(SceneNode::new("drifter")));
            self.running = true;
            Ok(())
        }

        fn update(&mut self, delta_time: f32, scene: &mut Scene) {
            if let Some(node) = self.node.and_then(|id| scene.node_mut(id)) {
                node.transform.position.x += delta_time;
            }
        }

        fn name(&self) -> &str {
            "drift"
        }

        fn is_running(&self) -> bool {
            self.running
        }

        fn set_running(&mut self, running: bool) {
            self.running = running;
        }

        fn reset(&mut self, scene: &mut Scene) {
            if let Some(node) = self.node.and_then(|id| scene.node_mut(id)) {
                node.transform.position = Vector3::new(0.0, 0.0, 0.0);
            }
        }

        fn cleanup(&mut self, _scene: &mut Scene) {
            self.cleaned = true;
        }
    }

    fn driver() -> FrameDriver {
        let mut driver = FrameDriver::new(Scene::new());
        driver.attach_simulation(Box::new(Drift::new())).unwrap();
        driver
    }

    fn drifter_x(driver: &FrameDriver) -> f32 {
        let id = driver.scene().find_by_name("drifter").unwrap();
        driver.scene().node(id).unwrap().transform.position.x
    }

    #[test]
    fn test_tick_without_simulation() {
        let mut driver = FrameDriver::new(Scene::new());
        assert!(!driver.tick());
        assert_eq!(driver.advance(1.0), 0);
        assert!(driver.current_simulation_name().is_none());
    }

    #[test]
    fn test_advance_runs_whole_steps() {
        let mut driver = driver();
        assert_eq!(driver.advance(3.0 / 60.0), 3);
        assert_eq!(driver.ticks(), 3);
        assert_eq!(driver.advance(0.5 / 60.0), 0);
        assert_eq!(driver.advance(0.5 / 60.0), 1);
        assert!((drifter_x(&driver) - 4.0 / 60.0).abs() < 1e-5);
    }

    #[test]
    fn test_advance_caps_substeps_and_drops_excess() {
        let mut driver = driver();
        driver.set_max_substeps(4);
        assert_eq!(driver.advance(1.0), 4);
        // The dropped backlog does not leak into the next frame
        assert_eq!(driver.advance(0.0), 0);
    }

    #[test]
    fn test_pause_and_time_scale() {
        let mut driver = driver();
        driver.set_paused(true);
        assert_eq!(driver.advance(1.0), 0);
        assert!(!driver.tick());
        assert_eq!(driver.ticks(), 0);
        assert_eq!(drifter_x(&driver), 0.0);

        driver.set_paused(false);
        driver.set_time_scale(2.0);
        assert_eq!(driver.advance(1.0 / 60.0), 2);

        driver.set_time_scale(-1.0);
        assert_eq!(driver.time_scale(), 0.0);
    }

    #[test]
    fn test_reset_and_simulated_time() {
        let mut driver = driver();
        driver.advance(5.0 / 60.0);
        assert!((driver.simulated_time() - 5.0 / 60.0).abs() < 1e-6);

        driver.reset();
        assert_eq!(driver.ticks(), 0);
        assert_eq!(drifter_x(&driver), 0.0);
    }

    #[test]
    fn test_toggle_light_without_rig() {
        let mut driver = driver();
        assert_eq!(driver.toggle_light(0), Ok(false));
    }

    #[test]
    fn test_detach_runs_cleanup() {
        let mut driver = driver();
        assert_eq!(driver.current_simulation_name(), Some("drift"));
        assert!(driver.detach_simulation().is_some());
        assert!(!driver.has_simulation());
    }
}
