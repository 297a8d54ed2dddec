//! Simulation clock and focus shared with behaviors during a run

use crate::gfx::scene::NodeId;

/// Per-run simulation state handed to every behavior by reference.
///
/// Created when the scene is assembled and zeroed only by an explicit reset.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    elapsed: f64,
    step_count: u64,
    focus: Option<NodeId>,
    initial_focus: Option<NodeId>,
}

impl SimulationContext {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            step_count: 0,
            focus: None,
            initial_focus: None,
        }
    }

    /// Context whose focus returns to `focus` on every reset
    pub fn with_focus(focus: NodeId) -> Self {
        Self {
            focus: Some(focus),
            initial_focus: Some(focus),
            ..Self::new()
        }
    }

    /// Simulated seconds since assembly or the last reset
    pub fn time(&self) -> f32 {
        self.elapsed as f32
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Record a completed simulation step
    pub fn advance(&mut self, delta_time: f32) {
        self.step_count += 1;
        self.elapsed += f64::from(delta_time);
    }

    /// Node the tracking light follows
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    pub fn set_focus(&mut self, focus: NodeId) {
        if self.focus != Some(focus) {
            log::info!("Focus moved to node {}", focus.index());
        }
        self.focus = Some(focus);
    }

    /// Get average step length over the run
    pub fn average_step(&self) -> f32 {
        if self.step_count > 0 {
            (self.elapsed / self.step_count as f64) as f32
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.step_count = 0;
        self.focus = self.initial_focus;
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new()
    }
}
