// src/simulation/mod.rs
//! Simulation system
//!
//! Per-node behaviors, the run clock, the [`Simulation`](traits::Simulation) interface
//! and the fixed-timestep [`FrameDriver`](manager::FrameDriver) that runs it.

pub mod behaviors;
pub mod context;
pub mod contraption;
pub mod manager;
pub mod traits;

pub use contraption::{Contraption, ContraptionNodes};
pub use manager::FrameDriver;
pub use traits::Simulation;
