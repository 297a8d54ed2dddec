//! Light descriptors and the fixed three-light rig
//!
//! The rig is written by the simulation (the tracking spot follows the focused node) and
//! read by the shading handoff. Each light can have a marker node in the scene that sits
//! at the light's position and dims while the light is switched off.

use cgmath::{InnerSpace, Vector3, Zero};

use crate::error::SceneError;
use crate::gfx::material::hex_to_rgb;
use crate::gfx::scene::{NodeId, Scene};

/// Number of lights the shading stage expects
pub const LIGHT_COUNT: usize = 3;

/// Marker color of a disabled light
pub const DISABLED_MARKER_COLOR: u32 = 0x111111;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDescriptor {
    pub position: Vector3<f32>,
    /// Unit direction for spot lights, zero for point lights
    pub direction: Vector3<f32>,
    pub color: [f32; 3],
    pub enabled: bool,
    pub spot: bool,
    /// Cosine of the cone half-angle; unused by point lights
    pub cutoff: f32,
    pub intensity: f32,
}

impl LightDescriptor {
    pub fn point(position: Vector3<f32>, color: [f32; 3], intensity: f32) -> Self {
        Self {
            position,
            direction: Vector3::zero(),
            color,
            enabled: true,
            spot: false,
            cutoff: 0.0,
            intensity,
        }
    }

    /// Spot light; `direction` is normalized and `half_angle` is in radians
    pub fn spot(
        position: Vector3<f32>,
        direction: Vector3<f32>,
        color: [f32; 3],
        half_angle: f32,
        intensity: f32,
    ) -> Self {
        Self {
            position,
            direction: normalize_or_down(direction),
            color,
            enabled: true,
            spot: true,
            cutoff: half_angle.cos(),
            intensity,
        }
    }
}

impl Default for LightDescriptor {
    fn default() -> Self {
        Self::point(Vector3::zero(), [1.0, 1.0, 1.0], 1.0)
    }
}

fn normalize_or_down(direction: Vector3<f32>) -> Vector3<f32> {
    if direction.magnitude2() < crate::physics::EPSILON {
        -Vector3::unit_y()
    } else {
        direction.normalize()
    }
}

/// A spot that hovers at `offset` from the focused node and points at it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingSpot {
    pub index: usize,
    pub offset: Vector3<f32>,
}

pub struct LightRig {
    lights: [LightDescriptor; LIGHT_COUNT],
    markers: [Option<NodeId>; LIGHT_COUNT],
    tracking: Option<TrackingSpot>,
}

impl LightRig {
    pub fn new(lights: [LightDescriptor; LIGHT_COUNT]) -> Self {
        Self {
            lights,
            markers: [None; LIGHT_COUNT],
            tracking: None,
        }
    }

    fn check_index(index: usize) -> Result<(), SceneError> {
        if index < LIGHT_COUNT {
            Ok(())
        } else {
            Err(SceneError::InvalidLightIndex {
                index,
                count: LIGHT_COUNT,
            })
        }
    }

    /// Makes light `index` follow the focus node
    pub fn set_tracking(&mut self, index: usize, offset: Vector3<f32>) -> Result<(), SceneError> {
        Self::check_index(index)?;
        self.tracking = Some(TrackingSpot { index, offset });
        Ok(())
    }

    pub fn tracking(&self) -> Option<TrackingSpot> {
        self.tracking
    }

    pub fn lights(&self) -> &[LightDescriptor; LIGHT_COUNT] {
        &self.lights
    }

    pub fn light(&self, index: usize) -> Result<&LightDescriptor, SceneError> {
        Self::check_index(index)?;
        Ok(&self.lights[index])
    }

    /// Flips light `index` on or off and returns the new state
    pub fn toggle(&mut self, index: usize) -> Result<bool, SceneError> {
        Self::check_index(index)?;
        let light = &mut self.lights[index];
        light.enabled = !light.enabled;
        log::info!("Light {} {}", index, if light.enabled { "on" } else { "off" });
        Ok(light.enabled)
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), SceneError> {
        Self::check_index(index)?;
        self.lights[index].enabled = enabled;
        Ok(())
    }

    pub fn attach_marker(&mut self, index: usize, marker: NodeId) -> Result<(), SceneError> {
        Self::check_index(index)?;
        self.markers[index] = Some(marker);
        Ok(())
    }

    pub fn marker(&self, index: usize) -> Option<NodeId> {
        self.markers.get(index).copied().flatten()
    }

    /// Moves the tracking spot above `focus` and aims it at `focus`
    pub fn track(&mut self, focus: Vector3<f32>) {
        let Some(tracking) = self.tracking else {
            return;
        };
        let light = &mut self.lights[tracking.index];
        light.position = focus + tracking.offset;
        light.direction = normalize_or_down(focus - light.position);
    }

    /// Places every marker at its light and colors it by the light's state
    pub fn sync_markers(&self, scene: &mut Scene) -> Result<(), SceneError> {
        let dim = hex_to_rgb(DISABLED_MARKER_COLOR);
        for (light, marker) in self.lights.iter().zip(self.markers.iter()) {
            let Some(marker) = *marker else {
                continue;
            };
            let node = scene.node_mut(marker).ok_or(SceneError::UnknownNode(marker))?;
            node.transform.position = light.position;
            if let Some(material) = node.material.as_mut() {
                material.color = if light.enabled { light.color } else { dim };
            }
            // Markers are leaves under the root; their cached matrix has to follow now
            scene.refresh_world(marker)?;
        }
        Ok(())
    }
}
