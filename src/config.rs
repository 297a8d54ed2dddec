//! Scene configuration loaded from YAML.
//!
//! Every placement and physical constant of the contraption lives here. The `Default`
//! values reproduce the reference scene, and every section is `#[serde(default)]`, so a
//! file only has to list the fields it changes:
//!
//! ```yaml
//! rolling_ball:
//!   start_delay: 0.5
//! domino:
//!   fallen_color: 255  # 0x0000FF
//! ```

use std::f32::consts::PI;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading or writing a config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed YAML or fields of the wrong type.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Well-formed but physically meaningless values.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fixed simulation step in seconds
    pub timestep: f32,
    /// Most fixed steps a single wall-clock advance may run
    pub max_substeps: u32,
    pub gravity: [f32; 3],
    pub ramp: RampConfig,
    pub ground: GroundConfig,
    pub back_wall: WallConfig,
    pub angled_wall: AngledWallConfig,
    pub rolling_ball: RollingBallConfig,
    pub target_ball: BallConfig,
    pub spinner: SpinnerConfig,
    pub domino: DominoConfig,
    pub lights: LightsConfig,
    pub decorations: Vec<DecorationConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            max_substeps: 8,
            gravity: [0.0, -9.8, 0.0],
            ramp: RampConfig::default(),
            ground: GroundConfig::default(),
            back_wall: WallConfig::default(),
            angled_wall: AngledWallConfig::default(),
            rolling_ball: RollingBallConfig::default(),
            target_ball: BallConfig::default(),
            spinner: SpinnerConfig::default(),
            domino: DominoConfig::default(),
            lights: LightsConfig::default(),
            decorations: default_decorations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampConfig {
    pub position: [f32; 3],
    /// Euler angles in radians (XYZ order)
    pub rotation: [f32; 3],
    pub size: [f32; 3],
    pub color: u32,
    pub texture: Option<String>,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            position: [10.0, -0.5, 0.0],
            rotation: [0.0, 0.0, PI / 6.0],
            size: [20.0, 0.2, 3.0],
            color: 0x444444,
            texture: Some("concrete".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Height of the collision plane
    pub height: f32,
    pub position: [f32; 3],
    pub size: [f32; 3],
    pub color: u32,
    pub texture: Option<String>,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            height: -83.0,
            position: [-20.0, -84.0, 0.0],
            size: [400.0, 1.0, 400.0],
            color: 0x444444,
            texture: Some("floor".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    pub position: [f32; 3],
    pub size: [f32; 3],
    pub color: u32,
    pub texture: Option<String>,
    /// Collision plane `p·normal = offset`
    pub normal: [f32; 3],
    pub offset: f32,
    pub restitution: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            position: [-50.0, -58.0, -40.0],
            size: [50.0, 50.0, 1.0],
            color: 0x0000FF,
            texture: Some("brick".into()),
            normal: [0.0, 0.0, 1.0],
            offset: -40.0,
            restitution: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngledWallConfig {
    pub position: [f32; 3],
    pub size: [f32; 3],
    pub color: u32,
    pub texture: Option<String>,
    /// Balls whose leading edge crosses this x are redirected
    pub boundary_x: f32,
    /// Velocity the wall orientation is solved for. The default is the rolling ball's
    /// arrival velocity; the redirected ball then runs along x wide of the target ball.
    pub incoming_velocity: [f32; 3],
    pub outgoing_direction: [f32; 3],
}

impl Default for AngledWallConfig {
    fn default() -> Self {
        Self {
            position: [-120.0, -58.0, 25.0],
            size: [50.0, 50.0, 1.0],
            color: 0x0000FF,
            texture: Some("brick".into()),
            boundary_x: -120.0,
            incoming_velocity: [-30.776_717, 0.0, 25.068_66],
            outgoing_direction: [1.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingBallConfig {
    pub position: [f32; 3],
    pub radius: f32,
    pub mass: f32,
    /// Simulated seconds the ball waits at the top of the ramp
    pub start_delay: f32,
    pub ramp_end_x: f32,
    pub color: u32,
    pub texture: Option<String>,
}

impl Default for RollingBallConfig {
    fn default() -> Self {
        Self {
            position: [18.0, 5.2, 0.0],
            radius: 1.0,
            mass: 1.0,
            start_delay: 2.21,
            ramp_end_x: 4.0,
            color: 0xFF0000,
            texture: Some("checkerboard".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub position: [f32; 3],
    pub radius: f32,
    pub mass: f32,
    pub color: u32,
    pub texture: Option<String>,
}

/// The default target sits at z 24.5, while the default redirect sends the rolling ball
/// along x at about z 35.6. The two pass roughly 11 units apart, so the stock scene never
/// reaches the ball-ball and domino stages; move either one to stage that hit.
impl Default for BallConfig {
    fn default() -> Self {
        Self {
            position: [-30.0, -81.0, 24.507_275],
            radius: 2.0,
            mass: 2.0,
            color: 0xFF0000,
            texture: Some("metal".into()),
        }
    }
}

/// Disc, pole, arm, pivot and swinging bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinnerConfig {
    pub disc_position: [f32; 3],
    pub disc_radius: f32,
    pub disc_thickness: f32,
    pub disc_scale: f32,
    /// Radians per second about world +Y
    pub disc_speed: f32,
    pub disc_color: u32,
    pub pole_offset: [f32; 3],
    pub pole_radius: f32,
    pub pole_height: f32,
    pub arm_offset: [f32; 3],
    pub arm_radius: f32,
    pub arm_length: f32,
    pub frame_color: u32,
    pub pivot_offset: [f32; 3],
    /// Radians per second about the pivot's local +Y
    pub pivot_speed: f32,
    pub bar_offset: [f32; 3],
    pub bar_radius: f32,
    pub bar_length: f32,
    pub bar_restitution: f32,
    pub bar_color: u32,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            disc_position: [-20.5, -22.0, 0.0],
            disc_radius: 3.0,
            disc_thickness: 0.2,
            disc_scale: 1.5,
            disc_speed: 0.5,
            disc_color: 0x555555,
            pole_offset: [-2.8, 2.0, 0.0],
            pole_radius: 0.1,
            pole_height: 4.0,
            arm_offset: [-1.5, 1.9, 0.0],
            arm_radius: 0.05,
            arm_length: 3.0,
            frame_color: 0xFF0000,
            pivot_offset: [0.0, 4.0, 0.0],
            pivot_speed: 3.0,
            bar_offset: [-2.5, -2.5, 0.0],
            bar_radius: 0.05,
            bar_length: 5.0,
            bar_restitution: 1.2,
            bar_color: 0x00FF00,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DominoConfig {
    /// Pivot position on the ground; the slab stands on it
    pub position: [f32; 3],
    pub size: [f32; 3],
    pub color: u32,
    pub fallen_color: u32,
    /// Angular velocity given by the ball's impact
    pub initial_push: f32,
    pub angular_acceleration: f32,
}

impl Default for DominoConfig {
    fn default() -> Self {
        Self {
            position: [30.0, -83.0, 24.507_275],
            size: [0.5, 10.0, 5.0],
            color: 0x888800,
            fallen_color: 0x00FF00,
            initial_push: 1.0,
            angular_acceleration: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Point,
    Spot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub kind: LightKind,
    pub position: [f32; 3],
    #[serde(default)]
    pub direction: [f32; 3],
    pub color: u32,
    /// Cone half-angle in radians, spot lights only
    #[serde(default)]
    pub half_angle: f32,
    pub intensity: f32,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    /// Exactly three lights
    pub lights: Vec<LightConfig>,
    /// Light that follows the focused ball
    pub tracking_index: usize,
    pub tracking_offset: [f32; 3],
    pub marker_radius: f32,
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            lights: vec![
                LightConfig {
                    kind: LightKind::Point,
                    position: [0.0, 50.0, 50.0],
                    direction: [0.0, 0.0, 0.0],
                    color: 0xFFFFFF,
                    half_angle: 0.0,
                    intensity: 0.6,
                    enabled: true,
                },
                LightConfig {
                    kind: LightKind::Spot,
                    position: [-80.0, 40.0, 0.0],
                    direction: [1.0, -1.0, 0.0],
                    color: 0xFF0000,
                    half_angle: PI / 6.0,
                    intensity: 2.0,
                    enabled: true,
                },
                LightConfig {
                    kind: LightKind::Spot,
                    position: [0.0, 80.0, 80.0],
                    direction: [0.0, -1.0, 0.0],
                    color: 0x00FFFF,
                    half_angle: PI / 15.0,
                    intensity: 0.8,
                    enabled: true,
                },
            ],
            tracking_index: 2,
            tracking_offset: [0.0, 20.0, 0.0],
            marker_radius: 2.0,
        }
    }
}

/// Static scenery with no behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationConfig {
    pub name: String,
    /// Model label resolved by the renderer
    pub model: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: f32,
    pub color: u32,
    #[serde(default)]
    pub texture: Option<String>,
}

fn unit_scale() -> f32 {
    1.0
}

fn decoration(
    name: &str,
    model: &str,
    position: [f32; 3],
    rotation: [f32; 3],
    scale: f32,
    color: u32,
    texture: &str,
) -> DecorationConfig {
    DecorationConfig {
        name: name.into(),
        model: model.into(),
        position,
        rotation,
        scale,
        color,
        texture: Some(texture.into()),
    }
}

fn default_decorations() -> Vec<DecorationConfig> {
    let quarter = PI / 4.0;
    let half = PI / 2.0;
    vec![
        decoration("airplane_1", "airplane", [20.0, -23.5, 20.0], [-half, 0.0, 0.0], 40.0, 0x888888, "metal"),
        decoration("airplane_2", "airplane", [-30.0, -43.0, 60.0], [-quarter, -PI, 0.0], 40.0, 0x888008, "grunge"),
        decoration("airplane_3", "airplane", [-70.0, -43.0, 30.0], [quarter, half, quarter], 40.0, 0x800088, "wood1"),
        decoration("ant_1", "ant", [-40.0, -63.0, -10.0], [0.0, 0.0, 0.0], 50.0, 0x228B22, "redpaint"),
        decoration("apple_1", "apple", [-10.0, -63.0, 50.0], [0.0, -half, 0.0], 5.0, 0xFFD700, "redpaint"),
        decoration("apple_2", "apple", [-20.0, -63.0, 50.0], [0.0, -half, 0.0], 5.0, 0xFFD700, "redpaint"),
        decoration("apple_3", "apple", [-20.0, -63.0, 40.0], [0.0, -half, 0.0], 5.0, 0xFFD700, "redpaint"),
        decoration("apple_4", "apple", [-15.0, -63.0, 45.0], [0.0, -half, 0.0], 5.0, 0xFFD700, "redpaint"),
        decoration("apple_5", "apple", [-10.0, -63.0, 45.0], [0.0, -half, 0.0], 5.0, 0xFFD700, "redpaint"),
        decoration("trash_1", "trashcan", [10.0, -78.5, 40.0], [-half, 0.0, 0.0], 5.0, 0xFFF7FF, "metal"),
        decoration("beethoven_1", "beethoven", [100.0, -58.5, 40.0], [0.0, -half, 0.0], 50.0, 0x1FF7FF, "stone"),
        decoration("beethoven_2", "beethoven", [10.0, -58.5, -40.0], [0.0, 0.0, 0.0], 50.0, 0x4F00FF, "grunge"),
        decoration("hind_1", "hind", [10.0, -43.5, 40.0], [-quarter, 0.0, PI], 50.0, 0x0FF00F, "rust"),
    ]
}

impl SceneConfig {
    /// Load and validate a config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path.as_ref(), self.to_yaml_string()?)?;
        Ok(())
    }

    /// Rejects values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)))
            }
        }

        positive("timestep", self.timestep)?;
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be at least 1".into()));
        }

        positive("rolling_ball.radius", self.rolling_ball.radius)?;
        positive("rolling_ball.mass", self.rolling_ball.mass)?;
        positive("target_ball.radius", self.target_ball.radius)?;
        positive("target_ball.mass", self.target_ball.mass)?;
        positive("spinner.bar_radius", self.spinner.bar_radius)?;
        positive("spinner.bar_length", self.spinner.bar_length)?;
        positive("spinner.disc_scale", self.spinner.disc_scale)?;
        positive("lights.marker_radius", self.lights.marker_radius)?;
        for (axis, extent) in ["x", "y", "z"].iter().zip(self.domino.size) {
            positive(&format!("domino.size.{}", axis), extent)?;
        }

        if self.back_wall.restitution < 0.0 || self.spinner.bar_restitution < 0.0 {
            return Err(ConfigError::Invalid("restitution cannot be negative".into()));
        }
        if self.back_wall.normal == [0.0, 0.0, 0.0] {
            return Err(ConfigError::Invalid("back_wall.normal cannot be zero".into()));
        }
        if self.lights.lights.len() != crate::gfx::lighting::LIGHT_COUNT {
            return Err(ConfigError::Invalid(format!(
                "expected {} lights, got {}",
                crate::gfx::lighting::LIGHT_COUNT,
                self.lights.lights.len()
            )));
        }
        if self.lights.tracking_index >= self.lights.lights.len() {
            return Err(ConfigError::Invalid(format!(
                "tracking_index {} out of range",
                self.lights.tracking_index
            )));
        }

        Ok(())
    }
}
