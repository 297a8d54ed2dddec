//! The Rube-Goldberg scene: assembly from [`SceneConfig`] and the per-step loop.
//!
//! Nodes are created in a fixed order (ramp, walls, ground, balls, the spinning disc
//! assembly, the domino, light markers, decorations). Traversal follows the same order,
//! so the rolling ball always reads the bar's world matrix from the previous step.

use cgmath::{Quaternion, Vector3};

use super::behaviors::{
    BallObstacles, CoastingBall, Domino, RollingBall, RollingBallLinks, Spinner,
};
use super::context::SimulationContext;
use super::traits::Simulation;
use crate::config::{ConfigError, LightConfig, LightKind, SceneConfig};
use crate::error::SceneError;
use crate::gfx::geometry::{generate_box, generate_cylinder, generate_sphere};
use crate::gfx::lighting::{LightDescriptor, LightRig, LIGHT_COUNT};
use crate::gfx::material::{hex_to_rgb, Material};
use crate::gfx::scene::{
    keys, BallPhase, DominoPhase, MotionState, NodeData, NodeId, Scene, SceneNode, Transform,
};
use crate::physics::collision::{AngledWall, GroundPlane, StaticWall};

const SPHERE_SEGMENTS: u32 = 32;
const CYLINDER_SEGMENTS: u32 = 32;
/// Edge of the placeholder box decorations are drawn with until their model is loaded
const DECORATION_PLACEHOLDER_SIZE: f32 = 2.0;

/// Ids of every node the contraption wires together
#[derive(Debug, Clone, PartialEq)]
pub struct ContraptionNodes {
    pub ramp: NodeId,
    pub back_wall: NodeId,
    pub angled_wall: NodeId,
    pub ground: NodeId,
    pub rolling_ball: NodeId,
    pub target_ball: NodeId,
    pub disc: NodeId,
    pub pole: NodeId,
    pub arm: NodeId,
    pub pivot: NodeId,
    pub bar: NodeId,
    pub domino: NodeId,
    pub domino_mesh: NodeId,
    pub markers: [NodeId; LIGHT_COUNT],
    pub decorations: Vec<NodeId>,
}

impl ContraptionNodes {
    /// Nodes that carry a behavior once wired
    pub fn driven(&self) -> [NodeId; 5] {
        [self.rolling_ball, self.target_ball, self.disc, self.pivot, self.domino]
    }
}

pub struct Contraption {
    config: SceneConfig,
    ctx: SimulationContext,
    lights: LightRig,
    nodes: Option<ContraptionNodes>,
    running: bool,
}

fn vec3(v: [f32; 3]) -> Vector3<f32> {
    Vector3::new(v[0], v[1], v[2])
}

fn material(color: u32, texture: &Option<String>) -> Material {
    let material = Material::from_hex(color);
    match texture {
        Some(texture) => material.with_texture(texture.clone()),
        None => material,
    }
}

fn light_descriptor(light: &LightConfig) -> LightDescriptor {
    let color = hex_to_rgb(light.color);
    let mut descriptor = match light.kind {
        LightKind::Point => LightDescriptor::point(vec3(light.position), color, light.intensity),
        LightKind::Spot => LightDescriptor::spot(
            vec3(light.position),
            vec3(light.direction),
            color,
            light.half_angle,
            light.intensity,
        ),
    };
    descriptor.enabled = light.enabled;
    descriptor
}

impl Contraption {
    /// Validates `config` and prepares the light rig; nodes are built on initialize
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let descriptors: Vec<LightDescriptor> =
            config.lights.lights.iter().map(light_descriptor).collect();
        let descriptors: [LightDescriptor; LIGHT_COUNT] = descriptors
            .try_into()
            .map_err(|_| ConfigError::Invalid(format!("expected {} lights", LIGHT_COUNT)))?;

        let mut lights = LightRig::new(descriptors);
        lights
            .set_tracking(config.lights.tracking_index, vec3(config.lights.tracking_offset))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(Self {
            config,
            ctx: SimulationContext::new(),
            lights,
            nodes: None,
            running: false,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Node ids, `None` until the contraption has been built into a scene
    pub fn nodes(&self) -> Option<&ContraptionNodes> {
        self.nodes.as_ref()
    }

    pub fn light_rig(&self) -> &LightRig {
        &self.lights
    }

    /// Points the tracking spot at the focused node and moves the markers along
    fn follow_focus(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        if let Some(focus) = self.ctx.focus().and_then(|id| scene.world_position(id)) {
            self.lights.track(focus);
        }
        self.lights.sync_markers(scene)
    }

    fn build(&self, scene: &mut Scene) -> Result<ContraptionNodes, SceneError> {
        let config = &self.config;

        let ramp_mesh = scene.add_mesh(generate_box(config.ramp.size[0], config.ramp.size[1], config.ramp.size[2]));
        let [rx, ry, rz] = config.ramp.rotation;
        let ramp = scene.add_root_child(
            SceneNode::new("ramp")
                .with_transform(Transform::from_position(vec3(config.ramp.position)).with_euler(rx, ry, rz))
                .with_mesh(ramp_mesh)
                .with_material(material(config.ramp.color, &config.ramp.texture)),
        );

        let wall = &config.back_wall;
        let wall_mesh = scene.add_mesh(generate_box(wall.size[0], wall.size[1], wall.size[2]));
        let back_wall = scene.add_root_child(
            SceneNode::new("back_wall")
                .with_position(vec3(wall.position))
                .with_mesh(wall_mesh)
                .with_material(material(wall.color, &wall.texture)),
        );

        let angled = &config.angled_wall;
        let redirect = AngledWall::from_redirect(
            angled.boundary_x,
            vec3(angled.incoming_velocity),
            vec3(angled.outgoing_direction),
        );
        let angled_mesh = scene.add_mesh(generate_box(angled.size[0], angled.size[1], angled.size[2]));
        // The box faces +Z; turn that face onto the bounce normal
        let facing = Quaternion::from_arc(Vector3::unit_z(), redirect.normal, None);
        let angled_wall = scene.add_root_child(
            SceneNode::new("angled_wall")
                .with_transform(Transform::from_position(vec3(angled.position)).with_rotation(facing))
                .with_mesh(angled_mesh)
                .with_material(material(angled.color, &angled.texture)),
        );

        let ground_cfg = &config.ground;
        let ground_mesh = scene.add_mesh(generate_box(ground_cfg.size[0], ground_cfg.size[1], ground_cfg.size[2]));
        let ground = scene.add_root_child(
            SceneNode::new("ground")
                .with_position(vec3(ground_cfg.position))
                .with_mesh(ground_mesh)
                .with_material(material(ground_cfg.color, &ground_cfg.texture)),
        );

        let ball_cfg = &config.rolling_ball;
        let ball_mesh = scene.add_mesh(generate_sphere(ball_cfg.radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS));
        let rolling_ball = scene.add_root_child(
            SceneNode::new("ball_1")
                .with_position(vec3(ball_cfg.position))
                .with_mesh(ball_mesh)
                .with_material(material(ball_cfg.color, &ball_cfg.texture))
                .with_state(MotionState::Ball(BallPhase::Waiting))
                .with_data(
                    NodeData::new()
                        .with_scalar(keys::RADIUS, ball_cfg.radius)
                        .with_scalar(keys::MASS, ball_cfg.mass),
                ),
        );

        let target_cfg = &config.target_ball;
        let target_mesh = scene.add_mesh(generate_sphere(target_cfg.radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS));
        let target_ball = scene.add_root_child(
            SceneNode::new("ball_2")
                .with_position(vec3(target_cfg.position))
                .with_mesh(target_mesh)
                .with_material(material(target_cfg.color, &target_cfg.texture))
                .with_state(MotionState::Ball(BallPhase::OnGround))
                .with_data(
                    NodeData::new()
                        .with_scalar(keys::RADIUS, target_cfg.radius)
                        .with_scalar(keys::MASS, target_cfg.mass),
                ),
        );

        // Disc -> pole -> arm -> pivot -> swinging bar
        let spin = &config.spinner;
        let disc_mesh = scene.add_mesh(generate_cylinder(
            spin.disc_radius,
            spin.disc_radius,
            spin.disc_thickness,
            CYLINDER_SEGMENTS * 2,
        ));
        let disc = scene.add_root_child(
            SceneNode::new("disc")
                .with_transform(
                    Transform::from_position(vec3(spin.disc_position)).with_uniform_scale(spin.disc_scale),
                )
                .with_mesh(disc_mesh)
                .with_material(Material::from_hex(spin.disc_color))
                .with_data(NodeData::new().with_scalar(keys::ANGULAR_SPEED, spin.disc_speed)),
        );

        let pole_mesh = scene.add_mesh(generate_cylinder(
            spin.pole_radius,
            spin.pole_radius,
            spin.pole_height,
            CYLINDER_SEGMENTS / 2,
        ));
        let pole = scene.add(
            disc,
            SceneNode::new("pole")
                .with_position(vec3(spin.pole_offset))
                .with_mesh(pole_mesh)
                .with_material(Material::from_hex(spin.frame_color)),
        )?;

        let arm_mesh = scene.add_mesh(generate_cylinder(
            spin.arm_radius,
            spin.arm_radius,
            spin.arm_length,
            CYLINDER_SEGMENTS / 2,
        ));
        let arm = scene.add(
            pole,
            SceneNode::new("arm")
                .with_transform(
                    Transform::from_position(vec3(spin.arm_offset))
                        .with_euler(0.0, 0.0, std::f32::consts::FRAC_PI_2),
                )
                .with_mesh(arm_mesh)
                .with_material(Material::from_hex(spin.frame_color)),
        )?;

        let pivot = scene.add(
            arm,
            SceneNode::new("swing_pivot")
                .with_position(vec3(spin.pivot_offset))
                .with_data(NodeData::new().with_scalar(keys::ANGULAR_SPEED, spin.pivot_speed)),
        )?;

        let bar_mesh = scene.add_mesh(generate_cylinder(
            spin.bar_radius,
            spin.bar_radius,
            spin.bar_length,
            CYLINDER_SEGMENTS / 2,
        ));
        let bar = scene.add(
            pivot,
            SceneNode::new("swing_bar")
                .with_transform(
                    Transform::from_position(vec3(spin.bar_offset))
                        .with_euler(0.0, 0.0, std::f32::consts::FRAC_PI_2),
                )
                .with_mesh(bar_mesh)
                .with_material(Material::from_hex(spin.bar_color))
                .with_data(
                    NodeData::new()
                        .with_scalar(keys::RADIUS, spin.bar_radius)
                        .with_scalar(keys::LENGTH, spin.bar_length)
                        .with_scalar(keys::RESTITUTION, spin.bar_restitution),
                ),
        )?;

        // Domino pivots about its base; the slab stands on top of it
        let domino_cfg = &config.domino;
        let domino = scene.add_root_child(
            SceneNode::new("domino")
                .with_position(vec3(domino_cfg.position))
                .with_state(MotionState::Domino(DominoPhase::Standing))
                .with_data(
                    NodeData::new()
                        .with_scalar(keys::INITIAL_PUSH, domino_cfg.initial_push)
                        .with_scalar(keys::ANGULAR_ACCELERATION, domino_cfg.angular_acceleration),
                ),
        );
        let slab_mesh = scene.add_mesh(generate_box(domino_cfg.size[0], domino_cfg.size[1], domino_cfg.size[2]));
        let domino_mesh = scene.add(
            domino,
            SceneNode::new("domino_slab")
                .with_position(Vector3::new(0.0, domino_cfg.size[1] * 0.5, 0.0))
                .with_mesh(slab_mesh)
                .with_material(Material::from_hex(domino_cfg.color)),
        )?;

        let marker_mesh = scene.add_mesh(generate_sphere(
            config.lights.marker_radius,
            SPHERE_SEGMENTS / 2,
            SPHERE_SEGMENTS / 2,
        ));
        let mut markers = [NodeId(0); LIGHT_COUNT];
        for (index, light) in self.lights.lights().iter().enumerate() {
            markers[index] = scene.add_root_child(
                SceneNode::new(format!("light_marker_{}", index))
                    .with_position(light.position)
                    .with_mesh(marker_mesh)
                    .with_material(Material::new(light.color)),
            );
        }

        let placeholder = scene.add_mesh(generate_box(
            DECORATION_PLACEHOLDER_SIZE,
            DECORATION_PLACEHOLDER_SIZE,
            DECORATION_PLACEHOLDER_SIZE,
        ));
        let decorations = config
            .decorations
            .iter()
            .map(|decoration| {
                let [x, y, z] = decoration.rotation;
                scene.add_root_child(
                    SceneNode::new(decoration.name.clone())
                        .with_transform(
                            Transform::from_position(vec3(decoration.position))
                                .with_euler(x, y, z)
                                .with_uniform_scale(decoration.scale),
                        )
                        .with_mesh(placeholder)
                        .with_material(material(decoration.color, &decoration.texture))
                        .with_asset(decoration.model.clone()),
                )
            })
            .collect();

        Ok(ContraptionNodes {
            ramp,
            back_wall,
            angled_wall,
            ground,
            rolling_ball,
            target_ball,
            disc,
            pole,
            arm,
            pivot,
            bar,
            domino,
            domino_mesh,
            markers,
            decorations,
        })
    }

    /// Attaches every behavior, now that all collaborator ids exist
    fn wire(&self, scene: &mut Scene, nodes: &ContraptionNodes) -> Result<(), SceneError> {
        let config = &self.config;

        for spinner in [nodes.disc, nodes.pivot] {
            scene
                .node_mut(spinner)
                .ok_or(SceneError::UnknownNode(spinner))?
                .set_behavior(Spinner::new());
        }

        let obstacles = BallObstacles {
            ground: GroundPlane {
                height: config.ground.height,
            },
            wall: StaticWall::new(
                vec3(config.back_wall.normal),
                config.back_wall.offset,
                config.back_wall.restitution,
            ),
            angled_wall: AngledWall::from_redirect(
                config.angled_wall.boundary_x,
                vec3(config.angled_wall.incoming_velocity),
                vec3(config.angled_wall.outgoing_direction),
            ),
        };
        let links = RollingBallLinks {
            ramp: nodes.ramp,
            bar: nodes.bar,
            disc: nodes.disc,
            pivot: nodes.pivot,
            target: nodes.target_ball,
        };

        let ball_node = scene
            .node(nodes.rolling_ball)
            .ok_or(SceneError::UnknownNode(nodes.rolling_ball))?;
        let rolling = RollingBall::new(
            ball_node,
            links,
            obstacles,
            vec3(config.gravity),
            config.rolling_ball.start_delay,
            config.rolling_ball.ramp_end_x,
        );
        scene
            .node_mut(nodes.rolling_ball)
            .ok_or(SceneError::UnknownNode(nodes.rolling_ball))?
            .set_behavior(rolling);

        let target_node = scene
            .node(nodes.target_ball)
            .ok_or(SceneError::UnknownNode(nodes.target_ball))?;
        let coasting = CoastingBall::new(target_node, nodes.domino, nodes.domino_mesh);
        scene
            .node_mut(nodes.target_ball)
            .ok_or(SceneError::UnknownNode(nodes.target_ball))?
            .set_behavior(coasting);

        scene
            .node_mut(nodes.domino)
            .ok_or(SceneError::UnknownNode(nodes.domino))?
            .set_behavior(Domino::new(
                nodes.domino_mesh,
                hex_to_rgb(config.domino.color),
                hex_to_rgb(config.domino.fallen_color),
            ));

        Ok(())
    }
}

impl Simulation for Contraption {
    fn initialize(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        let nodes = match self.nodes.take() {
            Some(nodes) => {
                // Built on an earlier attach; rewind the run and rewire in place
                scene.reset(&mut self.ctx);
                log::debug!("Contraption already assembled; reusing {} nodes", scene.len());
                nodes
            }
            None => {
                let nodes = self.build(scene)?;
                for (index, marker) in nodes.markers.iter().enumerate() {
                    self.lights.attach_marker(index, *marker)?;
                }
                nodes
            }
        };
        self.wire(scene, &nodes)?;

        self.ctx = SimulationContext::with_focus(nodes.rolling_ball);
        scene.propagate_transforms();
        self.nodes = Some(nodes);
        self.follow_focus(scene)?;
        self.running = true;

        let stats = scene.statistics();
        log::info!(
            "Contraption assembled: {} nodes, {} meshes, {} behaviors, {} triangles",
            stats.node_count,
            stats.mesh_count,
            stats.behavior_count,
            stats.total_triangles
        );
        Ok(())
    }

    fn update(&mut self, delta_time: f32, scene: &mut Scene) {
        if !self.running || self.nodes.is_none() {
            return;
        }
        scene.update(&mut self.ctx, delta_time);
        self.ctx.advance(delta_time);
        if let Err(err) = self.follow_focus(scene) {
            log::warn!("Light markers not synced: {}", err);
        }
    }

    fn name(&self) -> &str {
        "Contraption"
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    fn reset(&mut self, scene: &mut Scene) {
        if self.nodes.is_none() {
            return;
        }
        scene.reset(&mut self.ctx);
        if let Err(err) = self.follow_focus(scene) {
            log::warn!("Light markers not synced: {}", err);
        }
    }

    fn context(&self) -> Option<&SimulationContext> {
        Some(&self.ctx)
    }

    fn lights(&self) -> Option<&LightRig> {
        Some(&self.lights)
    }

    fn lights_mut(&mut self) -> Option<&mut LightRig> {
        Some(&mut self.lights)
    }

    /// Rewinds the run and unhooks every behavior. The arena keeps the nodes, so they
    /// stay behind as static geometry until this contraption is initialized again.
    fn cleanup(&mut self, scene: &mut Scene) {
        self.running = false;
        let Some(nodes) = &self.nodes else {
            return;
        };
        scene.reset(&mut self.ctx);
        for id in nodes.driven() {
            if let Some(node) = scene.node_mut(id) {
                node.clear_behavior();
            }
        }
        log::debug!("Contraption detached; {} behaviors removed", nodes.driven().len());
    }
}
