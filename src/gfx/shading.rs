//! Per-tick handoff of transforms, material colors and lights to the shading stage
//!
//! Everything here is plain `#[repr(C)]` data laid out for a uniform buffer; uploading
//! it is the renderer's job.

use cgmath::{InnerSpace, Matrix4, Vector3};

use crate::gfx::lighting::{LightDescriptor, LightRig, LIGHT_COUNT};
use crate::gfx::scene::{NodeId, Scene};

/// Per-object uniform: model matrix plus Phong material
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// RGB color; w is 1 when the material references a texture
    pub color: [f32; 4],
    /// Ambient, diffuse, specular coefficients and shininess
    pub phong: [f32; 4],
}

/// Light uniform in view space.
///
/// Vectors are padded to 16 bytes to match std140 layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub color: [f32; 4],
    /// enabled (0/1), spot (0/1), cutoff cosine, intensity
    pub params: [f32; 4],
}

impl LightUniform {
    /// Moves a light into view space. Positions get the full view transform, directions
    /// only its rotation.
    pub fn from_light(light: &LightDescriptor, view: &Matrix4<f32>) -> Self {
        let position = view * light.position.extend(1.0);
        let direction = view * light.direction.extend(0.0);
        let direction = direction.truncate();
        let direction = if direction.magnitude2() > crate::physics::EPSILON {
            direction.normalize()
        } else {
            Vector3::new(0.0, 0.0, 0.0)
        };

        Self {
            position: position.into(),
            direction: direction.extend(0.0).into(),
            color: [light.color[0], light.color[1], light.color[2], 1.0],
            params: [
                if light.enabled { 1.0 } else { 0.0 },
                if light.spot { 1.0 } else { 0.0 },
                light.cutoff,
                light.intensity,
            ],
        }
    }
}

/// Everything the shading stage needs for one frame
#[derive(Debug, Clone)]
pub struct ShadingFrame {
    /// One entry per node with both a mesh and a material, in traversal order
    pub objects: Vec<ObjectUniform>,
    /// Node each entry of `objects` was built from
    pub nodes: Vec<NodeId>,
    pub lights: [LightUniform; LIGHT_COUNT],
}

impl ShadingFrame {
    /// Walks the tree depth-first and copies world matrices and materials.
    ///
    /// World matrices are read from the cache, so this belongs after the tick's update.
    pub fn collect(scene: &Scene, rig: Option<&LightRig>, view: &Matrix4<f32>) -> Self {
        let mut objects = Vec::new();
        let mut nodes = Vec::new();

        let mut stack = vec![scene.root()];
        while let Some(id) = stack.pop() {
            let Some(node) = scene.node(id) else {
                continue;
            };
            if let (Some(_), Some(material)) = (node.mesh, node.material.as_ref()) {
                objects.push(ObjectUniform {
                    model: convert_matrix4_to_array(node.world()),
                    color: [
                        material.color[0],
                        material.color[1],
                        material.color[2],
                        if material.texture.is_some() { 1.0 } else { 0.0 },
                    ],
                    phong: [
                        material.ambient,
                        material.diffuse,
                        material.specular,
                        material.shininess,
                    ],
                });
                nodes.push(id);
            }
            stack.extend(node.children().iter().rev());
        }

        let lights = match rig {
            Some(rig) => rig
                .lights()
                .map(|light| LightUniform::from_light(&light, view)),
            None => [<LightUniform as bytemuck::Zeroable>::zeroed(); LIGHT_COUNT],
        };

        Self {
            objects,
            nodes,
            lights,
        }
    }

    /// Raw bytes of the light array, ready for a uniform buffer
    pub fn light_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lights)
    }

    /// Raw bytes of the object array, ready for a storage buffer
    pub fn object_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.objects)
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_sphere;
    use crate::gfx::material::Material;
    use crate::gfx::scene::SceneNode;
    use cgmath::{Point3, SquareMatrix};

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 96);
        assert_eq!(std::mem::size_of::<LightUniform>(), 64);
    }

    #[test]
    fn test_light_moves_to_view_space() {
        let light = LightDescriptor::spot(
            Vector3::new(0.0, 10.0, 0.0),
            -Vector3::unit_y(),
            [1.0, 0.0, 0.0],
            0.3,
            2.0,
        );
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let uniform = LightUniform::from_light(&light, &view);
        // Camera 10 units back on +Z: the light is straight up and 10 units ahead
        assert!((uniform.position[1] - 10.0).abs() < 1e-5);
        assert!((uniform.position[2] + 10.0).abs() < 1e-5);
        assert_eq!(uniform.position[3], 1.0);
        assert!((uniform.direction[1] + 1.0).abs() < 1e-5);
        assert_eq!(uniform.params, [1.0, 1.0, 0.3_f32.cos(), 2.0]);
    }

    #[test]
    fn test_collect_skips_nodes_without_mesh() {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(generate_sphere(1.0, 8, 8));
        let pivot = scene.add_root_child(SceneNode::new("pivot").with_position(Vector3::new(1.0, 2.0, 3.0)));
        let ball = scene
            .add(pivot, SceneNode::new("ball").with_mesh(mesh).with_material(Material::from_hex(0xFF0000)))
            .unwrap();
        scene.propagate_transforms();

        let frame = ShadingFrame::collect(&scene, None, &Matrix4::identity());
        assert_eq!(frame.nodes, vec![ball]);
        assert_eq!(frame.objects[0].model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(frame.objects[0].color, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(frame.lights[0].params, [0.0; 4]);
        assert_eq!(frame.light_bytes().len(), 3 * 64);
    }
}
