use cgmath::{Matrix4, Quaternion, SquareMatrix, Vector3, Vector4};

use super::node::{MeshId, NodeId, SceneNode};
use crate::error::SceneError;
use crate::gfx::geometry::GeometryData;
use crate::physics::aabb::Aabb;
use crate::simulation::behaviors::Updatable;
use crate::simulation::context::SimulationContext;

/// Arena-backed scene graph plus the mesh library its nodes point into.
///
/// Node 0 is an implicit root with an identity transform. Nodes are only ever added,
/// so every [`NodeId`] handed out stays valid for the lifetime of the scene.
pub struct Scene {
    nodes: Vec<SceneNode>,
    meshes: Vec<GeometryData>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new("root")],
            meshes: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Adds `node` as the last child of `parent`
    ///
    /// # Arguments
    /// * `parent` - Existing node that takes ownership of the new node
    /// * `node` - Node to insert; its name is made unique within the scene
    ///
    /// # Returns
    /// Id of the inserted node, or `UnknownNode` if `parent` is not in this scene
    pub fn add(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId, SceneError> {
        if parent.0 >= self.nodes.len() {
            return Err(SceneError::UnknownNode(parent));
        }

        let id = NodeId(self.nodes.len());
        node.name = self.ensure_unique_name(&node.name);
        node.parent = Some(parent);
        node.children.clear();
        node.world = self.nodes[parent.0].world * node.transform.matrix();

        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Adds `node` directly under the root
    pub fn add_root_child(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = node;
        node.name = self.ensure_unique_name(&node.name);
        node.parent = Some(self.root());
        node.children.clear();
        node.world = node.transform.matrix();

        self.nodes.push(node);
        self.nodes[0].children.push(id);
        id
    }

    /// Registers mesh data and computes its bounding box if it has none yet
    pub fn add_mesh(&mut self, mut geometry: GeometryData) -> MeshId {
        if geometry.bounds().is_none() {
            geometry.compute_bounding_box();
        }
        self.meshes.push(geometry);
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&GeometryData> {
        self.meshes.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root is always present
        self.nodes.len() <= 1
    }

    /// Iterates nodes in insertion order, root first
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Cached world matrix, valid once the node was visited this tick
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        self.nodes.get(id.0).map(|node| node.world)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vector3<f32>> {
        let world = self.world_matrix(id)?;
        Some(Vector3::new(world.w.x, world.w.y, world.w.z))
    }

    /// Transforms a point from the node's local frame to world space
    pub fn point_to_world(&self, id: NodeId, point: Vector3<f32>) -> Option<Vector3<f32>> {
        let h = self.world_matrix(id)? * Vector4::new(point.x, point.y, point.z, 1.0);
        Some(Vector3::new(h.x, h.y, h.z))
    }

    /// Transforms a direction from the node's local frame to world space (no translation)
    pub fn direction_to_world(&self, id: NodeId, direction: Vector3<f32>) -> Option<Vector3<f32>> {
        let h = self.world_matrix(id)? * Vector4::new(direction.x, direction.y, direction.z, 0.0);
        Some(Vector3::new(h.x, h.y, h.z))
    }

    /// Composed rotation of the node and all its ancestors
    pub fn world_rotation(&self, id: NodeId) -> Option<Quaternion<f32>> {
        let mut node = self.nodes.get(id.0)?;
        let mut rotation = node.transform.rotation;
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.0];
            rotation = node.transform.rotation * rotation;
        }
        Some(rotation)
    }

    /// Parent world matrix times the node's current local transform
    ///
    /// Unlike [`world_matrix`](Scene::world_matrix) this sees local changes made earlier in
    /// the same tick, as long as the parent has already been visited.
    pub fn local_to_world(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let node = self.nodes.get(id.0)?;
        let parent_world = node
            .parent
            .map(|parent| self.nodes[parent.0].world)
            .unwrap_or_else(Matrix4::identity);
        Some(parent_world * node.transform.matrix())
    }

    /// Mesh bounds of the node moved into world space
    pub fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        let node = self.nodes.get(id.0)?;
        let bounds = self.meshes.get(node.mesh?.0)?.bounds()?;
        Some(bounds.transform(&node.world))
    }

    /// Advances every behavior by one step and recomposes world matrices.
    ///
    /// Depth-first from the root: a node's behavior runs, then its world matrix is
    /// composed from the parent's, then its children follow in insertion order.
    pub fn update(&mut self, ctx: &mut SimulationContext, delta_time: f32) {
        self.update_node(NodeId(0), Matrix4::identity(), ctx, delta_time);
    }

    fn update_node(
        &mut self,
        id: NodeId,
        parent_world: Matrix4<f32>,
        ctx: &mut SimulationContext,
        delta_time: f32,
    ) {
        if let Some(mut behavior) = self.nodes[id.0].behavior.take() {
            behavior.update(id, self, ctx, delta_time);
            self.nodes[id.0].behavior = Some(behavior);
        }

        let world = parent_world * self.nodes[id.0].transform.matrix();
        self.nodes[id.0].world = world;

        for index in 0..self.nodes[id.0].children.len() {
            let child = self.nodes[id.0].children[index];
            self.update_node(child, world, ctx, delta_time);
        }
    }

    /// Recomposes every world matrix without running behaviors
    pub fn propagate_transforms(&mut self) {
        let mut stack = vec![(NodeId(0), Matrix4::identity())];
        while let Some((id, parent_world)) = stack.pop() {
            let world = parent_world * self.nodes[id.0].transform.matrix();
            self.nodes[id.0].world = world;
            stack.extend(self.nodes[id.0].children.iter().rev().map(|&child| (child, world)));
        }
    }

    /// Recomposes the world matrices of one node and its subtree from the parent's cache
    pub fn refresh_world(&mut self, id: NodeId) -> Result<(), SceneError> {
        let world = self.local_to_world(id).ok_or(SceneError::UnknownNode(id))?;
        let mut stack = vec![(id, world)];
        while let Some((current, world)) = stack.pop() {
            self.nodes[current.0].world = world;
            for &child in &self.nodes[current.0].children {
                stack.push((child, world * self.nodes[child.0].transform.matrix()));
            }
        }
        Ok(())
    }

    /// Restores every behavior-driven node to its initial state and zeroes the clock
    pub fn reset(&mut self, ctx: &mut SimulationContext) {
        for index in 0..self.nodes.len() {
            let id = NodeId(index);
            if let Some(mut behavior) = self.nodes[index].behavior.take() {
                behavior.reset(id, self);
                self.nodes[index].behavior = Some(behavior);
            }
        }
        ctx.reset();
        self.propagate_transforms();
        log::info!("Scene reset ({} nodes)", self.nodes.len());
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        SceneStatistics {
            node_count: self.nodes.len(),
            mesh_count: self.meshes.len(),
            behavior_count: self.nodes.iter().filter(|node| node.behavior.is_some()).count(),
            total_triangles: self
                .meshes
                .iter()
                .map(|mesh| mesh.triangle_count() as u32)
                .sum(),
        }
    }

    fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.nodes.iter().any(|node| node.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub behavior_count: usize,
    pub total_triangles: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use crate::gfx::scene::node::Transform;
    use cgmath::{InnerSpace, Rad, Rotation3};

    #[test]
    fn test_add_links_parent_and_children_in_order() {
        let mut scene = Scene::new();
        let a = scene.add_root_child(SceneNode::new("a"));
        let b = scene.add(a, SceneNode::new("b")).unwrap();
        let c = scene.add(a, SceneNode::new("c")).unwrap();

        assert_eq!(scene.children(a), &[b, c]);
        assert_eq!(scene.parent(b), Some(a));
        assert_eq!(scene.parent(a), Some(scene.root()));
        assert_eq!(scene.find_by_name("c"), Some(c));
    }

    #[test]
    fn test_add_to_unknown_parent() {
        let mut scene = Scene::new();
        let bogus = NodeId(42);
        assert_eq!(
            scene.add(bogus, SceneNode::new("x")).unwrap_err(),
            SceneError::UnknownNode(bogus)
        );
    }

    #[test]
    fn test_duplicate_names_are_suffixed() {
        let mut scene = Scene::new();
        scene.add_root_child(SceneNode::new("apple"));
        let second = scene.add_root_child(SceneNode::new("apple"));
        assert_eq!(scene.node(second).unwrap().name, "apple (1)");
    }

    #[test]
    fn test_world_transform_composes_parent_first() {
        let mut scene = Scene::new();
        let parent = scene.add_root_child(
            SceneNode::new("parent").with_transform(
                Transform::from_position(Vector3::new(10.0, 0.0, 0.0))
                    .with_rotation(Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_2))),
            ),
        );
        let child = scene
            .add(parent, SceneNode::new("child").with_position(Vector3::new(1.0, 0.0, 0.0)))
            .unwrap();

        scene.propagate_transforms();
        let position = scene.world_position(child).unwrap();
        // +X rotated a quarter turn about Y lands on -Z
        assert!((position - Vector3::new(10.0, 0.0, -1.0)).magnitude() < 1e-5);

        let rotation = scene.world_rotation(child).unwrap();
        assert!((rotation * Vector3::unit_x() - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_world_bounds_follow_node() {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(generate_box(2.0, 2.0, 2.0));
        let node = scene.add_root_child(
            SceneNode::new("box")
                .with_mesh(mesh)
                .with_position(Vector3::new(0.0, 5.0, 0.0)),
        );
        let bounds = scene.world_bounds(node).unwrap();
        assert!((bounds.min.y - 4.0).abs() < 1e-6);
        assert!((bounds.max.y - 6.0).abs() < 1e-6);

        assert!(scene.world_bounds(scene.root()).is_none());
    }

    #[test]
    fn test_refresh_world_updates_subtree() {
        let mut scene = Scene::new();
        let parent = scene.add_root_child(SceneNode::new("parent"));
        let child = scene
            .add(parent, SceneNode::new("child").with_position(Vector3::new(0.0, 1.0, 0.0)))
            .unwrap();

        scene.node_mut(parent).unwrap().transform.position = Vector3::new(3.0, 0.0, 0.0);
        scene.refresh_world(parent).unwrap();
        assert_eq!(scene.world_position(child), Some(Vector3::new(3.0, 1.0, 0.0)));
    }

    #[test]
    fn test_statistics() {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(generate_box(1.0, 1.0, 1.0));
        scene.add_root_child(SceneNode::new("a").with_mesh(mesh));
        let stats = scene.statistics();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.mesh_count, 1);
        assert_eq!(stats.behavior_count, 0);
        assert_eq!(stats.total_triangles, 12);
    }
}
