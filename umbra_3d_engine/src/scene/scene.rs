/// Scene - a hierarchy of SceneNodes with one designated camera.
///
/// Uses a SlotMap for stable node keys. The root node is created with the
/// scene and cannot be removed.

use slotmap::SlotMap;
use glam::Mat4;
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::resource::LightSource;
use super::scene_node::{SceneNode, SceneNodeKey};

pub struct Scene {
    nodes: SlotMap<SceneNodeKey, SceneNode>,
    root: SceneNodeKey,
    active_camera: Option<SceneNodeKey>,
}

impl Scene {
    /// Create a scene containing only a root node named "root"
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("root".to_string(), None));
        Self {
            nodes,
            root,
            active_camera: None,
        }
    }

    pub fn root(&self) -> SceneNodeKey {
        self.root
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, key: SceneNodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: SceneNodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Add a new node as the last child of `parent`
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if `parent` is not a node of this scene.
    pub fn spawn(&mut self, parent: SceneNodeKey, name: impl Into<String>) -> Result<SceneNodeKey> {
        let name = name.into();
        if !self.nodes.contains_key(parent) {
            return Err(Error::InvalidResource(format!(
                "cannot spawn '{}': parent node does not exist",
                name
            )));
        }
        let key = self.nodes.insert(SceneNode::new(name, Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.push_child(key);
        }
        Ok(key)
    }

    // ===== CAMERA =====

    /// Designate the camera used for rendering
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the node does not exist or has no camera component.
    pub fn set_active_camera(&mut self, key: SceneNodeKey) -> Result<()> {
        match self.nodes.get(key) {
            Some(node) if node.camera().is_some() => {
                self.active_camera = Some(key);
                Ok(())
            }
            Some(node) => Err(Error::InvalidResource(format!(
                "node '{}' has no camera component",
                node.name()
            ))),
            None => Err(Error::InvalidResource("camera node does not exist".to_string())),
        }
    }

    pub fn active_camera_key(&self) -> Option<SceneNodeKey> {
        self.active_camera
    }

    /// View/projection of the active camera, placed by its node's world transform
    pub fn active_camera(&self) -> Option<Camera> {
        let key = self.active_camera?;
        let component = self.nodes.get(key)?.camera()?;
        let world = self.local_to_world(key)?;
        Some(Camera::from_world_transform(&world, *component.projection()))
    }

    // ===== TRANSFORMS =====

    /// Composition of every local-to-parent matrix from the root down to `key`
    pub fn local_to_world(&self, key: SceneNodeKey) -> Option<Mat4> {
        let mut node = self.nodes.get(key)?;
        let mut world = node.transform().local_to_parent_matrix();
        while let Some(parent) = node.parent() {
            node = self.nodes.get(parent)?;
            world = node.transform().local_to_parent_matrix() * world;
        }
        Some(world)
    }

    // ===== LIGHTS =====

    /// Every light in the hierarchy, pre-order from the root
    ///
    /// The active flag does not hide lights.
    pub fn light_sources(&self) -> Vec<LightSource> {
        let mut sources = Vec::new();
        self.collect_lights(self.root, &Mat4::IDENTITY, &mut sources);
        sources
    }

    fn collect_lights(&self, key: SceneNodeKey, parent_world: &Mat4, out: &mut Vec<LightSource>) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        let world = *parent_world * node.transform().local_to_parent_matrix();
        if let Some(light) = node.light() {
            out.push(LightSource::new(*light.light(), world));
        }
        for &child in node.children() {
            self.collect_lights(child, &world, out);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
