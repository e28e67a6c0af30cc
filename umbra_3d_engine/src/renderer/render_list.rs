/// Scene traversal - flattens the node hierarchy into drawable entries.
///
/// Each node's world transform is computed exactly once, as the parent's
/// world transform times the node's local-to-parent matrix. The list only
/// borrows the scene and is rebuilt every frame.

use std::sync::Arc;
use glam::Mat4;
use crate::resource::Mesh;
use crate::scene::{RenderingComponent, Scene, SceneNodeKey};

/// One drawable node with its accumulated world transform
#[derive(Debug, Clone, Copy)]
pub struct RenderEntry<'a> {
    /// Node carrying the renderable
    pub node: SceneNodeKey,
    pub rendering: &'a RenderingComponent,
    pub world_transform: Mat4,
}

impl<'a> RenderEntry<'a> {
    pub fn mesh(&self) -> &'a Arc<Mesh> {
        self.rendering.mesh()
    }
}

/// Drawable entries in depth-first, pre-order, child-insertion order
#[derive(Debug, Default)]
pub struct RenderList<'a> {
    entries: Vec<RenderEntry<'a>>,
}

impl<'a> RenderList<'a> {
    pub fn entries(&self) -> &[RenderEntry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderEntry<'a>> {
        self.entries.iter()
    }
}

/// Collect every active node with a renderable under `root` (inclusive)
///
/// Children of inactive nodes are still visited. An unknown `root` yields an
/// empty list.
pub fn flatten<'a>(scene: &'a Scene, root: SceneNodeKey, initial_transform: &Mat4) -> RenderList<'a> {
    let mut list = RenderList::default();
    visit(scene, root, initial_transform, &mut list.entries);
    list
}

fn visit<'a>(scene: &'a Scene, key: SceneNodeKey, parent_world: &Mat4, out: &mut Vec<RenderEntry<'a>>) {
    let Some(node) = scene.node(key) else {
        return;
    };

    let world = *parent_world * node.transform().local_to_parent_matrix();
    if node.is_active() {
        if let Some(rendering) = node.rendering() {
            out.push(RenderEntry {
                node: key,
                rendering,
                world_transform: world,
            });
        }
    }

    for &child in node.children() {
        visit(scene, child, &world, out);
    }
}

#[cfg(test)]
#[path = "render_list_tests.rs"]
mod tests;
