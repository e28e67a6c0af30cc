/// SceneNode - one node of the scene hierarchy.
///
/// Nodes are stored in the owning `Scene` and addressed by `SceneNodeKey`.
/// Hierarchy links (parent, children) are maintained by the scene; users
/// edit names, transforms, the active flag and components.

use slotmap::new_key_type;
use super::components::{CameraComponent, LightComponent, RenderingComponent, ShadingComponent};
use super::transform::Transform;

new_key_type! {
    /// Stable key of a node inside its `Scene`
    pub struct SceneNodeKey;
}

#[derive(Debug)]
pub struct SceneNode {
    name: String,
    transform: Transform,
    active: bool,
    parent: Option<SceneNodeKey>,
    children: Vec<SceneNodeKey>,
    rendering: Option<RenderingComponent>,
    shading: Option<ShadingComponent>,
    light: Option<LightComponent>,
    camera: Option<CameraComponent>,
}

impl SceneNode {
    pub(crate) fn new(name: String, parent: Option<SceneNodeKey>) -> Self {
        Self {
            name,
            transform: Transform::default(),
            active: true,
            parent,
            children: Vec::new(),
            rendering: None,
            shading: None,
            light: None,
            camera: None,
        }
    }

    pub(crate) fn push_child(&mut self, child: SceneNodeKey) {
        self.children.push(child);
    }

    // ===== GETTERS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Inactive nodes are not drawn; their children still are
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn parent(&self) -> Option<SceneNodeKey> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[SceneNodeKey] {
        &self.children
    }

    pub fn rendering(&self) -> Option<&RenderingComponent> {
        self.rendering.as_ref()
    }

    pub fn shading(&self) -> Option<&ShadingComponent> {
        self.shading.as_ref()
    }

    pub fn light(&self) -> Option<&LightComponent> {
        self.light.as_ref()
    }

    pub fn camera(&self) -> Option<&CameraComponent> {
        self.camera.as_ref()
    }

    // ===== SETTERS =====

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_rendering(&mut self, component: RenderingComponent) {
        self.rendering = Some(component);
    }

    pub fn set_shading(&mut self, component: ShadingComponent) {
        self.shading = Some(component);
    }

    /// Detach the shading program, returning it
    pub fn take_shading(&mut self) -> Option<ShadingComponent> {
        self.shading.take()
    }

    pub fn set_light(&mut self, component: LightComponent) {
        self.light = Some(component);
    }

    pub fn light_mut(&mut self) -> Option<&mut LightComponent> {
        self.light.as_mut()
    }

    pub fn set_camera(&mut self, component: CameraComponent) {
        self.camera = Some(component);
    }
}
