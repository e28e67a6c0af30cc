//! Scene graph module
//!
//! Provides the node hierarchy, local transforms and the components the
//! renderer consumes (renderables, shading programs, lights, cameras).

mod components;
mod scene;
mod scene_node;
mod transform;

pub use components::{CameraComponent, LightComponent, RenderingComponent, ShadingComponent};
pub use scene::Scene;
pub use scene_node::{SceneNode, SceneNodeKey};
pub use transform::Transform;
