//! Unit tests for shadow_pass.rs

use std::sync::Arc;
use glam::{Mat4, Vec3};
use winit::dpi::PhysicalSize;
use crate::error::Error;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::{AddressMode, FilterMode, GraphicsDevice, TextureFormat};
use crate::renderer::{flatten, ShadowPass, ShadowTarget};
use crate::resource::Mesh;
use crate::scene::{RenderingComponent, Scene};

fn scene_with(meshes: Vec<Mesh>) -> Scene {
    let mut scene = Scene::new();
    let root = scene.root();
    for mesh in meshes {
        let key = scene.spawn(root, mesh.name().to_string()).unwrap();
        scene.node_mut(key).unwrap().set_rendering(RenderingComponent::new(Arc::new(mesh)));
    }
    scene
}

// ============================================================================
// SHADOW TARGET
// ============================================================================

#[test]
fn test_shadow_target_allocates_depth_map() {
    let mut device = MockGraphicsDevice::new();
    let target = ShadowTarget::new(&mut device, 512, 256).unwrap();

    let info = target.depth_texture().info();
    assert_eq!((info.width, info.height), (512, 256));
    assert_eq!(info.format, TextureFormat::D32_FLOAT);
    assert_eq!(info.address_mode, AddressMode::ClampToEdge);
    assert_eq!(info.filter, FilterMode::Linear);
    assert_eq!(info.mip_levels, 1);
    assert_eq!(target.size(), (512, 256));
    assert_eq!(
        device.commands(),
        vec!["create_depth_texture(512x256)", "create_depth_render_target", "create_shadow_shader"]
    );
}

#[test]
fn test_shadow_target_rejects_zero_size() {
    let mut device = MockGraphicsDevice::new();
    let result = ShadowTarget::new(&mut device, 0, 1024);
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
    assert!(device.commands().is_empty());
}

// ============================================================================
// RENDER DEPTH
// ============================================================================

#[test]
fn test_render_depth_command_order() {
    let mut device = MockGraphicsDevice::new();
    let target = ShadowTarget::new(&mut device, 64, 64).unwrap();
    device.clear_log();

    let scene = scene_with(vec![Mesh::cube(1.0), Mesh::plane(4.0)]);
    let list = flatten(&scene, scene.root(), &Mat4::IDENTITY);
    let light_space = Mat4::from_scale(Vec3::splat(0.5));

    let draws = ShadowPass::new(&target)
        .render_depth(&mut device, PhysicalSize::new(800, 600), list.entries(), &light_space)
        .unwrap();

    assert_eq!(draws, 2);
    assert_eq!(
        device.commands(),
        vec![
            "bind_render_target(shadow)",
            "set_viewport(0, 0, 64, 64)",
            "set_depth_write(true)",
            "set_color_write(none)",
            "clear(depth)",
            "bind_program(shadow)",
            "shadow.set_world_transform(cube)",
            "shadow.set_light_space_transform",
            "draw_mesh(cube)",
            "bind_program(none)",
            "bind_program(shadow)",
            "shadow.set_world_transform(plane)",
            "shadow.set_light_space_transform",
            "draw_mesh(plane)",
            "bind_program(none)",
            "set_viewport(0, 0, 800, 600)",
            "bind_render_target(window)",
        ]
    );

    let uploaded = device.shadow_shaders[0].last_light_space.lock().unwrap().unwrap();
    assert_eq!(uploaded, light_space);
}

#[test]
fn test_render_depth_never_touches_blend_state() {
    let mut device = MockGraphicsDevice::new();
    let target = ShadowTarget::new(&mut device, 16, 16).unwrap();
    let scene = scene_with(vec![Mesh::cube(1.0)]);
    let list = flatten(&scene, scene.root(), &Mat4::IDENTITY);

    ShadowPass::new(&target)
        .render_depth(&mut device, PhysicalSize::new(32, 32), list.entries(), &Mat4::IDENTITY)
        .unwrap();

    assert!(device.commands().iter().all(|c| !c.starts_with("set_blend_state")));
}

#[test]
fn test_missing_positions_is_fatal_and_restores_state() {
    let mut device = MockGraphicsDevice::new();
    let target = ShadowTarget::new(&mut device, 16, 16).unwrap();
    device.clear_log();

    let scene = scene_with(vec![Mesh::new("ghost")]);
    let list = flatten(&scene, scene.root(), &Mat4::IDENTITY);

    let err = ShadowPass::new(&target)
        .render_depth(&mut device, PhysicalSize::new(320, 240), list.entries(), &Mat4::IDENTITY)
        .unwrap_err();

    assert_eq!(
        err,
        Error::MissingVertexAttribute { mesh: "ghost".to_string(), attribute: "position" }
    );
    let commands = device.commands();
    assert!(!commands.iter().any(|c| c.starts_with("draw_mesh")));
    assert_eq!(
        &commands[commands.len() - 3..],
        &["bind_program(none)", "set_viewport(0, 0, 320, 240)", "bind_render_target(window)"]
    );
}

#[test]
fn test_device_error_restores_state() {
    let mut device = MockGraphicsDevice::new();
    let target = ShadowTarget::new(&mut device, 16, 16).unwrap();
    device.clear_log();
    device.fail_on("clear");

    let result = ShadowPass::new(&target).render_depth(
        &mut device as &mut dyn GraphicsDevice,
        PhysicalSize::new(10, 10),
        &[],
        &Mat4::IDENTITY,
    );

    assert!(matches!(result, Err(Error::BackendError(_))));
    assert_eq!(
        device.commands(),
        vec![
            "bind_render_target(shadow)",
            "set_viewport(0, 0, 16, 16)",
            "set_depth_write(true)",
            "set_color_write(none)",
            "set_viewport(0, 0, 10, 10)",
            "bind_render_target(window)",
        ]
    );
}
