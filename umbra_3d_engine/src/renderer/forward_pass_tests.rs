//! Unit tests for forward_pass.rs

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3};
use serial_test::serial;
use crate::camera::Camera;
use crate::graphics_device::mock_graphics_device::{CommandLog, MockGraphicsDevice, MockShader, MockTexture};
use crate::graphics_device::{DepthTextureDesc, Shader, Texture, TextureInfo};
use crate::log::{LogEntry, LogSeverity, Logger};
use crate::renderer::{flatten, resolve_shading, ForwardPass, ShadowMapping};
use crate::resource::{Light, LightSource, Mesh};
use crate::scene::{RenderingComponent, Scene, ShadingComponent};
use crate::umbra3d::Engine;

struct CapturingLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CapturingLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

/// Adds a node per (name, mesh, shaded?) under the root
fn build_scene(nodes: Vec<(&str, Mesh, Option<Arc<dyn Shader>>)>) -> Scene {
    let mut scene = Scene::new();
    let root = scene.root();
    for (name, mesh, shader) in nodes {
        let key = scene.spawn(root, name).unwrap();
        let node = scene.node_mut(key).unwrap();
        node.set_rendering(RenderingComponent::new(Arc::new(mesh)));
        if let Some(shader) = shader {
            node.set_shading(ShadingComponent::new(shader));
        }
    }
    scene
}

fn flat(log: &CommandLog) -> Arc<dyn Shader> {
    Arc::new(MockShader::new("flat", log.clone()))
}

// ============================================================================
// RESOLVE SHADING
// ============================================================================

#[test]
#[serial]
fn test_unshaded_entries_are_dropped_with_one_warning_each() {
    let device = MockGraphicsDevice::new();
    let log = device.log();
    let scene = build_scene(
        vec![
            ("lit_cube", Mesh::cube(1.0), Some(flat(&log))),
            ("bare_crate_fwd", Mesh::cube(1.0), None),
        ],
    );
    let list = flatten(&scene, scene.root(), &Mat4::IDENTITY);

    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CapturingLogger { entries: entries.clone() });
    let shaded = resolve_shading(&scene, &list);
    Engine::reset_logger();

    assert_eq!(shaded.len(), 1);
    assert_eq!(shaded[0].entry.mesh().name(), "cube");
    let warnings: Vec<LogEntry> = entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.severity == LogSeverity::Warn && e.message.contains("bare_crate_fwd"))
        .cloned()
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].source, "umbra3d::ForwardPass");
}

// ============================================================================
// DEPTH PRE-PASS
// ============================================================================

#[test]
fn test_depth_prepass_writes_depth_only() {
    let mut device = MockGraphicsDevice::new();
    let log = device.log();
    let scene = build_scene(vec![("a", Mesh::cube(1.0), Some(flat(&log)))]);
    let list = flatten(&scene, scene.root(), &Mat4::IDENTITY);
    let shaded = resolve_shading(&scene, &list);
    let camera = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY);

    let draws = ForwardPass::depth_prepass(&mut device, &shaded, &camera).unwrap();

    assert_eq!(draws, 1);
    assert_eq!(
        device.commands(),
        vec![
            "set_depth_write(true)",
            "set_color_write(none)",
            "bind_program(flat)",
            "flat.set_world_transform(cube)",
            "flat.set_camera",
            "draw_mesh(cube)",
            "bind_program(none)",
        ]
    );
}

// ============================================================================
// LIGHT ACCUMULATION
// ============================================================================

#[test]
fn test_accumulate_light_without_shadow() {
    let mut device = MockGraphicsDevice::new();
    let log = device.log();
    let scene = build_scene(vec![("a", Mesh::plane(2.0), Some(flat(&log)))]);
    let list = flatten(&scene, scene.root(), &Mat4::IDENTITY);
    let shaded = resolve_shading(&scene, &list);
    let camera = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY);
    let light = LightSource::new(Light::ambient(Vec3::splat(0.2)), Mat4::IDENTITY);

    ForwardPass::accumulate_light(&mut device, &shaded, &camera, &light, None).unwrap();

    assert_eq!(
        device.commands(),
        vec![
            "set_depth_write(false)",
            "set_color_write(all)",
            "bind_program(flat)",
            "flat.set_world_transform(plane)",
            "flat.set_camera",
            "flat.set_light_source(ambient)",
            "draw_mesh(plane)",
            "bind_program(none)",
        ]
    );
}

#[test]
fn test_accumulate_light_with_shadow_mapping() {
    let mut device = MockGraphicsDevice::new();
    let log = device.log();
    let scene = build_scene(vec![("a", Mesh::cube(1.0), Some(flat(&log)))]);
    let list = flatten(&scene, scene.root(), &Mat4::IDENTITY);
    let shaded = resolve_shading(&scene, &list);
    let camera = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY);
    let light = LightSource::new(Light::directional(Vec3::ONE), Mat4::IDENTITY);
    let texture: Arc<dyn Texture> = Arc::new(MockTexture {
        info: TextureInfo::from_depth_desc(&DepthTextureDesc::shadow_map(4, 4)),
        name: "depth".to_string(),
    });

    let shadow = ShadowMapping { texture: &texture, light_space: Mat4::IDENTITY };
    ForwardPass::accumulate_light(&mut device, &shaded, &camera, &light, Some(shadow)).unwrap();

    let commands = device.commands();
    let light_at = commands.iter().position(|c| c == "flat.set_light_source(directional)").unwrap();
    assert_eq!(commands[light_at + 1], "flat.set_shadow_mapping");
    assert_eq!(commands[light_at + 2], "draw_mesh(cube)");
}

#[test]
fn test_configuration_error_skips_only_that_entry() {
    let mut device = MockGraphicsDevice::new();
    let log = device.log();
    let lit: Arc<dyn Shader> = Arc::new(MockShader::requiring_normals("lit", log.clone()));
    let no_normals = Mesh::new("flat_tri").with_positions(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    let scene = build_scene(
        vec![
            ("broken", no_normals, Some(lit.clone())),
            ("good", Mesh::cube(1.0), Some(lit)),
        ],
    );
    let list = flatten(&scene, scene.root(), &Mat4::IDENTITY);
    let shaded = resolve_shading(&scene, &list);
    let camera = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY);

    let draws = ForwardPass::depth_prepass(&mut device, &shaded, &camera).unwrap();

    assert_eq!(draws, 1);
    let commands = device.commands();
    assert!(!commands.contains(&"draw_mesh(flat_tri)".to_string()));
    assert!(commands.contains(&"draw_mesh(cube)".to_string()));
    // The rejected entry still releases its program
    assert_eq!(commands.iter().filter(|c| *c == "bind_program(none)").count(), 2);
}

#[test]
fn test_device_error_ends_pass() {
    let mut device = MockGraphicsDevice::new();
    let log = device.log();
    let scene = build_scene(vec![("a", Mesh::cube(1.0), Some(flat(&log)))]);
    let list = flatten(&scene, scene.root(), &Mat4::IDENTITY);
    let shaded = resolve_shading(&scene, &list);
    let camera = Camera::new(Mat4::IDENTITY, Mat4::IDENTITY);
    device.fail_on("draw_mesh");

    assert!(ForwardPass::depth_prepass(&mut device, &shaded, &camera).is_err());
    assert_eq!(device.commands().last().unwrap(), "bind_program(none)");
}
