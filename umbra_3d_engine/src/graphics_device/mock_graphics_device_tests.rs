/// Unit tests for MockGraphicsDevice and the mock programs.

use std::sync::Arc;
use glam::{Mat4, Vec3};
use crate::error::Error;
use crate::graphics_device::mock_graphics_device::*;
use crate::graphics_device::{
    BlendState, ClearFlags, ColorWriteMask, CompareFunction, DepthTextureDesc, GraphicsDevice,
    Shader, ShaderBinding, Viewport,
};
use crate::resource::Mesh;

#[test]
fn test_mock_records_state_commands() {
    let mut device = MockGraphicsDevice::new();
    device.set_clear_color([0.0, 0.0, 0.0, 0.0]).unwrap();
    device.set_depth_test(Some(CompareFunction::LessEqual)).unwrap();
    device.set_blend_state(Some(BlendState::ADDITIVE)).unwrap();
    device.set_color_write(ColorWriteMask::empty()).unwrap();
    device.clear(ClearFlags::COLOR | ClearFlags::DEPTH).unwrap();
    device.set_viewport(Viewport::full(800, 600)).unwrap();

    assert_eq!(
        device.commands(),
        vec![
            "set_clear_color([0.0, 0.0, 0.0, 0.0])",
            "set_depth_test(LessEqual)",
            "set_blend_state(additive)",
            "set_color_write(none)",
            "clear(color|depth)",
            "set_viewport(0, 0, 800, 600)",
        ]
    );
}

#[test]
fn test_mock_resources_are_named() {
    let mut device = MockGraphicsDevice::new();
    let depth = device.create_depth_texture(DepthTextureDesc::shadow_map(64, 32)).unwrap();
    let target = device.create_depth_render_target(&depth).unwrap();
    assert_eq!(target.width(), 64);
    assert_eq!(target.height(), 32);

    device.clear_log();
    device.bind_render_target(Some(target)).unwrap();
    device.bind_render_target(None).unwrap();
    assert_eq!(device.commands(), vec!["bind_render_target(shadow)", "bind_render_target(window)"]);
}

#[test]
fn test_mock_fail_on_prefix() {
    let mut device = MockGraphicsDevice::new();
    device.fail_on("draw_mesh");
    let err = device.draw_mesh(&Mesh::quad()).unwrap_err();
    assert_eq!(err, Error::BackendError("draw_mesh(quad) failed".to_string()));
    assert!(device.commands().is_empty());
    assert!(device.set_depth_write(true).is_ok());
}

#[test]
fn test_mock_shader_rejects_missing_streams() {
    let device = MockGraphicsDevice::new();
    let lit = MockShader::requiring_normals("lit", device.log());
    let no_normals = Mesh::new("bare").with_positions(vec![Vec3::ZERO; 3]);

    let err = lit.set_world_transform(&no_normals, &Mat4::IDENTITY).unwrap_err();
    assert_eq!(
        err,
        Error::MissingVertexAttribute { mesh: "bare".to_string(), attribute: "normal" }
    );
    assert!(lit.set_world_transform(&Mesh::quad(), &Mat4::IDENTITY).is_ok());
}

#[test]
fn test_mock_program_binding_labels() {
    let mut device = MockGraphicsDevice::new();
    let shader: Arc<dyn Shader> = Arc::new(MockShader::new("flat", device.log()));
    device.bind_program(Some(ShaderBinding::Shading(shader))).unwrap();
    let shadow = device.create_shadow_shader().unwrap();
    device.bind_program(Some(ShaderBinding::Shadow(shadow))).unwrap();
    device.bind_program(None).unwrap();

    assert_eq!(
        device.commands(),
        vec![
            "bind_program(flat)",
            "create_shadow_shader",
            "bind_program(shadow)",
            "bind_program(none)",
        ]
    );
}
