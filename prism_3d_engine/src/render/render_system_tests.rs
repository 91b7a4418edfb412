use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3, Vec4};
use crate::camera::{CameraDesc, CameraProvider, CameraSystem};
use crate::error::{Error, Result};
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::{
    GraphicsDevice, PrimitiveKind, ShaderDesc, ShaderHandle, Uniform, UniformValue,
};
use crate::math;
use crate::resource::{GpuMesh, Mesh};
use super::*;

// ============================================================================
// Fixture
// ============================================================================

struct Fixture {
    render: RenderSystem,
    device: Arc<Mutex<MockGraphicsDevice>>,
    cameras: Arc<Mutex<CameraSystem>>,
    shader: ShaderHandle,
    cube: GpuMesh,
    flat_cube: GpuMesh,
    axes: GpuMesh,
}

fn fixture() -> Fixture {
    let mut mock = MockGraphicsDevice::new();
    let cube = GpuMesh::upload(&Mesh::cube(), &mut mock).unwrap();
    let flat_cube = GpuMesh::upload(&Mesh::cube().with_flat_normals().with_name("FlatCube"), &mut mock).unwrap();
    let axes = GpuMesh::upload(&Mesh::orientation_axes(), &mut mock).unwrap();
    let shader = mock.create_shader(&ShaderDesc {
        name: "Test Shader".to_string(),
        vertex_source: String::new(),
        fragment_source: String::new(),
    }).unwrap();
    mock.reset_records();

    let device = Arc::new(Mutex::new(mock));
    let mut camera_system = CameraSystem::new();
    camera_system.initialize(&CameraDesc::default()).unwrap();
    let cameras = Arc::new(Mutex::new(camera_system));

    let mut render = RenderSystem::new(cameras.clone());
    render.attach_device(device.clone());
    render.set_active_shader(Some(shader));

    Fixture { render, device, cameras, shader, cube, flat_cube, axes }
}

impl Fixture {
    fn commands(&self) -> Vec<String> {
        self.device.lock().unwrap().commands.clone()
    }

    fn draws(&self) -> Vec<String> {
        self.device.lock().unwrap().commands_with_prefix("draw_elements")
    }

    fn uploads_of(&self, uniform: Uniform) -> Vec<UniformValue> {
        self.device.lock().unwrap().uniforms.iter()
            .filter(|(u, _)| *u == uniform)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Lighting stage that records nothing but a light count
struct TestLighting {
    shader: ShaderHandle,
    defaults: Material,
}

impl LightingStage for TestLighting {
    fn is_active_for(&self, shader: ShaderHandle) -> bool {
        shader == self.shader
    }

    fn upload(&self, device: &mut dyn GraphicsDevice, eye: Vec4) -> Result<()> {
        device.set_uniform(Uniform::EyePosition, &UniformValue::Vec4(eye))?;
        device.set_uniform(Uniform::LightCount, &UniformValue::Int(2))
    }

    fn material_defaults(&self) -> Material {
        self.defaults
    }
}

// ============================================================================
// Flush protocol
// ============================================================================

#[test]
fn test_flush_order_with_debug_queue() {
    let mut f = fixture();
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.render_debug(&f.axes, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();

    f.render.update(0.016).unwrap();

    assert_eq!(f.commands(), strings(&[
        "bind_shader Test Shader",
        "set_uniform perspMat",
        "set_uniform worldToCam",
        "set_uniform objToWorld",
        "set_uniform normMat",
        "set_uniform ignoreNorm",
        "draw_elements Cube.edges Lines 24",
        "clear depth",
        "set_uniform objToWorld",
        "set_uniform normMat",
        "set_uniform ignoreNorm",
        "draw_elements Orientation.edges Lines 6",
    ]));
}

#[test]
fn test_draw_order_is_submission_order() {
    let mut f = fixture();
    let models: Vec<Mat4> = (1..=4)
        .map(|i| math::translate(math::vector(i as f32, 0.0, 0.0)))
        .collect();
    f.render.render(&f.cube, PrimitiveKind::Triangles, models[0], None).unwrap();
    f.render.render(&f.axes, PrimitiveKind::Lines, models[1], None).unwrap();
    f.render.render(&f.cube, PrimitiveKind::Points, models[2], None).unwrap();
    f.render.render(&f.flat_cube, PrimitiveKind::Triangles, models[3], None).unwrap();

    f.render.update(0.016).unwrap();

    let expected: Vec<UniformValue> = models.into_iter().map(UniformValue::Mat4).collect();
    assert_eq!(f.uploads_of(Uniform::ObjectToWorld), expected);

    assert_eq!(f.draws(), strings(&[
        "draw_elements Cube.faces Triangles 36",
        "draw_elements Orientation.edges Lines 6",
        "draw_elements Cube.points Points 8",
        "draw_elements FlatCube.faces Triangles 36",
    ]));
    assert_eq!(f.render.last_frame_stats().draws, 4);
}

#[test]
fn test_no_depth_clear_without_debug_requests() {
    let mut f = fixture();
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.update(0.016).unwrap();
    assert!(f.device.lock().unwrap().commands_with_prefix("clear").is_empty());
}

#[test]
fn test_depth_clear_sits_between_queues() {
    let mut f = fixture();
    f.render.render_debug(&f.axes, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.render(&f.cube, PrimitiveKind::Triangles, Mat4::IDENTITY, None).unwrap();
    f.render.update(0.016).unwrap();

    let commands = f.commands();
    let scene = commands.iter().position(|c| c == "draw_elements Cube.faces Triangles 36").unwrap();
    let clear = commands.iter().position(|c| c == "clear depth").unwrap();
    let overlay = commands.iter().position(|c| c == "draw_elements Orientation.edges Lines 6").unwrap();
    assert!(scene < clear && clear < overlay);
}

#[test]
fn test_queues_are_empty_after_flush() {
    let mut f = fixture();
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.render_debug(&f.axes, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    assert_eq!(f.render.pending_count(), 1);
    assert_eq!(f.render.pending_debug_count(), 1);

    f.render.update(0.016).unwrap();
    assert_eq!(f.render.pending_count(), 0);
    assert_eq!(f.render.pending_debug_count(), 0);

    f.device.lock().unwrap().reset_records();
    f.render.update(0.016).unwrap();
    assert!(f.draws().is_empty());
    assert_eq!(f.commands(), strings(&[
        "bind_shader Test Shader",
        "set_uniform perspMat",
        "set_uniform worldToCam",
    ]));
}

// ============================================================================
// Uniform values
// ============================================================================

#[test]
fn test_camera_matrices_bound_once() {
    let mut f = fixture();
    for _ in 0..3 {
        f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    }
    f.render.update(0.016).unwrap();

    let (persp, view) = {
        let cameras = f.cameras.lock().unwrap();
        let camera = cameras.active_camera().unwrap();
        (camera.persp_matrix(), camera.view_matrix())
    };
    assert_eq!(f.uploads_of(Uniform::Perspective), vec![UniformValue::Mat4(persp)]);
    assert_eq!(f.uploads_of(Uniform::View), vec![UniformValue::Mat4(view)]);
    assert_eq!(f.uploads_of(Uniform::ObjectToWorld).len(), 3);
}

#[test]
fn test_camera_changes_are_seen_at_flush() {
    let mut f = fixture();
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    {
        let mut cameras = f.cameras.lock().unwrap();
        let camera = cameras.active_camera_mut().unwrap();
        camera.zoom(30.0);
        camera.move_forward(5.0);
    }
    f.render.update(0.016).unwrap();

    let cameras = f.cameras.lock().unwrap();
    let camera = cameras.active_camera().unwrap();
    assert_eq!(f.uploads_of(Uniform::Perspective), vec![UniformValue::Mat4(camera.persp_matrix())]);
    assert_eq!(f.uploads_of(Uniform::View), vec![UniformValue::Mat4(camera.view_matrix())]);
    assert_eq!(camera.eye_point(), math::point(0.0, 0.0, -5.0));
}

#[test]
fn test_transforms_are_captured_at_enqueue() {
    let mut f = fixture();
    let expected = math::translate(math::vector(3.0, 0.0, 0.0)) * math::scale(2.0, 1.0, 0.5);
    f.render.render(&f.cube, PrimitiveKind::Triangles, expected, None).unwrap();
    f.cameras.lock().unwrap().active_camera_mut().unwrap().move_right(2.0);

    f.render.update(0.016).unwrap();
    assert_eq!(f.uploads_of(Uniform::ObjectToWorld), vec![UniformValue::Mat4(expected)]);
    assert_eq!(
        f.uploads_of(Uniform::NormalMatrix),
        vec![UniformValue::Mat4(math::normal_matrix(&expected))]
    );
}

#[test]
fn test_ignore_normals_flag() {
    let mut f = fixture();
    f.render.render(&f.cube, PrimitiveKind::Points, Mat4::IDENTITY, None).unwrap();
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.render(&f.cube, PrimitiveKind::Triangles, Mat4::IDENTITY, None).unwrap();
    f.render.render(&f.flat_cube, PrimitiveKind::Triangles, Mat4::IDENTITY, None).unwrap();
    f.render.update(0.016).unwrap();

    assert_eq!(f.uploads_of(Uniform::IgnoreNormals), vec![
        UniformValue::Int(1),
        UniformValue::Int(1),
        UniformValue::Int(1),
        UniformValue::Int(0),
    ]);
}

// ============================================================================
// Submission errors
// ============================================================================

#[test]
fn test_render_missing_primitive_buffer_fails() {
    let mut f = fixture();
    let result = f.render.render(&f.axes, PrimitiveKind::Triangles, Mat4::IDENTITY, None);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    let result = f.render.render_debug(&f.flat_cube, PrimitiveKind::Lines, Mat4::IDENTITY, None);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(f.render.pending_count(), 0);
    assert_eq!(f.render.pending_debug_count(), 0);
}

// ============================================================================
// Fail-soft frames
// ============================================================================

#[test]
fn test_missing_camera_drops_frame() {
    let mut f = fixture();
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.render_debug(&f.axes, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    {
        let mut cameras = f.cameras.lock().unwrap();
        let key = cameras.active_key().unwrap();
        cameras.remove_camera(key);
    }

    assert!(f.render.update(0.016).is_ok());
    assert!(f.commands().is_empty());
    assert_eq!(f.render.pending_count(), 0);
    assert_eq!(f.render.pending_debug_count(), 0);
    assert_eq!(f.render.last_frame_stats().dropped, 2);
}

#[test]
fn test_missing_device_drops_frame() {
    let mut f = fixture();
    f.render.detach_device();
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();

    assert!(f.render.update(0.016).is_ok());
    assert_eq!(f.render.pending_count(), 0);
    assert_eq!(f.render.last_frame_stats().dropped, 1);
    assert!(f.commands().is_empty());
}

#[test]
fn test_missing_shader_drops_frame() {
    let mut f = fixture();
    f.render.set_active_shader(None);
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();

    assert!(f.render.update(0.016).is_ok());
    assert!(f.commands().is_empty());
    assert_eq!(f.render.pending_count(), 0);
}

#[test]
fn test_device_error_propagates_and_clears_queues() {
    let mut f = fixture();
    f.device.lock().unwrap().fail_draws = true;
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.render_debug(&f.axes, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();

    assert!(matches!(f.render.update(0.016), Err(Error::BackendError(_))));
    assert_eq!(f.render.pending_count(), 0);
    assert_eq!(f.render.pending_debug_count(), 0);
}

// ============================================================================
// Materials and lighting
// ============================================================================

#[test]
fn test_material_override_is_restored() {
    let mut f = fixture();
    let red = Material::tinted(Vec3::X);
    f.render.render(&f.cube, PrimitiveKind::Triangles, Mat4::IDENTITY, Some(red)).unwrap();
    f.render.render(&f.cube, PrimitiveKind::Triangles, Mat4::IDENTITY, None).unwrap();
    f.render.render(&f.cube, PrimitiveKind::Triangles, Mat4::IDENTITY, None).unwrap();
    f.render.update(0.016).unwrap();

    assert_eq!(f.uploads_of(Uniform::Tint), vec![
        UniformValue::Vec3(Vec3::X),
        UniformValue::Vec3(Material::default().tint),
    ]);
}

#[test]
fn test_requests_without_material_upload_none() {
    let mut f = fixture();
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.update(0.016).unwrap();
    assert!(f.uploads_of(Uniform::Tint).is_empty());
}

#[test]
fn test_active_lighting_uploads_before_draws() {
    let mut f = fixture();
    let defaults = Material {
        tint: Vec3::ZERO,
        diffuse: Vec3::splat(0.8),
        specular: Vec3::splat(0.5),
        specular_exponent: 32.0,
    };
    f.render.set_lighting(Some(Arc::new(Mutex::new(TestLighting { shader: f.shader, defaults }))));
    f.render.render(&f.cube, PrimitiveKind::Triangles, Mat4::IDENTITY, Some(Material::tinted(Vec3::Y))).unwrap();
    f.render.render(&f.cube, PrimitiveKind::Triangles, Mat4::IDENTITY, None).unwrap();
    f.render.update(0.016).unwrap();

    let commands = f.commands();
    let light = commands.iter().position(|c| c == "set_uniform lightCount").unwrap();
    let view = commands.iter().position(|c| c == "set_uniform worldToCam").unwrap();
    let first_draw = commands.iter().position(|c| c.starts_with("draw_elements")).unwrap();
    assert!(view < light && light < first_draw);

    assert_eq!(f.uploads_of(Uniform::EyePosition), vec![UniformValue::Vec4(math::point(0.0, 0.0, -10.0))]);
    assert_eq!(f.uploads_of(Uniform::SpecularExponent), vec![
        UniformValue::Float(32.0),
        UniformValue::Float(1.0),
        UniformValue::Float(32.0),
    ]);
}

#[test]
fn test_inactive_lighting_is_skipped() {
    let mut f = fixture();
    let other_shader = f.device.lock().unwrap().create_shader(&ShaderDesc {
        name: "Phong".to_string(),
        vertex_source: String::new(),
        fragment_source: String::new(),
    }).unwrap();
    f.render.set_lighting(Some(Arc::new(Mutex::new(TestLighting {
        shader: other_shader,
        defaults: Material::default(),
    }))));
    f.render.render(&f.cube, PrimitiveKind::Lines, Mat4::IDENTITY, None).unwrap();
    f.render.update(0.016).unwrap();

    assert!(f.uploads_of(Uniform::LightCount).is_empty());
    assert!(f.uploads_of(Uniform::Tint).is_empty());
}
