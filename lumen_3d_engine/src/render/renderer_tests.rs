use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use glam::Vec3;
use crate::graphics_device::mock_graphics_device::{MockGraphicsDevice, MockRecord};
use crate::graphics_device::UniformValue;
use crate::render::Bucket;
use crate::resource::{Geometry, PhongMaterial};
use crate::scene::{Light, Node};

struct Fixture {
    renderer: Renderer,
    record: Arc<Mutex<MockRecord>>,
    live_buffers: Arc<AtomicUsize>,
}

fn fixture() -> Fixture {
    let mock = MockGraphicsDevice::new();
    let record = mock.record.clone();
    let live_buffers = mock.live_buffer_counter();
    let device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(mock));
    let renderer = Renderer::new(device, RendererConfig::default()).unwrap();
    Fixture { renderer, record, live_buffers }
}

fn camera() -> PerspectiveCamera {
    let mut camera = PerspectiveCamera::new();
    camera.transform.position = Vec3::new(0.0, 0.0, 20.0);
    camera
}

fn cube_scene() -> (Scene, crate::scene::NodeKey) {
    let mut scene = Scene::new();
    let root = scene.root();
    let cube = scene
        .spawn(root, Node::mesh(Arc::new(Geometry::unit_cube()), PhongMaterial::new(Color::rgb(255, 0, 0))))
        .unwrap();
    scene.spawn(root, Node::light(Light::point()).at(Vec3::new(0.0, 20.0, 10.0))).unwrap();
    (scene, cube)
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = RendererConfig::default();
    assert_eq!(config.background_color, Color::rgb(191, 204, 217));
    assert_eq!((config.width, config.height), (480, 320));
    assert_eq!(config.clear_flags, ClearFlags::COLOR | ClearFlags::DEPTH);
    assert!(config.blend_transparent);
}

#[test]
fn test_new_sets_viewport() {
    let f = fixture();
    assert_eq!(f.record.lock().unwrap().commands, vec!["set_viewport:480x320"]);
    assert!(f.renderer.context().is_none());
    assert_eq!(f.renderer.stats(), RenderStats::default());
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_cube_with_point_light() {
    let mut f = fixture();
    let (mut scene, cube) = cube_scene();
    let mut camera = camera();

    f.renderer.render(&mut scene, &mut camera).unwrap();

    let context = f.renderer.context().unwrap();
    let cube_id = scene.node(cube).unwrap().id();
    assert_eq!(context.queue().ids(Bucket::Opaque), vec![cube_id]);
    assert_eq!(context.queue().transparent_len(), 0);

    let record = f.record.lock().unwrap();
    assert_eq!(record.commands[1], "clear:3");
    assert_eq!(
        record.last_upload("u_PointLights[0].position"),
        Some(&UniformValue::Vec3(Vec3::new(0.0, 20.0, 10.0)))
    );
    assert_eq!(record.last_upload("u_PointLightsCount"), Some(&UniformValue::Int(1)));
    assert_eq!(
        record.last_upload("u_CameraPosition"),
        Some(&UniformValue::Vec3(Vec3::new(0.0, 0.0, 20.0)))
    );
    drop(record);

    let stats = f.renderer.stats();
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.triangles, 12);
    assert_eq!(stats.opaque_items, 1);
    assert_eq!(stats.programs, 1);
}

#[test]
fn test_render_twice_reuses_everything() {
    let mut f = fixture();
    let (mut scene, _) = cube_scene();
    let mut camera = camera();

    f.renderer.render(&mut scene, &mut camera).unwrap();
    f.renderer.render(&mut scene, &mut camera).unwrap();

    let record = f.record.lock().unwrap();
    assert_eq!(record.count("create_program"), 1);
    assert_eq!(record.count("create_vertex_array"), 1);
    assert_eq!(record.count("draw_indexed"), 2);
    assert_eq!(f.renderer.context().unwrap().queue().len(), 1);
}

#[test]
fn test_render_refreshes_world_matrices() {
    let mut f = fixture();
    let (mut scene, cube) = cube_scene();
    let mut camera = camera();
    scene.node_mut(cube).unwrap().transform.position = Vec3::new(3.0, 0.0, 0.0);

    f.renderer.render(&mut scene, &mut camera).unwrap();

    let expected = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(scene.node(cube).unwrap().transform.world_matrix(), &expected);
    assert_eq!(
        f.record.lock().unwrap().last_upload("u_WorldMatrix"),
        Some(&UniformValue::Mat4(expected))
    );
    assert_eq!(camera.world_position(), Vec3::new(0.0, 0.0, 20.0));
}

#[test]
fn test_removed_drawable_is_released_next_frame() {
    let mut f = fixture();
    let (mut scene, cube) = cube_scene();
    let mut camera = camera();

    f.renderer.render(&mut scene, &mut camera).unwrap();
    assert_eq!(f.live_buffers.load(Ordering::SeqCst), 4);

    scene.destroy(cube).unwrap();
    f.renderer.render(&mut scene, &mut camera).unwrap();

    assert!(f.renderer.context().unwrap().queue().is_empty());
    assert_eq!(f.live_buffers.load(Ordering::SeqCst), 0);
    assert_eq!(f.renderer.stats().draw_calls, 0);
}

#[test]
fn test_hidden_drawable_is_not_drawn() {
    let mut f = fixture();
    let (mut scene, cube) = cube_scene();
    let mut camera = camera();
    scene.node_mut(cube).unwrap().visible = false;

    f.renderer.render(&mut scene, &mut camera).unwrap();
    assert_eq!(f.record.lock().unwrap().count("draw"), 0);
}

#[test]
fn test_context_recreated_for_new_scene() {
    let mut f = fixture();
    let (mut first, _) = cube_scene();
    let (mut second, _) = cube_scene();
    let mut camera = camera();

    f.renderer.render(&mut first, &mut camera).unwrap();
    assert!(f.renderer.context().unwrap().is_for(first.id(), camera.id()));

    f.renderer.render(&mut second, &mut camera).unwrap();
    assert!(f.renderer.context().unwrap().is_for(second.id(), camera.id()));
    // first context released its buffers
    assert_eq!(f.live_buffers.load(Ordering::SeqCst), 4);
    assert_eq!(f.record.lock().unwrap().count("create_program"), 2);
}

#[test]
fn test_context_recreated_for_new_camera() {
    let mut f = fixture();
    let (mut scene, _) = cube_scene();
    let mut first = camera();
    let mut second = camera();

    f.renderer.render(&mut scene, &mut first).unwrap();
    f.renderer.render(&mut scene, &mut second).unwrap();
    assert!(f.renderer.context().unwrap().is_for(scene.id(), second.id()));
}

// ============================================================================
// clear / resize / release
// ============================================================================

#[test]
fn test_clear_and_resize() {
    let mut f = fixture();
    f.renderer.clear(Color::BLACK).unwrap();
    f.renderer.resize(800, 600).unwrap();

    assert_eq!(f.renderer.config().width, 800);
    let record = f.record.lock().unwrap();
    assert_eq!(
        record.commands,
        vec!["set_viewport:480x320", "clear:3", "resize:800x600", "set_viewport:800x600"]
    );
}

#[test]
fn test_release_drops_context() {
    let mut f = fixture();
    let (mut scene, _) = cube_scene();
    let mut camera = camera();
    f.renderer.render(&mut scene, &mut camera).unwrap();

    f.renderer.release();
    assert!(f.renderer.context().is_none());
    assert_eq!(f.live_buffers.load(Ordering::SeqCst), 0);
}
