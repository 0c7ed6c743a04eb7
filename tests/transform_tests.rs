//! Transform and hierarchy tests
//!
//! Tests for:
//! - Transform TRS operations and dirty checking
//! - Euler angle round-trip conversions
//! - look_at orientation
//! - translate_local relative to the current facing
//! - apply_local_matrix decomposition
//! - World matrix propagation through the scene graph

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::{Affine3A, Mat4, Quat, Vec3};

use marionette::scene::{Node, NodeHandle, Scene, Transform};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    // First call always rebuilds.
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.position = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.rotation = Quat::from_rotation_y(FRAC_PI_2);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.scale = Vec3::splat(2.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());
}

#[test]
fn transform_local_matrix_reflects_trs() {
    let mut t = Transform::new();
    t.position = Vec3::new(10.0, 20.0, 30.0);
    t.scale = Vec3::splat(2.0);
    t.update_local_matrix();

    let mat = Mat4::from(*t.local_matrix());
    assert!(vec3_approx(mat.w_axis.truncate(), Vec3::new(10.0, 20.0, 30.0)));
}

#[test]
fn transform_euler_roundtrip() {
    let mut t = Transform::new();
    let (x, y, z) = (0.3, 0.7, 1.2);
    t.set_rotation_euler(x, y, z);

    let euler = t.rotation_euler();
    assert!(approx_eq(euler.x, x));
    assert!(approx_eq(euler.y, y));
    assert!(approx_eq(euler.z, z));
}

#[test]
fn transform_look_at_basic() {
    let mut t = Transform::new();
    t.look_at(Vec3::new(0.0, 0.0, -10.0), Vec3::Y);
    t.update_local_matrix();

    let mat = Mat4::from(*t.local_matrix());
    let forward = -mat.z_axis.truncate().normalize();
    assert!(vec3_approx(forward, Vec3::NEG_Z));
}

#[test]
fn transform_look_at_collinear_up_noop() {
    let mut t = Transform::new();
    let original_rotation = t.rotation;
    t.look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
    assert_eq!(t.rotation, original_rotation);
}

#[test]
fn transform_apply_local_matrix_decomposition() {
    let original_pos = Vec3::new(5.0, -3.0, 7.0);
    let original_rot = Quat::from_rotation_y(FRAC_PI_4);
    let original_scale = Vec3::new(2.0, 3.0, 1.5);

    let mat = Affine3A::from_scale_rotation_translation(original_scale, original_rot, original_pos);

    let mut t = Transform::new();
    t.apply_local_matrix(mat);

    assert!(vec3_approx(t.position, original_pos));
    assert!(vec3_approx(t.scale, original_scale));
    assert!(t.rotation.angle_between(original_rot) < 1e-4);
}

#[test]
fn transform_mark_dirty_forces_update() {
    let mut t = Transform::new();
    t.update_local_matrix();
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
}

// ============================================================================
// Local Translation
// ============================================================================

#[test]
fn translate_local_without_rotation_is_world_aligned() {
    let mut t = Transform::new();
    t.translate_local(Vec3::new(0.0, 0.0, -10.0));
    assert!(vec3_approx(t.position, Vec3::new(0.0, 0.0, -10.0)));
}

#[test]
fn translate_local_follows_facing() {
    let mut t = Transform::new();
    t.rotation = Quat::from_rotation_y(FRAC_PI_2);

    // Local forward (-Z) turned a quarter left points along -X.
    t.translate_local(Vec3::new(0.0, 0.0, -10.0));
    assert!(vec3_approx(t.position, Vec3::new(-10.0, 0.0, 0.0)), "{:?}", t.position);

    t.rotation = Quat::from_rotation_y(PI);
    t.translate_local(Vec3::new(5.0, 0.0, 0.0));
    assert!(vec3_approx(t.position, Vec3::new(-15.0, 0.0, 0.0)), "{:?}", t.position);
}

#[test]
fn translate_is_parent_aligned() {
    let mut t = Transform::new();
    t.rotation = Quat::from_rotation_y(FRAC_PI_2);
    t.translate(Vec3::new(0.0, 0.0, -10.0));
    assert!(vec3_approx(t.position, Vec3::new(0.0, 0.0, -10.0)));
}

// ============================================================================
// Hierarchy Propagation
// ============================================================================

fn create_chain(scene: &mut Scene, length: usize) -> Vec<NodeHandle> {
    let mut handles: Vec<NodeHandle> = Vec::new();
    for i in 0..length {
        let mut node = Node::new(format!("n{i}"));
        node.transform.position = Vec3::X;
        let handle = match handles.last() {
            Some(&parent) => scene.add_to_parent(node, parent),
            None => scene.add_node(node),
        };
        handles.push(handle);
    }
    handles
}

#[test]
fn hierarchy_chain_world_positions() {
    let mut scene = Scene::new();
    let chain = create_chain(&mut scene, 5);
    scene.update_matrix_world();

    for (i, &handle) in chain.iter().enumerate() {
        let expected = Vec3::new((i + 1) as f32, 0.0, 0.0);
        let actual = scene.world_position(handle).unwrap();
        assert!(vec3_approx(actual, expected), "node {i}: {actual:?}");
    }
}

#[test]
fn hierarchy_with_rotation_and_scale() {
    let mut scene = Scene::new();
    let mut parent = Node::new("parent");
    parent.transform.rotation = Quat::from_rotation_y(FRAC_PI_2);
    parent.transform.scale = Vec3::splat(2.0);
    let parent = scene.add_node(parent);

    let mut child = Node::new("child");
    child.transform.position = Vec3::X;
    let child = scene.add_to_parent(child, parent);

    scene.update_matrix_world();
    let world = scene.world_position(child).unwrap();
    assert!(vec3_approx(world, Vec3::new(0.0, 0.0, -2.0)), "{world:?}");
}

#[test]
fn hierarchy_parent_change_propagates() {
    let mut scene = Scene::new();
    let chain = create_chain(&mut scene, 3);
    scene.update_matrix_world();

    scene.get_node_mut(chain[0]).unwrap().transform.position = Vec3::new(0.0, 10.0, 0.0);
    scene.update_matrix_world();

    let leaf = scene.world_position(chain[2]).unwrap();
    assert!(vec3_approx(leaf, Vec3::new(2.0, 10.0, 0.0)), "{leaf:?}");
}

#[test]
fn hierarchy_attach_recomputes_child() {
    let mut scene = Scene::new();
    let mut parent = Node::new("parent");
    parent.transform.position = Vec3::new(0.0, 5.0, 0.0);
    let parent = scene.add_node(parent);
    let child = scene.add_node(Node::new("child"));
    scene.update_matrix_world();
    assert!(vec3_approx(scene.world_position(child).unwrap(), Vec3::ZERO));

    scene.attach(child, parent);
    scene.update_matrix_world();
    assert!(vec3_approx(
        scene.world_position(child).unwrap(),
        Vec3::new(0.0, 5.0, 0.0)
    ));
}

#[test]
fn deeply_nested_hierarchy_no_stack_overflow() {
    let mut scene = Scene::new();
    let chain = create_chain(&mut scene, 10_000);
    scene.update_matrix_world();

    let leaf = scene.world_position(*chain.last().unwrap()).unwrap();
    assert!((leaf.x - 10_000.0).abs() < 1.0);
}
