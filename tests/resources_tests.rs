//! Resource Registry Tests
//!
//! Tests for:
//! - ResourceStorage add/get/remove and stale handles
//! - ResourceRegistry release bookkeeping and live counts
//! - Sharing a registry across threads
//! - BoundingBox construction and transforms

use std::sync::Arc;

use glam::{Affine3A, Quat, Vec3, Vec4};

use marionette::resources::{
    BoundingBox, Geometry, GeometryHandle, Material, ResourceCounts, ResourceRegistry,
    ResourceStorage, Texture, TextureSource,
};

fn triangle() -> Geometry {
    Geometry::new("triangle", vec![Vec3::ZERO, Vec3::X, Vec3::Y]).with_indices(vec![0, 1, 2])
}

// ============================================================================
// ResourceStorage
// ============================================================================

#[test]
fn storage_add_get_remove() {
    let storage: ResourceStorage<GeometryHandle, Geometry> = ResourceStorage::new();
    assert!(storage.is_empty());

    let handle = storage.add(triangle());
    assert_eq!(storage.len(), 1);
    assert!(storage.contains(handle));
    assert_eq!(storage.get(handle).unwrap().vertex_count(), 3);
    assert_eq!(storage.handles(), vec![handle]);

    let removed = storage.remove(handle).unwrap();
    assert_eq!(removed.name, "triangle");
    assert!(storage.get(handle).is_none());
    assert!(storage.remove(handle).is_none());
}

#[test]
fn storage_stale_handle_does_not_alias_new_entry() {
    let storage: ResourceStorage<GeometryHandle, Geometry> = ResourceStorage::new();
    let old = storage.add(triangle());
    storage.remove(old);

    let new = storage.add(Geometry::new("quad", vec![Vec3::ZERO; 4]));
    assert_ne!(old, new);
    assert!(storage.get(old).is_none());
    assert_eq!(storage.get(new).unwrap().name, "quad");
}

#[test]
fn removed_resource_outlives_readers() {
    let storage: ResourceStorage<GeometryHandle, Geometry> = ResourceStorage::new();
    let handle = storage.add(triangle());
    let held = storage.get(handle).unwrap();

    storage.remove(handle);
    assert_eq!(held.vertex_count(), 3);
}

// ============================================================================
// ResourceRegistry
// ============================================================================

#[test]
fn registry_counts_and_release() {
    let registry = ResourceRegistry::new();
    let texture = registry.add_texture(Texture::new(
        "albedo",
        TextureSource::External("albedo.png".to_string()),
    ));
    let material = registry.add_material(
        Material::new_standard(Vec4::ONE)
            .with_name("skin")
            .with_map(texture),
    );
    let geometry = registry.add_geometry(triangle());

    assert_eq!(
        registry.live_counts(),
        ResourceCounts {
            geometries: 1,
            materials: 1,
            textures: 1,
        }
    );
    assert_eq!(registry.materials.get(material).unwrap().map, Some(texture));

    assert!(registry.release_geometry(geometry));
    assert!(registry.release_material(material));
    assert!(registry.release_texture(texture));
    assert_eq!(registry.live_counts().total(), 0);

    assert!(!registry.release_geometry(geometry));
    assert!(!registry.release_material(material));
    assert!(!registry.release_texture(texture));
}

#[test]
fn registry_clones_share_storage() {
    let registry = ResourceRegistry::new();
    let clone = registry.clone();
    let handle = clone.add_geometry(triangle());

    assert!(registry.geometries.contains(handle));
    registry.release_geometry(handle);
    assert!(!clone.geometries.contains(handle));
}

#[test]
fn registry_is_readable_from_other_threads() {
    let registry = Arc::new(ResourceRegistry::new());
    let handles: Vec<_> = (0..8).map(|_| registry.add_geometry(triangle())).collect();

    let reader = {
        let registry = Arc::clone(&registry);
        let handles = handles.clone();
        std::thread::spawn(move || {
            handles
                .iter()
                .filter_map(|&h| registry.geometries.get(h))
                .map(|g| g.vertex_count())
                .sum::<usize>()
        })
    };

    let total = reader.join().unwrap();
    assert_eq!(total, 24);
}

// ============================================================================
// BoundingBox
// ============================================================================

#[test]
fn bounding_box_from_points() {
    let bb = BoundingBox::from_points(&[
        Vec3::new(-1.0, 0.0, 2.0),
        Vec3::new(3.0, -2.0, 0.0),
        Vec3::new(0.0, 4.0, 1.0),
    ]);
    assert_eq!(bb.min, Vec3::new(-1.0, -2.0, 0.0));
    assert_eq!(bb.max, Vec3::new(3.0, 4.0, 2.0));
    assert_eq!(bb.center(), Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(bb.size(), Vec3::new(4.0, 6.0, 2.0));
}

#[test]
fn bounding_box_empty() {
    assert!(BoundingBox::from_points(&[]).is_empty());
    assert!(BoundingBox::default().is_empty());

    let bb = BoundingBox::from_points(&[Vec3::ONE]);
    assert!(!bb.is_empty());
    assert_eq!(BoundingBox::EMPTY.union(&bb), bb);
}

#[test]
fn bounding_box_transform_rotated() {
    let bb = BoundingBox::from_points(&[Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0)]);
    let matrix = Affine3A::from_rotation_translation(
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        Vec3::new(0.0, 10.0, 0.0),
    );

    let moved = bb.transform(&matrix);
    assert!((moved.min - Vec3::new(0.0, 10.0, -2.0)).length() < 1e-5, "{moved:?}");
    assert!((moved.max - Vec3::new(1.0, 11.0, 0.0)).length() < 1e-5, "{moved:?}");
}

#[test]
fn geometry_bounding_box_tracks_positions() {
    let mut geometry = triangle();
    assert_eq!(geometry.bounding_box.max, Vec3::new(1.0, 1.0, 0.0));

    geometry.positions.push(Vec3::new(0.0, 0.0, 5.0));
    geometry.compute_bounding_box();
    assert_eq!(geometry.bounding_box.max, Vec3::new(1.0, 1.0, 5.0));
    assert_eq!(geometry.indices.as_deref(), Some(&[0, 1, 2][..]));
}
