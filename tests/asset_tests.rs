//! Asset Loading Tests
//!
//! Tests for:
//! - glTF parsing: node hierarchy, morph channel names, materials, clips
//! - Rejection of external buffers and garbage input
//! - AssetRepository name resolution and error kinds
//! - Memory and file readers
//! - ActorLoader generations: the latest request wins

use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use serde_json::{Value, json};

use marionette::animation::binding::TargetPath;
use marionette::assets::{
    ActorLoader, ActorPrefab, AssetReader, AssetReaderVariant, AssetRepository, FileAssetReader,
    GltfParser, MemoryAssetReader, ModelParser,
};
use marionette::errors::{Error, Result};
use marionette::resources::ResourceRegistry;
use marionette::scene::Scene;
use marionette::settings::AssetSettings;

// ============================================================================
// Fixtures
// ============================================================================

fn push_vec3s(out: &mut Vec<u8>, values: &[[f32; 3]]) {
    for v in values {
        for c in v {
            out.extend_from_slice(&c.to_le_bytes());
        }
    }
}

/// Binary payload: triangle positions, two morph targets, animation times
/// and translations.
fn buffer_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    push_vec3s(&mut bytes, &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    push_vec3s(&mut bytes, &[[0.0, 0.5, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
    push_vec3s(&mut bytes, &[[0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.0, 0.0]]);
    for t in [0.0_f32, 1.0] {
        bytes.extend_from_slice(&t.to_le_bytes());
    }
    push_vec3s(&mut bytes, &[[0.0, 0.0, 0.0], [0.0, 0.0, -10.0]]);
    assert_eq!(bytes.len(), 140);
    bytes
}

fn position_accessor(offset: usize) -> Value {
    json!({
        "bufferView": 0, "byteOffset": offset, "componentType": 5126,
        "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
    })
}

/// Armature > Body, with a two-channel morphable mesh and one clip moving
/// the armature.
fn character_document() -> Value {
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buffer_bytes())
    );
    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "Armature", "children": [1], "translation": [0.0, 1.0, 0.0] },
            { "name": "Body", "mesh": 0 }
        ],
        "meshes": [{
            "name": "Body",
            "primitives": [{
                "attributes": { "POSITION": 0 },
                "targets": [{ "POSITION": 1 }, { "POSITION": 2 }],
                "material": 0
            }],
            "weights": [0.25, 0.0],
            "extras": { "targetNames": ["A", "B"] }
        }],
        "materials": [{
            "name": "skin",
            "pbrMetallicRoughness": {
                "baseColorFactor": [1.0, 0.0, 0.0, 1.0],
                "metallicFactor": 0.0,
                "roughnessFactor": 0.5
            }
        }],
        "buffers": [{ "byteLength": 140, "uri": uri }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 108 },
            { "buffer": 0, "byteOffset": 108, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 116, "byteLength": 24 }
        ],
        "accessors": [
            position_accessor(0),
            position_accessor(36),
            position_accessor(72),
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "animations": [{
            "name": "Walk",
            "channels": [{ "sampler": 0, "target": { "node": 0, "path": "translation" } }],
            "samplers": [{ "input": 3, "output": 4, "interpolation": "LINEAR" }]
        }]
    })
}

fn encode(document: &Value) -> Vec<u8> {
    serde_json::to_vec(document).unwrap()
}

fn memory_repository(files: &[(&str, Vec<u8>)]) -> AssetRepository {
    let mut reader = MemoryAssetReader::new();
    for (uri, bytes) in files {
        reader = reader.with_file(*uri, bytes.clone());
    }
    AssetRepository::new(AssetSettings::default(), AssetReaderVariant::memory(reader))
}

// ============================================================================
// glTF Parsing
// ============================================================================

#[test]
fn gltf_hierarchy_and_transforms() {
    let prefab = GltfParser
        .parse("Walking", &encode(&character_document()))
        .unwrap();

    assert_eq!(prefab.name, "Walking");
    assert_eq!(prefab.nodes.len(), 2);
    assert_eq!(prefab.root_indices, vec![0]);
    assert_eq!(prefab.nodes[0].name.as_deref(), Some("Armature"));
    assert_eq!(prefab.nodes[0].children_indices, vec![1]);
    assert!(prefab.nodes[0].mesh.is_none());
    assert_eq!(prefab.nodes[0].transform.position, glam::Vec3::Y);
}

#[test]
fn gltf_mesh_morphs_and_material() {
    let prefab = GltfParser
        .parse("Walking", &encode(&character_document()))
        .unwrap();

    let mesh = prefab.nodes[1].mesh.as_ref().unwrap();
    assert_eq!(mesh.morph_target_names, vec!["A", "B"]);
    assert_eq!(mesh.morph_weights, vec![0.25, 0.0]);
    assert_eq!(mesh.material, Some(0));

    let geometry = &prefab.geometries[mesh.geometry];
    assert_eq!(geometry.vertex_count(), 3);
    assert_eq!(geometry.morph_target_count(), 2);

    let material = &prefab.materials[0];
    assert_eq!(material.name, "skin");
    assert_eq!(material.color, glam::Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(material.roughness, 0.5);
    assert!(material.map.is_none());
}

#[test]
fn gltf_missing_target_names_fall_back() {
    let mut document = character_document();
    document["meshes"][0].as_object_mut().unwrap().remove("extras");

    let prefab = GltfParser.parse("Walking", &encode(&document)).unwrap();
    let mesh = prefab.nodes[1].mesh.as_ref().unwrap();
    assert_eq!(mesh.morph_target_names, vec!["target_0", "target_1"]);
}

#[test]
fn gltf_animation_clip() {
    let prefab = GltfParser
        .parse("Walking", &encode(&character_document()))
        .unwrap();

    assert_eq!(prefab.animations.len(), 1);
    let clip = &prefab.animations[0];
    assert_eq!(clip.name, "Walk");
    assert!((clip.duration - 1.0).abs() < 1e-6);
    assert_eq!(clip.tracks.len(), 1);
    assert_eq!(clip.tracks[0].meta.node_name, "Armature");
    assert_eq!(clip.tracks[0].meta.target, TargetPath::Translation);
}

#[test]
fn gltf_multi_primitive_mesh_becomes_group() {
    let mut document = character_document();
    let primitive = document["meshes"][0]["primitives"][0].clone();
    document["meshes"][0]["primitives"]
        .as_array_mut()
        .unwrap()
        .push(primitive);

    let prefab = GltfParser.parse("Walking", &encode(&document)).unwrap();
    let body = &prefab.nodes[1];
    assert!(body.mesh.is_none());
    assert_eq!(body.children_indices.len(), 2);
    for &child in &body.children_indices {
        let mesh = prefab.nodes[child].mesh.as_ref().unwrap();
        assert_eq!(mesh.morph_target_names, vec!["A", "B"]);
    }
    assert_eq!(prefab.mesh_count(), 2);
}

#[test]
fn gltf_external_buffer_is_rejected() {
    let mut document = character_document();
    document["buffers"][0]["uri"] = json!("Body.bin");

    let result = GltfParser.parse("Walking", &encode(&document));
    assert!(matches!(result, Err(Error::MalformedAsset(_))), "{result:?}");
}

#[test]
fn gltf_without_meshes_is_empty_not_error() {
    let document = json!({
        "asset": { "version": "2.0" },
        "nodes": [{ "name": "Lonely" }]
    });

    let prefab = GltfParser.parse("Empty", &encode(&document)).unwrap();
    assert!(prefab.is_empty());
    assert!(prefab.animations.is_empty());
    assert_eq!(prefab.root_indices, vec![0]);
}

#[test]
fn parsed_character_installs_with_sliders() {
    let prefab = GltfParser
        .parse("Walking", &encode(&character_document()))
        .unwrap();

    let mut scene = Scene::new();
    let resources = ResourceRegistry::new();
    let mut player = marionette::AnimationPlayer::new();
    let mut actors = marionette::SceneActorManager::new();
    actors.replace_actor(&prefab, &mut scene, &resources, &mut player);

    assert_eq!(actors.morph_controls().slider_count(), 2);
    assert!(actors.morph_controls().is_visible());
    assert!(!player.is_inert());
    assert_eq!(resources.live_counts().geometries, 1);
    assert_eq!(resources.live_counts().materials, 1);
}

#[test]
fn gltf_non_ascii_data_uri_is_malformed() {
    let mut document = character_document();
    document["buffers"][0]["uri"] = json!(format!("data:{}", "é".repeat(40)));

    let result = GltfParser.parse("Walking", &encode(&document));
    assert!(matches!(result, Err(Error::MalformedAsset(_))), "{result:?}");
}

fn install_and_advance(prefab: &ActorPrefab, dt: f32) -> (Scene, marionette::NodeHandle) {
    let mut scene = Scene::new();
    let resources = ResourceRegistry::new();
    let mut player = marionette::AnimationPlayer::new();
    let mut actors = marionette::SceneActorManager::new();
    actors.replace_actor(prefab, &mut scene, &resources, &mut player);
    player.advance(dt, &mut scene);
    let root = actors.active_root().unwrap();
    (scene, root)
}

#[test]
fn gltf_unnamed_animated_node_still_binds() {
    let mut document = character_document();
    document["nodes"][0].as_object_mut().unwrap().remove("name");

    let prefab = GltfParser.parse("Walking", &encode(&document)).unwrap();
    assert_eq!(prefab.nodes[0].name.as_deref(), Some("node_0"));
    assert_eq!(prefab.animations[0].tracks[0].meta.node_name, "node_0");

    let (scene, root) = install_and_advance(&prefab, 0.5);
    let armature = scene.find_by_name(root, "node_0").unwrap();
    let position = scene.get_node(armature).unwrap().transform.position;
    assert!((position - glam::Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4, "{position:?}");
}

#[test]
fn node_named_like_asset_does_not_animate_actor_root() {
    let mut document = character_document();
    document["nodes"][0]["name"] = json!("Walking");

    let prefab = GltfParser.parse("Walking", &encode(&document)).unwrap();
    let (scene, root) = install_and_advance(&prefab, 0.5);

    assert_eq!(scene.get_node(root).unwrap().transform.position, glam::Vec3::ZERO);
    let armature = scene.get_node(root).unwrap().children()[0];
    let position = scene.get_node(armature).unwrap().transform.position;
    assert!((position - glam::Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4, "{position:?}");
}

// ============================================================================
// Readers
// ============================================================================

#[test]
fn memory_reader_round_trip() {
    let reader = MemoryAssetReader::new().with_file("a.glb", vec![1, 2, 3]);
    assert_eq!(pollster::block_on(reader.read_bytes("a.glb")).unwrap(), vec![1, 2, 3]);

    assert!(reader.remove("a.glb"));
    let missing = pollster::block_on(reader.read_bytes("a.glb"));
    assert!(matches!(missing, Err(Error::AssetNotFound(_))));
}

#[tokio::test]
async fn file_reader_reads_relative_to_root() {
    let root = std::env::temp_dir().join(format!("marionette-assets-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&root).await.unwrap();
    tokio::fs::write(root.join("Walking.glb"), b"glb bytes").await.unwrap();

    let reader = FileAssetReader::new(&root);
    assert_eq!(reader.read_bytes("Walking.glb").await.unwrap(), b"glb bytes");

    let missing = reader.read_bytes("Jump.glb").await;
    assert!(matches!(missing, Err(Error::AssetNotFound(_))), "{missing:?}");

    tokio::fs::remove_dir_all(&root).await.unwrap();
}

// ============================================================================
// AssetRepository
// ============================================================================

#[test]
fn resolve_uses_naming_convention() {
    let repo = memory_repository(&[]);
    assert_eq!(repo.resolve("Walking").unwrap(), "Walking.glb");
    assert!(matches!(repo.resolve("Dance"), Err(Error::AssetNotFound(name)) if name == "Dance"));
}

#[tokio::test]
async fn load_unknown_name_is_not_found() {
    let repo = memory_repository(&[("Dance.glb", encode(&character_document()))]);
    let result = repo.load("Dance").await;
    assert!(matches!(result, Err(Error::AssetNotFound(_))));
}

#[tokio::test]
async fn load_missing_file_is_not_found() {
    let repo = memory_repository(&[]);
    let result = repo.load("Jump").await;
    assert!(matches!(result, Err(Error::AssetNotFound(_))));
}

#[tokio::test]
async fn load_unsupported_extension() {
    let settings = AssetSettings {
        extension: "fbx".to_string(),
        ..AssetSettings::default()
    };
    let reader = MemoryAssetReader::new().with_file("Walking.fbx", vec![0; 4]);
    let repo = AssetRepository::new(settings, AssetReaderVariant::memory(reader));

    let result = repo.load("Walking").await;
    assert!(matches!(result, Err(Error::UnsupportedFormat(ext)) if ext == "fbx"));
}

#[tokio::test]
async fn load_parses_catalog_asset() {
    let repo = memory_repository(&[("Walking.glb", encode(&character_document()))]);
    let prefab = repo.load("Walking").await.unwrap();
    assert_eq!(prefab.name, "Walking");
    assert_eq!(prefab.mesh_count(), 1);
}

#[tokio::test]
async fn load_malformed_file() {
    let repo = memory_repository(&[("Jump.glb", b"not a model".to_vec())]);
    let result = repo.load("Jump").await;
    assert!(matches!(result, Err(Error::MalformedAsset(_))));
}

// ============================================================================
// ActorLoader Generations
// ============================================================================

/// Returns empty prefabs, taking longer for one asset name.
struct DelayedParser {
    slow: &'static str,
}

impl ModelParser for DelayedParser {
    fn extensions(&self) -> &[&str] {
        &["glb"]
    }

    fn parse(&self, name: &str, _bytes: &[u8]) -> Result<ActorPrefab> {
        if name == self.slow {
            std::thread::sleep(Duration::from_millis(300));
        }
        Ok(ActorPrefab::new(name))
    }
}

fn delayed_loader(slow: &'static str) -> ActorLoader {
    let repo = memory_repository(&[("Walking.glb", vec![0]), ("Jump.glb", vec![0])])
        .with_parser(Arc::new(DelayedParser { slow }));
    ActorLoader::new(Arc::new(repo), tokio::runtime::Handle::current())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn latest_request_wins_when_it_finishes_first() {
    let mut loader = delayed_loader("Walking");

    let first = loader.request("Walking");
    let second = loader.request("Jump");
    assert!(second > first);
    assert_eq!(loader.latest_generation(), second);

    let outcome = loader.next_outcome().await.unwrap();
    assert_eq!(outcome.generation, second);
    assert_eq!(outcome.result.unwrap().name, "Jump");
    assert!(loader.pending().is_none());

    // The slow, superseded load arrives later and is dropped.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(loader.poll_latest().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stale_result_arriving_first_is_skipped() {
    let mut loader = delayed_loader("Jump");

    loader.request("Walking");
    let latest = loader.request("Jump");

    let outcome = loader.next_outcome().await.unwrap();
    assert_eq!(outcome.generation, latest);
    assert_eq!(outcome.name, "Jump");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_load_is_reported() {
    let mut loader = delayed_loader("none");

    loader.request("Dance");
    let outcome = loader.next_outcome().await.unwrap();
    assert!(matches!(outcome.result, Err(Error::AssetNotFound(_))));
    assert!(loader.last_error().unwrap().contains("Dance"));

    loader.request("Walking");
    assert!(loader.next_outcome().await.unwrap().result.is_ok());
    assert!(loader.last_error().is_none());
}

#[tokio::test]
async fn next_outcome_without_request_is_none() {
    let mut loader = delayed_loader("none");
    assert!(loader.next_outcome().await.is_none());
}
