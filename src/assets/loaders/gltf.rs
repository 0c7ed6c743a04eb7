//! glTF 2.0 / GLB model parser.
//!
//! Produces an [`ActorPrefab`] from a self-contained model file: buffers must
//! live in the GLB binary chunk or in base64 `data:` URIs. Images may be
//! external; they are recorded by URI and resolved by the renderer.
//!
//! Multi-primitive meshes become a group node with one child per primitive,
//! each sharing the mesh's morph channel names.

use std::sync::Arc;

use base64::Engine as _;
use glam::{Quat, Vec3, Vec4};
use gltf::animation::util::ReadOutputs;
use gltf::animation::{Interpolation, Property};
use serde::Deserialize;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::animation::values::MorphWeightData;
use crate::assets::loaders::ModelParser;
use crate::assets::prefab::{ActorPrefab, PrefabMaterial, PrefabMesh, PrefabNode};
use crate::errors::{Error, Result};
use crate::resources::{Geometry, Texture, TextureSource};
use crate::scene::transform::Transform;

/// `extras` of a glTF mesh as written by common exporters.
#[derive(Debug, Default, Deserialize)]
struct MeshExtras {
    #[serde(rename = "targetNames", default)]
    target_names: Vec<String>,
}

/// Parser for `.glb` and `.gltf` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct GltfParser;

impl ModelParser for GltfParser {
    fn extensions(&self) -> &[&str] {
        &["glb", "gltf"]
    }

    fn parse(&self, name: &str, bytes: &[u8]) -> Result<ActorPrefab> {
        let gltf = gltf::Gltf::from_slice(bytes)
            .map_err(|e| Error::MalformedAsset(format!("{name}: {e}")))?;
        let buffers = load_buffers(&gltf)?;

        let mut prefab = ActorPrefab::new(name);
        prefab.textures = load_textures(&gltf, &buffers)?;
        prefab.materials = load_materials(&gltf);

        let mesh_parts = load_meshes(&gltf, &buffers, &mut prefab)?;
        load_nodes(&gltf, &mesh_parts, &mut prefab);
        prefab.animations = load_animations(&gltf, &buffers)?
            .into_iter()
            .map(Arc::new)
            .collect();

        log::debug!(
            "Parsed '{name}': {} nodes, {} meshes, {} clips",
            prefab.nodes.len(),
            prefab.mesh_count(),
            prefab.animations.len()
        );
        Ok(prefab)
    }
}

// ============================================================================
// Buffers and images
// ============================================================================

fn decode_data_uri(uri: &str) -> Option<Result<(String, Vec<u8>)>> {
    let rest = uri.strip_prefix("data:")?;
    let Some((header, payload)) = rest.split_once(',') else {
        return Some(Err(Error::MalformedAsset(format!(
            "data URI without payload: {}",
            uri.chars().take(32).collect::<String>()
        ))));
    };
    let Some(mime) = header.strip_suffix(";base64") else {
        return Some(Err(Error::MalformedAsset(
            "only base64 data URIs are supported".to_string(),
        )));
    };
    Some(
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map(|bytes| (mime.to_string(), bytes))
            .map_err(Error::from),
    )
}

fn load_buffers(gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>> {
    let mut data = Vec::new();
    for buffer in gltf.buffers() {
        let bytes = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| Error::MalformedAsset("missing GLB binary chunk".to_string()))?,
            gltf::buffer::Source::Uri(uri) => match decode_data_uri(uri) {
                Some(decoded) => decoded?.1,
                None => {
                    return Err(Error::MalformedAsset(format!(
                        "external buffer '{uri}' is not supported; embed it in the GLB"
                    )));
                }
            },
        };
        if bytes.len() < buffer.length() {
            return Err(Error::MalformedAsset(format!(
                "buffer {} holds {} bytes, expected {}",
                buffer.index(),
                bytes.len(),
                buffer.length()
            )));
        }
        data.push(bytes);
    }
    Ok(data)
}

fn load_textures(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Vec<Texture>> {
    let mut textures = Vec::new();
    for texture in gltf.textures() {
        let image = texture.source();
        let label = texture
            .name()
            .or(image.name())
            .map_or_else(|| format!("texture_{}", texture.index()), str::to_string);

        let source = match image.source() {
            gltf::image::Source::View { view, mime_type } => {
                let start = view.offset();
                let end = start + view.length();
                let bytes = buffers
                    .get(view.buffer().index())
                    .and_then(|b| b.get(start..end))
                    .ok_or_else(|| {
                        Error::MalformedAsset(format!("image view of '{label}' out of range"))
                    })?;
                TextureSource::Embedded {
                    mime_type: mime_type.to_string(),
                    bytes: bytes.to_vec(),
                }
            }
            gltf::image::Source::Uri { uri, mime_type } => match decode_data_uri(uri) {
                Some(decoded) => {
                    let (data_mime, bytes) = decoded?;
                    TextureSource::Embedded {
                        mime_type: mime_type.map_or(data_mime, str::to_string),
                        bytes,
                    }
                }
                None => TextureSource::External(uri.to_string()),
            },
        };
        textures.push(Texture::new(label, source));
    }
    Ok(textures)
}

fn load_materials(gltf: &gltf::Gltf) -> Vec<PrefabMaterial> {
    gltf.materials()
        .map(|material| {
            let pbr = material.pbr_metallic_roughness();
            PrefabMaterial {
                name: material.name().unwrap_or_default().to_string(),
                color: Vec4::from_array(pbr.base_color_factor()),
                metalness: pbr.metallic_factor(),
                roughness: pbr.roughness_factor(),
                map: pbr.base_color_texture().map(|info| info.texture().index()),
                double_sided: material.double_sided(),
            }
        })
        .collect()
}

// ============================================================================
// Meshes and nodes
// ============================================================================

/// Morph channel names of a mesh: `extras.targetNames` when present and
/// complete, otherwise `target_<i>`.
fn morph_target_names(mesh: &gltf::Mesh, count: usize) -> Vec<String> {
    let from_extras = mesh
        .extras()
        .as_ref()
        .and_then(|raw| serde_json::from_str::<MeshExtras>(raw.get()).ok())
        .map(|extras| extras.target_names)
        .unwrap_or_default();

    (0..count)
        .map(|i| {
            from_extras
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("target_{i}"))
        })
        .collect()
}

/// Converts every primitive of every mesh into a geometry and returns, per
/// glTF mesh index, the `PrefabMesh` of each primitive.
fn load_meshes(
    gltf: &gltf::Gltf,
    buffers: &[Vec<u8>],
    prefab: &mut ActorPrefab,
) -> Result<Vec<Vec<PrefabMesh>>> {
    let mut meshes = Vec::new();

    for mesh in gltf.meshes() {
        let mesh_name = mesh
            .name()
            .map_or_else(|| format!("mesh_{}", mesh.index()), str::to_string);
        let morph_count = mesh
            .primitives()
            .map(|p| p.morph_targets().count())
            .max()
            .unwrap_or(0);
        let names = morph_target_names(&mesh, morph_count);
        let weights = mesh.weights().map(<[f32]>::to_vec).unwrap_or_default();

        let mut parts = Vec::new();
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|b| buffers.get(b.index()).map(Vec::as_slice));

            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or_else(|| {
                    Error::MalformedAsset(format!("primitive of '{mesh_name}' has no positions"))
                })?
                .map(Vec3::from_array)
                .collect();

            let mut geometry = Geometry::new(
                format!("{mesh_name}_{}", primitive.index()),
                positions,
            );
            geometry.normals = reader
                .read_normals()
                .map(|it| it.map(Vec3::from_array).collect());
            geometry.indices = reader.read_indices().map(|it| it.into_u32().collect());
            geometry.morph_positions = reader
                .read_morph_targets()
                .map(|(pos, _, _)| {
                    pos.map(|it| it.map(Vec3::from_array).collect())
                        .unwrap_or_default()
                })
                .collect();

            prefab.geometries.push(geometry);
            parts.push(PrefabMesh {
                geometry: prefab.geometries.len() - 1,
                material: primitive.material().index(),
                morph_target_names: names.clone(),
                morph_weights: weights.clone(),
            });
        }
        meshes.push(parts);
    }

    Ok(meshes)
}

/// Name used for both the prefab node and the tracks targeting it, so
/// unnamed nodes still bind.
fn node_name(node: &gltf::Node<'_>) -> String {
    node.name()
        .map_or_else(|| format!("node_{}", node.index()), str::to_string)
}

fn load_nodes(gltf: &gltf::Gltf, mesh_parts: &[Vec<PrefabMesh>], prefab: &mut ActorPrefab) {
    let node_count = gltf.nodes().count();
    prefab.nodes = vec![PrefabNode::default(); node_count];

    for node in gltf.nodes() {
        let (translation, rotation, scale) = node.transform().decomposed();
        let mut target = PrefabNode {
            name: Some(node_name(&node)),
            transform: Transform::from_trs(
                Vec3::from_array(translation),
                Quat::from_array(rotation),
                Vec3::from_array(scale),
            ),
            children_indices: node.children().map(|c| c.index()).collect(),
            mesh: None,
        };

        if let Some(mesh) = node.mesh() {
            let mut parts = mesh_parts.get(mesh.index()).cloned().unwrap_or_default();
            if let Some(node_weights) = node.weights() {
                for part in &mut parts {
                    part.morph_weights = node_weights.to_vec();
                }
            }

            if parts.len() == 1 {
                target.mesh = parts.pop();
            } else {
                let base = node_name(&node);
                for (i, part) in parts.into_iter().enumerate() {
                    let child = prefab.push_node(PrefabNode {
                        name: Some(format!("{base}_primitive_{i}")),
                        mesh: Some(part),
                        ..PrefabNode::default()
                    });
                    target.children_indices.push(child);
                }
            }
        }

        prefab.nodes[node.index()] = target;
    }

    prefab.root_indices = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
        Some(scene) => scene.nodes().map(|n| n.index()).collect(),
        None => {
            let mut is_child = vec![false; node_count];
            for node in gltf.nodes() {
                for child in node.children() {
                    is_child[child.index()] = true;
                }
            }
            (0..node_count).filter(|&i| !is_child[i]).collect()
        }
    };
}

// ============================================================================
// Animations
// ============================================================================

fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Vec<AnimationClip>> {
    let mut animations = Vec::new();

    for anim in gltf.animations() {
        let clip_name = anim
            .name()
            .map_or_else(|| format!("animation_{}", anim.index()), str::to_string);
        let mut tracks = Vec::new();

        for channel in anim.channels() {
            let reader = channel.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
            let target = channel.target();
            let node_name = node_name(&target.node());

            let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs())
            else {
                log::warn!("Clip '{clip_name}': channel for '{node_name}' has no data");
                continue;
            };
            let times: Vec<f32> = inputs.collect();

            let interpolation = match channel.sampler().interpolation() {
                Interpolation::Linear => InterpolationMode::Linear,
                Interpolation::Step => InterpolationMode::Step,
                Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            };

            let (target_path, data) = match (target.property(), outputs) {
                (Property::Translation, ReadOutputs::Translations(it)) => (
                    TargetPath::Translation,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        it.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                (Property::Rotation, ReadOutputs::Rotations(it)) => (
                    TargetPath::Rotation,
                    TrackData::Quaternion(KeyframeTrack::new(
                        times,
                        it.into_f32().map(Quat::from_array).collect(),
                        interpolation,
                    )),
                ),
                (Property::Scale, ReadOutputs::Scales(it)) => (
                    TargetPath::Scale,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        it.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                (Property::MorphTargetWeights, ReadOutputs::MorphTargetWeights(it)) => {
                    let flat: Vec<f32> = it.into_f32().collect();
                    let values_per_key = if interpolation == InterpolationMode::CubicSpline {
                        3
                    } else {
                        1
                    };
                    let groups = times.len() * values_per_key;
                    if groups == 0 || flat.len() % groups != 0 {
                        return Err(Error::MalformedAsset(format!(
                            "clip '{clip_name}': weights output does not match {} keyframes",
                            times.len()
                        )));
                    }
                    let per_group = flat.len() / groups;
                    let values = flat
                        .chunks(per_group.max(1))
                        .map(MorphWeightData::from_slice)
                        .collect();
                    (
                        TargetPath::Weights,
                        TrackData::MorphWeights(KeyframeTrack::new(times, values, interpolation)),
                    )
                }
                (property, _) => {
                    log::warn!("Clip '{clip_name}': mismatched output for {property:?}");
                    continue;
                }
            };

            if !track_is_consistent(&data) {
                return Err(Error::MalformedAsset(format!(
                    "clip '{clip_name}': track for '{node_name}' has mismatched key counts"
                )));
            }

            tracks.push(Track {
                meta: TrackMeta {
                    node_name,
                    target: target_path,
                },
                data,
            });
        }

        animations.push(AnimationClip::new(clip_name, tracks));
    }

    Ok(animations)
}

/// Value count matches key count (times three for cubic splines).
fn track_is_consistent(data: &TrackData) -> bool {
    fn check<T: crate::animation::values::Interpolatable>(t: &KeyframeTrack<T>) -> bool {
        let factor = if t.interpolation == InterpolationMode::CubicSpline {
            3
        } else {
            1
        };
        t.values.len() == t.times.len() * factor
    }
    match data {
        TrackData::Vector3(t) => check(t),
        TrackData::Quaternion(t) => check(t),
        TrackData::Scalar(t) => check(t),
        TrackData::MorphWeights(t) => check(t),
    }
}
