//! Scene graph, camera and the active-actor manager.

pub mod actor;
pub mod camera;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}

pub use actor::{Actor, ReleaseReport, SceneActorManager};
pub use camera::Camera;
pub use node::{MeshComponent, MorphTargets, Node, NodeKind, ShadowFlags};
pub use scene::Scene;
pub use transform::Transform;
