//! The host-engine capability boundary.
//!
//! Everything the pipeline does to a 3D scene goes through [`HostEngine`].
//! The host is passed explicitly as `&mut impl HostEngine`; there is no
//! ambient "current scene".

use serde::{Deserialize, Serialize};

use scenewright_core::{SceneResult, Vec3};
use scenewright_ir::AssetSource;

/// Keyframeable property path for an object's location.
pub const LOCATION: &str = "location";
/// Keyframeable property path for an object's scale.
pub const SCALE: &str = "scale";

/// Opaque handle to a node inside a host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A transform-only node, such as an asset wrapper root.
    #[default]
    Empty,
    /// Mesh geometry with a local bounding box.
    Mesh,
    /// A skeleton.
    Armature,
    /// Cameras, lights and anything else the pipeline ignores.
    Other,
}

impl NodeKind {
    pub fn is_mesh(&self) -> bool {
        matches!(self, NodeKind::Mesh)
    }

    pub fn is_armature(&self) -> bool {
        matches!(self, NodeKind::Armature)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Host capabilities
// ──────────────────────────────────────────────────────────────────────────────

/// The operations the pipeline needs from a 3D host.
pub trait HostEngine {
    /// Import a file. Returns every node the import created.
    fn import(&mut self, source: &AssetSource) -> SceneResult<Vec<NodeId>>;

    /// Create an empty node. It is not part of the scene until linked.
    fn new_empty_node(&mut self, name: &str) -> SceneResult<NodeId>;

    fn link_to_scene_root(&mut self, node: NodeId) -> SceneResult<()>;

    /// Record the property's current value as a keyframe at `frame`.
    fn insert_keyframe(&mut self, node: NodeId, property_path: &str, frame: i64)
        -> SceneResult<()>;

    /// The eight corners of a mesh's local bounding box, in world space.
    fn world_bounding_corners(&self, mesh: NodeId) -> SceneResult<[Vec3; 8]>;

    fn set_frame_range(&mut self, start: i64, end: i64) -> SceneResult<()>;

    fn node_name(&self, node: NodeId) -> SceneResult<String>;

    fn node_kind(&self, node: NodeId) -> SceneResult<NodeKind>;

    fn children(&self, node: NodeId) -> SceneResult<Vec<NodeId>>;

    fn parent(&self, node: NodeId) -> SceneResult<Option<NodeId>>;

    /// Local location.
    fn location(&self, node: NodeId) -> SceneResult<Vec3>;

    fn set_location(&mut self, node: NodeId, location: Vec3) -> SceneResult<()>;

    /// Local scale.
    fn scale(&self, node: NodeId) -> SceneResult<Vec3>;

    fn set_scale(&mut self, node: NodeId, scale: Vec3) -> SceneResult<()>;

    /// Re-parent `child`, keeping its local transform.
    fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> SceneResult<()>;

    /// Keep `follower` at `target`'s location plus `offset` on every frame.
    fn link_follow(&mut self, follower: NodeId, target: NodeId, offset: Vec3) -> SceneResult<()>;

    /// Evaluated world location of `node` at `frame`, with keyframes and
    /// follow links applied.
    fn location_at(&self, node: NodeId, frame: i64) -> SceneResult<Vec3>;

    /// Delete `node` and everything below it.
    fn remove_subtree(&mut self, node: NodeId) -> SceneResult<()>;
}
