//! In-memory reference host.
//!
//! [`SceneGraph`] implements [`HostEngine`] without a real 3D application. It
//! imports from a [`PrefabLibrary`] (source path → node tree), names
//! duplicates the way DCC tools do (`Body`, `Body.001`, …), interpolates
//! location keyframes linearly and evaluates follow links as
//! `target location + offset`. Every operation is deterministic, so two
//! builds from the same inputs produce identical graphs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use scenewright_core::{Aabb, SceneError, SceneResult, Transform3D, Vec3};
use scenewright_ir::AssetSource;

use crate::host::{HostEngine, NodeId, NodeKind, LOCATION, SCALE};

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

fn is_unit_scale(scale: &Vec3) -> bool {
    *scale == Vec3::ONE
}

/// One node of an importable asset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabNode {
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub location: Vec3,
    #[serde(default = "unit_scale", skip_serializing_if = "is_unit_scale")]
    pub scale: Vec3,
    /// Local-space bounding box. Required for meshes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Aabb>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PrefabNode>,
}

impl PrefabNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            location: Vec3::ZERO,
            scale: Vec3::ONE,
            bounds: None,
            children: Vec::new(),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Empty)
    }

    pub fn armature(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Armature)
    }

    pub fn mesh(name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::new(name, NodeKind::Mesh)
        }
    }

    pub fn with_location(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_child(mut self, child: PrefabNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Source path → the top-level nodes an import of that file creates.
///
/// Lookups try the full path first, then the bare file name, so a library
/// keyed by `kid.glb` serves `assets/kid.glb` too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefabLibrary {
    prefabs: BTreeMap<PathBuf, Vec<PrefabNode>>,
}

impl PrefabLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, nodes: Vec<PrefabNode>) -> &mut Self {
        self.prefabs.insert(path.into(), nodes);
        self
    }

    pub fn get(&self, path: &Path) -> Option<&[PrefabNode]> {
        self.prefabs
            .get(path)
            .or_else(|| {
                path.file_name()
                    .and_then(|name| self.prefabs.get(Path::new(name)))
            })
            .map(|nodes| nodes.as_slice())
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.prefabs.keys().map(|p| p.as_path())
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> SceneResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// A live follow relationship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowLink {
    pub target: NodeId,
    pub offset: Vec3,
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    location: Vec3,
    scale: Vec3,
    bounds: Option<Aabb>,
    linked: bool,
    channels: BTreeMap<String, BTreeMap<i64, Vec3>>,
    follow: Option<FollowLink>,
}

impl Node {
    fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            parent: None,
            children: Vec::new(),
            location: Vec3::ZERO,
            scale: Vec3::ONE,
            bounds: None,
            linked: false,
            channels: BTreeMap::new(),
            follow: None,
        }
    }

    /// Property value at `frame`, or the static value when unanimated.
    fn sample(&self, property_path: &str, frame: Option<i64>, fallback: Vec3) -> Vec3 {
        match (frame, self.channels.get(property_path)) {
            (Some(frame), Some(keys)) => interpolate(keys, frame).unwrap_or(fallback),
            _ => fallback,
        }
    }
}

/// Linear interpolation between the surrounding keys, held constant outside
/// the keyed range.
fn interpolate(keys: &BTreeMap<i64, Vec3>, frame: i64) -> Option<Vec3> {
    let before = keys.range(..=frame).next_back();
    let after = keys.range(frame..).next();
    match (before, after) {
        (Some((&f0, v0)), Some((&f1, v1))) if f1 > f0 => {
            let t = frame.abs_diff(f0) as f64 / f1.abs_diff(f0) as f64;
            Some(v0.lerp(v1, t))
        }
        (Some((_, v)), _) | (None, Some((_, v))) => Some(*v),
        (None, None) => None,
    }
}

/// One link on the way from a node up to its unlinked ancestor.
enum Step {
    Follow { offset: Vec3, scale: Vec3 },
    Child(Transform3D),
}

/// The in-memory scene.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    library: PrefabLibrary,
    nodes: BTreeMap<NodeId, Node>,
    names: BTreeSet<String>,
    next_id: u64,
    frame_range: Option<(i64, i64)>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(library: PrefabLibrary) -> Self {
        Self {
            library,
            ..Self::default()
        }
    }

    pub fn library(&self) -> &PrefabLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut PrefabLibrary {
        &mut self.library
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn frame_range(&self) -> Option<(i64, i64)> {
        self.frame_range
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Look a node up by its (unique) name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
    }

    /// Linked nodes without a parent.
    pub fn scene_roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.linked && n.parent.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Keys recorded on a property, in frame order.
    pub fn keyframes(&self, node: NodeId, property_path: &str) -> SceneResult<Vec<(i64, Vec3)>> {
        Ok(self
            .node(node)?
            .channels
            .get(property_path)
            .map(|keys| keys.iter().map(|(f, v)| (*f, *v)).collect())
            .unwrap_or_default())
    }

    pub fn follow_link(&self, node: NodeId) -> SceneResult<Option<FollowLink>> {
        Ok(self.node(node)?.follow)
    }

    /// World transform from the current (unanimated) property values.
    pub fn world_transform(&self, node: NodeId) -> SceneResult<Transform3D> {
        self.world_transform_at(node, None)
    }

    /// A name-based, id-free picture of the graph for comparing builds.
    pub fn snapshot(&self) -> SceneSnapshot {
        let name_of = |id: NodeId| self.nodes.get(&id).map(|n| n.name.clone());
        let nodes = self
            .nodes
            .values()
            .map(|n| NodeSnapshot {
                name: n.name.clone(),
                kind: n.kind,
                parent: n.parent.and_then(name_of),
                location: n.location,
                scale: n.scale,
                keyframes: n
                    .channels
                    .iter()
                    .map(|(path, keys)| {
                        (path.clone(), keys.iter().map(|(f, v)| (*f, *v)).collect())
                    })
                    .collect(),
                follows: n.follow.and_then(|link| {
                    name_of(link.target).map(|target| FollowSnapshot {
                        target,
                        offset: link.offset,
                    })
                }),
            })
            .collect();
        SceneSnapshot {
            frame_range: self.frame_range,
            nodes,
        }
    }

    fn node(&self, id: NodeId) -> SceneResult<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| SceneError::host(format!("no node {}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| SceneError::host(format!("no node {}", id)))
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.names.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}.{:03}", base, n))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn add_node(&mut self, name: &str, kind: NodeKind) -> NodeId {
        let name = self.unique_name(name);
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.names.insert(name.clone());
        self.nodes.insert(id, Node::new(name, kind));
        id
    }

    fn attach_child(&mut self, child: NodeId, parent: Option<NodeId>) -> SceneResult<()> {
        let old_parent = self.node(child)?.parent;
        if let Some(old) = old_parent {
            self.node_mut(old)?.children.retain(|c| *c != child);
        }
        if let Some(new) = parent {
            self.node_mut(new)?.children.push(child);
        }
        self.node_mut(child)?.parent = parent;
        Ok(())
    }

    fn instantiate(
        &mut self,
        prefab: &PrefabNode,
        parent: Option<NodeId>,
        created: &mut Vec<NodeId>,
    ) -> SceneResult<()> {
        let id = self.add_node(&prefab.name, prefab.kind);
        {
            let node = self.node_mut(id)?;
            node.location = prefab.location;
            node.scale = prefab.scale;
            node.bounds = prefab.bounds;
            node.linked = true;
        }
        self.attach_child(id, parent)?;
        created.push(id);
        for child in &prefab.children {
            self.instantiate(child, Some(id), created)?;
        }
        Ok(())
    }

    /// Whether `node`'s world transform depends on `other`, through parents
    /// or follow links.
    fn depends_on(&self, node: NodeId, other: NodeId) -> bool {
        let mut stack = vec![node];
        let mut seen = BTreeSet::new();
        while let Some(current) = stack.pop() {
            if current == other {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(n) = self.nodes.get(&current) {
                stack.extend(n.parent);
                stack.extend(n.follow.map(|link| link.target));
            }
        }
        false
    }

    /// Walks up to the first unlinked, unparented node, then composes back
    /// down. Parent and follow links are acyclic, so the walk ends.
    fn world_transform_at(&self, id: NodeId, frame: Option<i64>) -> SceneResult<Transform3D> {
        let mut chain = Vec::new();
        let mut current = id;
        let mut world = loop {
            let node = self.node(current)?;
            let local = Transform3D::new(
                node.sample(LOCATION, frame, node.location),
                node.sample(SCALE, frame, node.scale),
            );
            if let Some(link) = node.follow {
                chain.push(Step::Follow {
                    offset: link.offset,
                    scale: local.scale,
                });
                current = link.target;
            } else if let Some(parent) = node.parent {
                chain.push(Step::Child(local));
                current = parent;
            } else {
                break local;
            }
        };

        for step in chain.into_iter().rev() {
            world = match step {
                Step::Follow { offset, scale } => Transform3D::new(world.location.add(&offset), scale),
                Step::Child(local) => world.then(&local),
            };
        }
        Ok(world)
    }

    fn subtree(&self, root: NodeId) -> SceneResult<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(out)
    }
}

impl HostEngine for SceneGraph {
    fn import(&mut self, source: &AssetSource) -> SceneResult<Vec<NodeId>> {
        let prefabs = self
            .library
            .get(&source.path)
            .ok_or_else(|| {
                SceneError::host(format!("nothing to import at {}", source.path.display()))
            })?
            .to_vec();
        let mut created = Vec::new();
        for prefab in &prefabs {
            self.instantiate(prefab, None, &mut created)?;
        }
        tracing::debug!(
            "imported {} nodes from {} ({:?})",
            created.len(),
            source.path.display(),
            source.kind
        );
        Ok(created)
    }

    fn new_empty_node(&mut self, name: &str) -> SceneResult<NodeId> {
        Ok(self.add_node(name, NodeKind::Empty))
    }

    fn link_to_scene_root(&mut self, node: NodeId) -> SceneResult<()> {
        self.node_mut(node)?.linked = true;
        Ok(())
    }

    fn insert_keyframe(
        &mut self,
        node: NodeId,
        property_path: &str,
        frame: i64,
    ) -> SceneResult<()> {
        let n = self.node_mut(node)?;
        let value = match property_path {
            LOCATION => n.location,
            SCALE => n.scale,
            other => {
                return Err(SceneError::host(format!(
                    "cannot keyframe property '{}'",
                    other
                )))
            }
        };
        n.channels
            .entry(property_path.to_string())
            .or_default()
            .insert(frame, value);
        tracing::debug!("keyframe {}.{} @ {} = {}", n.name, property_path, frame, value);
        Ok(())
    }

    fn world_bounding_corners(&self, mesh: NodeId) -> SceneResult<[Vec3; 8]> {
        let node = self.node(mesh)?;
        let bounds = match (node.kind, node.bounds) {
            (NodeKind::Mesh, Some(bounds)) => bounds,
            _ => {
                return Err(SceneError::host(format!(
                    "'{}' has no mesh geometry",
                    node.name
                )))
            }
        };
        let world = self.world_transform(mesh)?;
        Ok(bounds.corners().map(|corner| world.apply(&corner)))
    }

    fn set_frame_range(&mut self, start: i64, end: i64) -> SceneResult<()> {
        if start > end {
            return Err(SceneError::host(format!(
                "invalid frame range {}..{}",
                start, end
            )));
        }
        self.frame_range = Some((start, end));
        Ok(())
    }

    fn node_name(&self, node: NodeId) -> SceneResult<String> {
        Ok(self.node(node)?.name.clone())
    }

    fn node_kind(&self, node: NodeId) -> SceneResult<NodeKind> {
        Ok(self.node(node)?.kind)
    }

    fn children(&self, node: NodeId) -> SceneResult<Vec<NodeId>> {
        Ok(self.node(node)?.children.clone())
    }

    fn parent(&self, node: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    fn location(&self, node: NodeId) -> SceneResult<Vec3> {
        Ok(self.node(node)?.location)
    }

    fn set_location(&mut self, node: NodeId, location: Vec3) -> SceneResult<()> {
        self.node_mut(node)?.location = location;
        Ok(())
    }

    fn scale(&self, node: NodeId) -> SceneResult<Vec3> {
        Ok(self.node(node)?.scale)
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) -> SceneResult<()> {
        self.node_mut(node)?.scale = scale;
        Ok(())
    }

    fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> SceneResult<()> {
        if let Some(p) = parent {
            self.node(p)?;
            if self.depends_on(p, child) {
                return Err(SceneError::host(format!(
                    "parenting {} under {} would create a cycle",
                    child, p
                )));
            }
        }
        self.attach_child(child, parent)
    }

    fn link_follow(&mut self, follower: NodeId, target: NodeId, offset: Vec3) -> SceneResult<()> {
        self.node(target)?;
        if self.depends_on(target, follower) {
            return Err(SceneError::host(format!(
                "{} following {} would create a cycle",
                follower, target
            )));
        }
        self.node_mut(follower)?.follow = Some(FollowLink { target, offset });
        Ok(())
    }

    fn location_at(&self, node: NodeId, frame: i64) -> SceneResult<Vec3> {
        Ok(self.world_transform_at(node, Some(frame))?.location)
    }

    fn remove_subtree(&mut self, node: NodeId) -> SceneResult<()> {
        let doomed = self.subtree(node)?;
        self.attach_child(node, None)?;
        for id in &doomed {
            if let Some(removed) = self.nodes.remove(id) {
                self.names.remove(&removed.name);
            }
        }
        for other in self.nodes.values_mut() {
            if other.follow.is_some_and(|link| doomed.contains(&link.target)) {
                other.follow = None;
            }
        }
        Ok(())
    }
}

/// Serializable view of a [`SceneGraph`], keyed by node names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub frame_range: Option<(i64, i64)>,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub location: Vec3,
    pub scale: Vec3,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keyframes: BTreeMap<String, Vec<(i64, Vec3)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follows: Option<FollowSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowSnapshot {
    pub target: String,
    pub offset: Vec3,
}
