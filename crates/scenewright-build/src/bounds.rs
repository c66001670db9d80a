//! Hierarchy walks and the combined bounding-box fold.

use scenewright_core::{Aabb, SceneResult};

use crate::host::{HostEngine, NodeId, NodeKind};

/// Every node below `root`, depth-first in child order. `root` itself is
/// not included.
pub fn descendants<H: HostEngine + ?Sized>(host: &H, root: NodeId) -> SceneResult<Vec<NodeId>> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = host.children(root)?.into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(host.children(node)?.into_iter().rev());
    }
    Ok(out)
}

/// Descendants of `root` of the given kind.
pub fn descendants_of_kind<H: HostEngine + ?Sized>(
    host: &H,
    root: NodeId,
    kind: NodeKind,
) -> SceneResult<Vec<NodeId>> {
    let mut out = Vec::new();
    for node in descendants(host, root)? {
        if host.node_kind(node)? == kind {
            out.push(node);
        }
    }
    Ok(out)
}

/// World-space box around every mesh below `root`; `None` when there are no
/// meshes.
pub fn combined_bounds<H: HostEngine + ?Sized>(host: &H, root: NodeId) -> SceneResult<Option<Aabb>> {
    let meshes = descendants_of_kind(host, root, NodeKind::Mesh)?;
    mesh_bounds(host, &meshes)
}

/// World-space box around the given meshes.
pub fn mesh_bounds<H: HostEngine + ?Sized>(host: &H, meshes: &[NodeId]) -> SceneResult<Option<Aabb>> {
    let mut acc: Option<Aabb> = None;
    for &mesh in meshes {
        let corners = host.world_bounding_corners(mesh)?;
        let Some(b) = Aabb::from_points(corners.iter()) else {
            continue;
        };
        acc = Some(match acc {
            Some(a) => a.union(&b),
            None => b,
        });
    }
    Ok(acc)
}
