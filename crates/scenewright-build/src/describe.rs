use scenewright_core::SceneResult;
use scenewright_ir::{AssetDescriptor, AssetId, DescriptorWarning};

use crate::bounds::{descendants, mesh_bounds};
use crate::host::{HostEngine, NodeId, NodeKind};

/// Read-only summary of the asset under `root`.
pub fn describe<H: HostEngine + ?Sized>(
    host: &H,
    asset_id: &AssetId,
    root: NodeId,
) -> SceneResult<AssetDescriptor> {
    let nodes = descendants(host, root)?;

    let mut mesh_ids = Vec::new();
    let mut meshes = Vec::new();
    let mut armatures = Vec::new();
    for &node in &nodes {
        match host.node_kind(node)? {
            NodeKind::Mesh => {
                mesh_ids.push(node);
                meshes.push(host.node_name(node)?);
            }
            NodeKind::Armature => armatures.push(host.node_name(node)?),
            NodeKind::Empty | NodeKind::Other => {}
        }
    }

    let height = mesh_bounds(host, &mesh_ids)?.map(|b| b.height());
    let mut warnings = Vec::new();
    if height == Some(0.0) {
        tracing::warn!("asset '{}' has flat geometry (height 0)", asset_id);
        warnings.push(DescriptorWarning::DegenerateGeometry);
    }

    Ok(AssetDescriptor {
        asset_id: asset_id.clone(),
        root_object_name: host.node_name(root)?,
        mesh_count: meshes.len(),
        meshes,
        has_armature: !armatures.is_empty(),
        armatures,
        height,
        object_count: nodes.len(),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{PrefabLibrary, PrefabNode, SceneGraph};
    use scenewright_core::{Aabb, Vec3};
    use scenewright_ir::AssetSource;

    fn import(prefab: PrefabNode) -> (SceneGraph, NodeId) {
        let mut lib = PrefabLibrary::new();
        lib.insert("asset.glb", vec![prefab]);
        let mut graph = SceneGraph::with_library(lib);
        graph.import(&AssetSource::from_path("asset.glb").unwrap()).unwrap();
        let root = graph.scene_roots()[0];
        (graph, root)
    }

    #[test]
    fn test_describe_rigged_character() {
        let (graph, root) = import(
            PrefabNode::empty("ASSET_KID_1").with_child(
                PrefabNode::armature("Armature")
                    .with_child(PrefabNode::mesh(
                        "Body",
                        Aabb::new(Vec3::new(-0.2, -0.2, 0.0), Vec3::new(0.2, 0.2, 1.1)),
                    ))
                    .with_child(PrefabNode::mesh(
                        "Hair",
                        Aabb::new(Vec3::new(-0.1, -0.1, 1.0), Vec3::new(0.1, 0.1, 1.2)),
                    )),
            ),
        );
        let d = describe(&graph, &"kid_1".into(), root).unwrap();
        assert_eq!(d.root_object_name, "ASSET_KID_1");
        assert_eq!(d.meshes, vec!["Body", "Hair"]);
        assert_eq!(d.mesh_count, 2);
        assert!(d.has_armature);
        assert_eq!(d.armatures, vec!["Armature"]);
        assert!((d.height.unwrap() - 1.2).abs() < 1e-12);
        assert_eq!(d.object_count, 3);
        assert!(d.warnings.is_empty());
    }

    #[test]
    fn test_height_absent_without_meshes() {
        let (graph, root) = import(PrefabNode::empty("Rig").with_child(PrefabNode::armature("Bones")));
        let d = describe(&graph, &"rig_1".into(), root).unwrap();
        assert_eq!(d.height, None);
        assert_eq!(d.mesh_count, 0);
        assert!(!d.is_degenerate());
    }

    #[test]
    fn test_flat_mesh_is_flagged() {
        let (graph, root) = import(PrefabNode::empty("Court").with_child(PrefabNode::mesh(
            "Floor",
            Aabb::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)),
        )));
        let d = describe(&graph, &"court_1".into(), root).unwrap();
        assert_eq!(d.height, Some(0.0));
        assert!(d.is_degenerate());
    }

    #[test]
    fn test_describe_is_read_only() {
        let (graph, root) = import(PrefabNode::empty("Ball").with_child(PrefabNode::mesh(
            "Sphere",
            Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
        )));
        let before = graph.snapshot();
        describe(&graph, &"ball_1".into(), root).unwrap();
        assert_eq!(graph.snapshot(), before);
    }
}
