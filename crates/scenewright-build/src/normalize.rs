//! Uniform rescaling of an asset to a canonical height.

use serde::{Deserialize, Serialize};

use scenewright_core::{NormalizeConfig, SceneError, SceneResult};
use scenewright_ir::AssetId;

use crate::bounds::combined_bounds;
use crate::host::{HostEngine, NodeId};

/// Factors this close to 1 leave the scale untouched.
const IDENTITY_EPSILON: f64 = 1e-9;

const PERSON_MARKERS: [&str; 6] = ["kid", "person", "human", "man", "woman", "child"];

/// Coarse asset classification used to pick a target height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Person,
    Ball,
    Terrain,
}

impl AssetCategory {
    /// Classify by asset-id. Anything unrecognized is terrain.
    pub fn classify(asset_id: &AssetId) -> Self {
        let id = asset_id.as_str().to_ascii_lowercase();
        if PERSON_MARKERS.iter().any(|m| id.contains(m)) {
            AssetCategory::Person
        } else if id.contains("ball") {
            AssetCategory::Ball
        } else {
            AssetCategory::Terrain
        }
    }

    pub fn target_height(&self, heights: &NormalizeConfig) -> f64 {
        match self {
            AssetCategory::Person => heights.person,
            AssetCategory::Ball => heights.ball,
            AssetCategory::Terrain => heights.terrain,
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetCategory::Person => write!(f, "person"),
            AssetCategory::Ball => write!(f, "ball"),
            AssetCategory::Terrain => write!(f, "terrain"),
        }
    }
}

/// What [`normalize`] did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NormalizeOutcome {
    /// The root scale was multiplied by `factor`; `height` is the height
    /// measured before scaling.
    Scaled { height: f64, factor: f64 },
    /// Already at the target height.
    AlreadyNormalized { height: f64 },
    /// No meshes, or a flat bounding box. Nothing was changed.
    Degenerate,
}

impl NormalizeOutcome {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, NormalizeOutcome::Degenerate)
    }
}

/// Scale `root` uniformly so the combined mesh height equals `target_height`.
pub fn normalize<H: HostEngine + ?Sized>(
    host: &mut H,
    root: NodeId,
    target_height: f64,
) -> SceneResult<NormalizeOutcome> {
    if !(target_height.is_finite() && target_height > 0.0) {
        return Err(SceneError::Config(format!(
            "target height must be positive, got {}",
            target_height
        )));
    }

    let height = match combined_bounds(&*host, root)? {
        Some(bounds) if bounds.height() > 0.0 => bounds.height(),
        _ => {
            tracing::warn!(
                "degenerate geometry under '{}': nothing to normalize",
                host.node_name(root)?
            );
            return Ok(NormalizeOutcome::Degenerate);
        }
    };

    let factor = target_height / height;
    if (factor - 1.0).abs() < IDENTITY_EPSILON {
        return Ok(NormalizeOutcome::AlreadyNormalized { height });
    }

    let scale = host.scale(root)?;
    host.set_scale(root, scale.scaled(factor))?;
    tracing::debug!(
        "normalized '{}': height {:.4} -> {:.4} (x{:.4})",
        host.node_name(root)?,
        height,
        target_height,
        factor
    );
    Ok(NormalizeOutcome::Scaled { height, factor })
}

/// Normalize to the canonical height for the asset's category.
pub fn normalize_asset<H: HostEngine + ?Sized>(
    host: &mut H,
    asset_id: &AssetId,
    root: NodeId,
    heights: &NormalizeConfig,
) -> SceneResult<NormalizeOutcome> {
    let category = AssetCategory::classify(asset_id);
    tracing::debug!("'{}' classified as {}", asset_id, category);
    normalize(host, root, category.target_height(heights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::combined_bounds;
    use crate::graph::{PrefabLibrary, PrefabNode, SceneGraph};
    use scenewright_core::{Aabb, Vec3};
    use scenewright_ir::AssetSource;

    fn graph_with(prefab: PrefabNode) -> (SceneGraph, NodeId) {
        let mut lib = PrefabLibrary::new();
        lib.insert("asset.glb", vec![prefab]);
        let mut graph = SceneGraph::with_library(lib);
        graph.import(&AssetSource::from_path("asset.glb").unwrap()).unwrap();
        let root = graph.scene_roots()[0];
        (graph, root)
    }

    fn tall_kid() -> PrefabNode {
        PrefabNode::empty("Kid").with_child(PrefabNode::mesh(
            "Body",
            Aabb::new(Vec3::new(-0.2, -0.2, 0.0), Vec3::new(0.2, 0.2, 1.8)),
        ))
    }

    #[test]
    fn test_classify() {
        assert_eq!(AssetCategory::classify(&"kid_1".into()), AssetCategory::Person);
        assert_eq!(AssetCategory::classify(&"Woman_03".into()), AssetCategory::Person);
        assert_eq!(AssetCategory::classify(&"ball_1".into()), AssetCategory::Ball);
        assert_eq!(AssetCategory::classify(&"court_1".into()), AssetCategory::Terrain);
    }

    #[test]
    fn test_scales_to_target_height() {
        let (mut graph, root) = graph_with(tall_kid());
        let outcome = normalize(&mut graph, root, 1.2).unwrap();
        match outcome {
            NormalizeOutcome::Scaled { height, factor } => {
                assert!((height - 1.8).abs() < 1e-12);
                assert!((factor - 1.2 / 1.8).abs() < 1e-12);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let h = combined_bounds(&graph, root).unwrap().unwrap().height();
        assert!((h - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let (mut graph, root) = graph_with(tall_kid());
        normalize(&mut graph, root, 1.2).unwrap();
        let scale = graph.scale(root).unwrap();
        let second = normalize(&mut graph, root, 1.2).unwrap();
        assert!(matches!(second, NormalizeOutcome::AlreadyNormalized { .. }));
        assert_eq!(graph.scale(root).unwrap(), scale);
    }

    #[test]
    fn test_multiplies_existing_scale() {
        let (mut graph, root) = graph_with(tall_kid().with_scale(Vec3::new(2.0, 2.0, 2.0)));
        normalize(&mut graph, root, 1.8).unwrap();
        assert!(graph.scale(root).unwrap().approx_eq(&Vec3::ONE, 1e-12));
    }

    #[test]
    fn test_no_meshes_is_noop() {
        let (mut graph, root) = graph_with(PrefabNode::empty("Rig").with_child(PrefabNode::armature("Bones")));
        let outcome = normalize(&mut graph, root, 1.2).unwrap();
        assert!(outcome.is_degenerate());
        assert_eq!(graph.scale(root).unwrap(), Vec3::ONE);
    }

    #[test]
    fn test_flat_mesh_is_noop() {
        let (mut graph, root) = graph_with(PrefabNode::empty("Court").with_child(PrefabNode::mesh(
            "Floor",
            Aabb::new(Vec3::new(-14.0, -7.5, 0.0), Vec3::new(14.0, 7.5, 0.0)),
        )));
        let outcome = normalize(&mut graph, root, 10.0).unwrap();
        assert_eq!(outcome, NormalizeOutcome::Degenerate);
        assert_eq!(graph.scale(root).unwrap(), Vec3::ONE);
    }

    #[test]
    fn test_rejects_non_positive_target() {
        let (mut graph, root) = graph_with(tall_kid());
        assert!(normalize(&mut graph, root, 0.0).is_err());
    }

    #[test]
    fn test_normalize_asset_uses_category_height() {
        let (mut graph, root) = graph_with(tall_kid());
        let outcome = normalize_asset(&mut graph, &"ball_9".into(), root, &NormalizeConfig::default()).unwrap();
        assert!(matches!(outcome, NormalizeOutcome::Scaled { .. }));
        let h = combined_bounds(&graph, root).unwrap().unwrap().height();
        assert!((h - 0.24).abs() < 1e-9);
    }
}
