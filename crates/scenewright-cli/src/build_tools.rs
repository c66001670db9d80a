use std::path::Path;

use anyhow::{Context, Result};

use scenewright_build::{
    ingest, AssemblyOptions, Assembler, DirectoryResolver, IngestReport, PrefabLibrary,
    SceneGraph, SceneHandle,
};
use scenewright_core::SceneConfig;
use scenewright_ir::{AssetId, Manifest, ManifestStore};

pub fn load_library(path: &Path) -> Result<PrefabLibrary> {
    PrefabLibrary::load_from_file(path)
        .with_context(|| format!("failed to load prefab library: {}", path.display()))
}

/// Ingest each asset into its own fresh scene and store the descriptors.
pub fn ingest_assets(
    config: &SceneConfig,
    library: &PrefabLibrary,
    asset_ids: &[AssetId],
    store: &ManifestStore,
) -> Result<Vec<IngestReport>> {
    let resolver = DirectoryResolver::from_config(config);
    let mut reports = Vec::with_capacity(asset_ids.len());
    for asset_id in asset_ids {
        let mut graph = SceneGraph::with_library(library.clone());
        let report = ingest(&mut graph, &resolver, asset_id, &config.normalize)
            .with_context(|| format!("failed to ingest '{}'", asset_id))?;
        store
            .save_descriptor(&report.descriptor)
            .with_context(|| format!("failed to store descriptor for '{}'", asset_id))?;
        reports.push(report);
    }
    Ok(reports)
}

/// Assemble `manifest` into a fresh in-memory scene. Stored descriptors, if
/// any, name the wrapper roots and fix each asset's height.
pub fn rebuild(
    config: &SceneConfig,
    manifest: &Manifest,
    library: PrefabLibrary,
    options: AssemblyOptions,
    store: &ManifestStore,
) -> Result<(SceneGraph, SceneHandle)> {
    let descriptors = store
        .load_all_descriptors()
        .with_context(|| format!("failed to read descriptors in {}", store.dir().display()))?;
    let resolver = DirectoryResolver::from_config(config);
    let mut graph = SceneGraph::with_library(library);
    let handle = Assembler::new(options)
        .with_heights(config.normalize)
        .with_descriptors(&descriptors)
        .assemble(&mut graph, manifest, &resolver)
        .with_context(|| format!("failed to rebuild '{}'", manifest.scene_id))?;
    Ok((graph, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenewright_build::{HostEngine, PrefabNode};
    use scenewright_core::{Aabb, Vec3};
    use scenewright_plan::{plan, SceneIntent};

    fn library() -> PrefabLibrary {
        let mut lib = PrefabLibrary::new();
        lib.insert(
            "kid.glb",
            vec![PrefabNode::mesh(
                "Body",
                Aabb::new(Vec3::new(-0.2, -0.2, 0.0), Vec3::new(0.2, 0.2, 2.4)),
            )],
        )
        .insert(
            "ball.glb",
            vec![PrefabNode::mesh("Ball", Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)))],
        )
        .insert("court.glb", vec![PrefabNode::empty("Court")]);
        lib
    }

    fn temp_store(tag: &str) -> ManifestStore {
        ManifestStore::new(std::env::temp_dir().join(format!(
            "scenewright_cli_{}_{}",
            tag,
            std::process::id()
        )))
    }

    #[test]
    fn ingest_writes_descriptors() {
        let store = temp_store("ingest");
        let ids = vec![AssetId::new("kid_1"), AssetId::new("ball_1")];
        let reports = ingest_assets(&SceneConfig::default(), &library(), &ids, &store).unwrap();
        assert_eq!(reports.len(), 2);
        let kid = store.load_descriptor(&AssetId::new("kid_1")).unwrap();
        assert!((kid.height.unwrap() - 1.2).abs() < 1e-9);
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn rebuild_without_descriptors_uses_default_roots() {
        let store = temp_store("rebuild");
        let manifest = plan(&SceneIntent::new("move_actor", "kid", "ball", "court")).unwrap();
        let (graph, handle) = rebuild(
            &SceneConfig::default(),
            &manifest,
            library(),
            AssemblyOptions::default(),
            &store,
        )
        .unwrap();
        let kid = handle.root(&AssetId::new("kid_1")).unwrap();
        assert_eq!(graph.node_name(kid).unwrap(), "ASSET_KID_1");
        assert_eq!(graph.frame_range(), Some((1, 120)));
        // 2.4 authored, person height 1.2
        assert!(graph.scale(kid).unwrap().approx_eq(&Vec3::splat(0.5), 1e-12));
    }

    #[test]
    fn rebuild_matches_ingested_height() {
        let store = temp_store("rebuild_height");
        let config = SceneConfig::default();
        ingest_assets(&config, &library(), &[AssetId::new("kid_1")], &store).unwrap();
        let manifest = plan(&SceneIntent::new("static_scene", "kid", "ball", "court")).unwrap();
        let (graph, handle) =
            rebuild(&config, &manifest, library(), AssemblyOptions::default(), &store).unwrap();

        let kid = handle.root(&AssetId::new("kid_1")).unwrap();
        let descriptor = store.load_descriptor(&AssetId::new("kid_1")).unwrap();
        let height = scenewright_build::combined_bounds(&graph, kid).unwrap().unwrap().height();
        assert!((height - descriptor.height.unwrap()).abs() < 1e-9);
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn rebuild_error_names_scene() {
        let store = temp_store("rebuild_err");
        let manifest = plan(&SceneIntent::new("static_scene", "kid", "ball", "court")).unwrap();
        let err = rebuild(
            &SceneConfig::default(),
            &manifest,
            PrefabLibrary::new(),
            AssemblyOptions::default(),
            &store,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("failed to rebuild 'scene_auto'"));
    }
}
