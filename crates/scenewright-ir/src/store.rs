//! On-disk layout for manifests and descriptors.
//!
//! Everything lives in one directory: scene manifests as
//! `<scene_id>.scene.json` and asset descriptors as `<asset_id>.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use scenewright_core::{SceneError, SceneResult};

use crate::asset::{AssetDescriptor, AssetId};
use crate::manifest::{manifest_file_name, Manifest, SceneId, MANIFEST_SUFFIX};

#[derive(Debug, Clone)]
pub struct ManifestStore {
    dir: PathBuf,
}

impl ManifestStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self, scene_id: &SceneId) -> PathBuf {
        self.dir.join(manifest_file_name(scene_id))
    }

    pub fn descriptor_path(&self, asset_id: &AssetId) -> PathBuf {
        self.dir.join(format!("{}.json", asset_id))
    }

    /// Write a manifest, creating the directory if needed. Returns the path.
    pub fn save_manifest(&self, manifest: &Manifest) -> SceneResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.manifest_path(&manifest.scene_id);
        std::fs::write(&path, manifest.to_json_pretty()?)?;
        tracing::info!("scene manifest written: {}", path.display());
        Ok(path)
    }

    pub fn load_manifest(&self, scene_id: &SceneId) -> SceneResult<Manifest> {
        load_manifest_file(&self.manifest_path(scene_id))
    }

    pub fn save_descriptor(&self, descriptor: &AssetDescriptor) -> SceneResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.descriptor_path(&descriptor.asset_id);
        std::fs::write(&path, serde_json::to_string_pretty(descriptor)?)?;
        tracing::info!("asset descriptor written: {}", path.display());
        Ok(path)
    }

    pub fn load_descriptor(&self, asset_id: &AssetId) -> SceneResult<AssetDescriptor> {
        let path = self.descriptor_path(asset_id);
        if !path.exists() {
            return Err(SceneError::MissingDescriptor(asset_id.to_string()));
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Every descriptor in the directory, keyed by asset-id. Scene manifests
    /// and unreadable files are skipped.
    pub fn load_all_descriptors(&self) -> SceneResult<BTreeMap<AssetId, AssetDescriptor>> {
        let mut out = BTreeMap::new();
        if !self.dir.exists() {
            return Ok(out);
        }
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if !name.ends_with(".json") || name.ends_with(MANIFEST_SUFFIX) {
                continue;
            }
            let contents = match std::fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    tracing::debug!("skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<AssetDescriptor>(&contents) {
                Ok(descriptor) => {
                    out.insert(descriptor.asset_id.clone(), descriptor);
                }
                Err(e) => tracing::debug!("skipping {}: {}", path.display(), e),
            }
        }
        Ok(out)
    }
}

/// Read and parse a manifest from an arbitrary path.
pub fn load_manifest_file(path: &Path) -> SceneResult<Manifest> {
    let contents = std::fs::read_to_string(path)?;
    Manifest::from_json(&contents)
}
