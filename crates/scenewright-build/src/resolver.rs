//! Asset-id → importable file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use scenewright_core::{SceneConfig, SceneError, SceneResult};
use scenewright_ir::{AssetId, AssetSource};

/// Maps an asset-id to something the host can import.
pub trait AssetResolver {
    fn resolve(&self, asset_id: &AssetId) -> SceneResult<AssetSource>;
}

impl<F> AssetResolver for F
where
    F: Fn(&AssetId) -> SceneResult<AssetSource>,
{
    fn resolve(&self, asset_id: &AssetId) -> SceneResult<AssetSource> {
        self(asset_id)
    }
}

/// Resolves through a fixed file table rooted at an assets directory.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
    files: BTreeMap<AssetId, PathBuf>,
    verify_files: bool,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: BTreeMap::new(),
            verify_files: false,
        }
    }

    /// Built from `[paths].assets_root` and the `[assets]` table.
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut resolver = Self::new(&config.paths.assets_root).verify_files(config.assets.verify_files);
        for (id, file) in &config.assets.files {
            resolver.register(id.as_str(), file);
        }
        resolver
    }

    /// Require resolved files to exist on disk.
    pub fn verify_files(mut self, verify: bool) -> Self {
        self.verify_files = verify;
        self
    }

    pub fn register(&mut self, asset_id: impl Into<AssetId>, file: impl Into<PathBuf>) -> &mut Self {
        self.files.insert(asset_id.into(), file.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn asset_ids(&self) -> impl Iterator<Item = &AssetId> {
        self.files.keys()
    }
}

impl AssetResolver for DirectoryResolver {
    fn resolve(&self, asset_id: &AssetId) -> SceneResult<AssetSource> {
        let file = self
            .files
            .get(asset_id)
            .ok_or_else(|| SceneError::resolution(asset_id.as_str(), "no file registered"))?;
        let path = self.root.join(file);
        if self.verify_files && !path.is_file() {
            return Err(SceneError::resolution(
                asset_id.as_str(),
                format!("file not found: {}", path.display()),
            ));
        }
        AssetSource::from_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenewright_ir::AssetSourceKind;

    #[test]
    fn test_resolves_from_table() {
        let resolver = DirectoryResolver::from_config(&SceneConfig::default());
        let source = resolver.resolve(&AssetId::new("kid_1")).unwrap();
        assert_eq!(source.path, Path::new("assets").join("kid.glb"));
        assert_eq!(source.kind, AssetSourceKind::Gltf);
    }

    #[test]
    fn test_unregistered_asset_names_id() {
        let resolver = DirectoryResolver::new("assets");
        let err = resolver.resolve(&AssetId::new("dog_1")).unwrap_err();
        assert!(matches!(
            err,
            SceneError::AssetResolution { ref asset_id, .. } if asset_id == "dog_1"
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let mut resolver = DirectoryResolver::new("assets");
        resolver.register("tree_1", "tree.obj");
        assert!(matches!(
            resolver.resolve(&AssetId::new("tree_1")),
            Err(SceneError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_verify_files() {
        let dir = std::env::temp_dir().join(format!("scenewright_resolver_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("ball.fbx"), b"").unwrap();

        let mut resolver = DirectoryResolver::new(&dir).verify_files(true);
        resolver.register("ball_1", "ball.fbx").register("kid_1", "kid.glb");
        assert_eq!(
            resolver.resolve(&AssetId::new("ball_1")).unwrap().kind,
            AssetSourceKind::Fbx
        );
        assert!(resolver.resolve(&AssetId::new("kid_1")).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |id: &AssetId| AssetSource::from_path(format!("lib/{}.gltf", id));
        let source = resolver.resolve(&AssetId::new("court_1")).unwrap();
        assert_eq!(source.path, Path::new("lib/court_1.gltf"));
    }
}
