use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use scenewright_core::{SceneError, SceneResult};

/// Unique identifier for an asset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The interchange format of an importable asset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSourceKind {
    /// glTF, either binary (`.glb`) or text (`.gltf`).
    Gltf,
    Fbx,
}

impl AssetSourceKind {
    /// Classify a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> SceneResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "glb" | "gltf" => Ok(AssetSourceKind::Gltf),
            "fbx" => Ok(AssetSourceKind::Fbx),
            _ => Err(SceneError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl std::fmt::Display for AssetSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetSourceKind::Gltf => write!(f, "gltf"),
            AssetSourceKind::Fbx => write!(f, "fbx"),
        }
    }
}

/// Something the host can import: a path and its already-resolved format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSource {
    pub path: PathBuf,
    pub kind: AssetSourceKind,
}

impl AssetSource {
    pub fn new(path: impl Into<PathBuf>, kind: AssetSourceKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Build a source, deciding the format from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> SceneResult<Self> {
        let path = path.into();
        let kind = AssetSourceKind::from_path(&path)?;
        Ok(Self { path, kind })
    }
}

/// A non-fatal finding recorded on a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorWarning {
    /// Meshes exist but their combined bounding box has zero height.
    DegenerateGeometry,
}

/// Metadata about a normalized asset, persisted as `<asset_id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub asset_id: AssetId,
    /// Name of the wrapper node every imported object hangs under.
    #[serde(alias = "root_object")]
    pub root_object_name: String,
    pub meshes: Vec<String>,
    pub mesh_count: usize,
    pub has_armature: bool,
    pub armatures: Vec<String>,
    /// World-space height; `None` when the asset has no mesh geometry.
    pub height: Option<f64>,
    pub object_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DescriptorWarning>,
}

impl AssetDescriptor {
    pub fn is_degenerate(&self) -> bool {
        self.warnings.contains(&DescriptorWarning::DegenerateGeometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_extension() {
        assert_eq!(
            AssetSourceKind::from_path(Path::new("assets/kid.FBX")).unwrap(),
            AssetSourceKind::Fbx
        );
        assert_eq!(
            AssetSourceKind::from_path(Path::new("ball.glb")).unwrap(),
            AssetSourceKind::Gltf
        );
        assert_eq!(
            AssetSourceKind::from_path(Path::new("court.gltf")).unwrap(),
            AssetSourceKind::Gltf
        );
    }

    #[test]
    fn test_source_kind_rejects_unknown() {
        let err = AssetSourceKind::from_path(Path::new("court.obj")).unwrap_err();
        assert!(matches!(err, SceneError::UnsupportedFormat(p) if p == Path::new("court.obj")));
        assert!(AssetSource::from_path("no_extension").is_err());
    }

    #[test]
    fn test_descriptor_json_shape() {
        let descriptor = AssetDescriptor {
            asset_id: AssetId::new("empty_1"),
            root_object_name: "ASSET_EMPTY_1".into(),
            meshes: vec![],
            mesh_count: 0,
            has_armature: false,
            armatures: vec![],
            height: None,
            object_count: 0,
            warnings: vec![],
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["asset_id"], "empty_1");
        assert_eq!(json["root_object_name"], "ASSET_EMPTY_1");
        assert!(json["height"].is_null());
        assert!(json.get("warnings").is_none());
    }
}
