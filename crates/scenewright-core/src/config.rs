use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::math::Vec3;
use crate::types::{FollowMode, ResolutionPolicy};

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "scenewright.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    pub assets_root: PathBuf,
    pub manifests_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("assets"),
            manifests_dir: PathBuf::from("assets").join("manifests"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetFilesConfig {
    /// Require each resolved file to exist on disk.
    pub verify_files: bool,
    /// asset-id → file name, relative to `paths.assets_root`.
    pub files: BTreeMap<String, String>,
}

impl Default for AssetFilesConfig {
    fn default() -> Self {
        let files = [
            ("kid_1", "kid.glb"),
            ("ball_1", "ball.glb"),
            ("court_1", "court.glb"),
        ]
        .into_iter()
        .map(|(id, file)| (id.to_string(), file.to_string()))
        .collect();
        Self {
            verify_files: false,
            files,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub scene_id: String,
    pub frame_start: i64,
    pub frame_end: i64,
    /// Extra or overriding logical name → asset-id entries.
    pub registry: BTreeMap<String, String>,
    /// Extra or overriding named layout positions.
    pub layout: BTreeMap<String, Vec3>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            scene_id: "scene_auto".to_string(),
            frame_start: 1,
            frame_end: 120,
            registry: BTreeMap::new(),
            layout: BTreeMap::new(),
        }
    }
}

/// Canonical heights, in meters, per asset category.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub person: f64,
    pub ball: f64,
    pub terrain: f64,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            person: 1.2,
            ball: 0.24,
            terrain: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub resolution: ResolutionPolicy,
    pub follow: FollowMode,
    /// Rescale imported assets to their descriptor (or category) height.
    pub normalize: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            resolution: ResolutionPolicy::default(),
            follow: FollowMode::default(),
            normalize: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SceneConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub assets: AssetFilesConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub assembly: AssemblyConfig,
}

impl SceneConfig {
    pub fn load_from_file(path: &Path) -> SceneResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> SceneResult<Self> {
        toml::from_str(contents).map_err(|e| SceneError::Config(e.to_string()))
    }

    pub fn save_to_file(&self, path: &Path) -> SceneResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| SceneError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load `path` if given, else `scenewright.toml` in the working directory
    /// when it exists, else the defaults.
    pub fn discover(path: Option<&Path>) -> SceneResult<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::load_from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.paths.manifests_dir, Path::new("assets/manifests"));
        assert_eq!(config.assets.files["ball_1"], "ball.glb");
        assert_eq!(config.planner.frame_start, 1);
        assert_eq!(config.planner.frame_end, 120);
        assert!((config.normalize.person - 1.2).abs() < 1e-12);
        assert_eq!(config.assembly.resolution, ResolutionPolicy::FailFast);
        assert!(config.assembly.normalize);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SceneConfig::from_toml_str(
            r#"
[assembly]
resolution = "best_effort"
follow = "snapshot"

[planner]
scene_id = "kid_playing_ball"
frame_start = 10
frame_end = 90

[planner.layout]
move_target = [5.0, 0.0, 0.0]
"#,
        )
        .unwrap();
        assert_eq!(config.assembly.resolution, ResolutionPolicy::BestEffort);
        assert_eq!(config.assembly.follow, FollowMode::Snapshot);
        assert!(config.assembly.normalize);
        assert_eq!(config.planner.scene_id, "kid_playing_ball");
        assert_eq!(config.planner.layout["move_target"], Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(config.assets.files.len(), 3);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = SceneConfig::from_toml_str("[assembly]\nresolution = \"sometimes\"").unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "scenewright_config_{}.toml",
            std::process::id()
        ));
        let mut config = SceneConfig::default();
        config.normalize.ball = 0.3;
        config.save_to_file(&path).unwrap();
        let loaded = SceneConfig::load_from_file(&path).unwrap();
        assert!((loaded.normalize.ball - 0.3).abs() < 1e-12);
        let _ = std::fs::remove_file(&path);
    }
}
