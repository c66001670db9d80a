use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scenewright_core::{SceneError, SceneResult, ValidationError, Vec3};
use scenewright_ir::{
    AnimationDirective, AssetDescriptor, AssetId, Attachment, FrameSpan, Manifest, ManifestBuilder,
    ManifestStore,
};

const GRID_COLUMNS: usize = 3;
const GRID_SPACING: f64 = 2.0;
const DEFAULT_FRAMES: FrameSpan = FrameSpan(1, 120);

/// A hand-written scene description: explicit objects and animations, with
/// positions optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    pub scene: String,
    pub objects: Vec<SpecObject>,
    #[serde(default)]
    pub animations: Vec<SpecAnimation>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecObject {
    pub asset: AssetId,
    #[serde(default)]
    pub position: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecAnimation {
    pub asset: AssetId,
    #[serde(rename = "type")]
    pub kind: String,
    pub start: Vec3,
    pub end: Vec3,
    #[serde(default)]
    pub frames: Option<FrameSpan>,
}

impl SceneSpec {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Somewhere stored asset descriptors can be looked up.
pub trait DescriptorSource {
    fn descriptor(&self, asset_id: &AssetId) -> SceneResult<AssetDescriptor>;
}

impl DescriptorSource for ManifestStore {
    fn descriptor(&self, asset_id: &AssetId) -> SceneResult<AssetDescriptor> {
        self.load_descriptor(asset_id)
    }
}

impl DescriptorSource for BTreeMap<AssetId, AssetDescriptor> {
    fn descriptor(&self, asset_id: &AssetId) -> SceneResult<AssetDescriptor> {
        self.get(asset_id)
            .cloned()
            .ok_or_else(|| SceneError::MissingDescriptor(asset_id.to_string()))
    }
}

/// Grid slot for the `index`-th object: three columns, two meters apart.
pub fn auto_place(index: usize) -> Vec3 {
    let row = (index / GRID_COLUMNS) as f64;
    let col = (index % GRID_COLUMNS) as f64;
    Vec3::new(col * GRID_SPACING, row * GRID_SPACING, 0.0)
}

/// Build a validated manifest from a scene spec. Every object must already
/// have a descriptor.
pub fn compose(spec: &SceneSpec, descriptors: &impl DescriptorSource) -> SceneResult<Manifest> {
    let mut builder = ManifestBuilder::new(&*spec.scene, DEFAULT_FRAMES.start(), DEFAULT_FRAMES.end());

    for (index, object) in spec.objects.iter().enumerate() {
        descriptors.descriptor(&object.asset)?;
        let location = object.position.unwrap_or_else(|| auto_place(index));
        builder.place_at(object.asset.clone(), location);
    }

    for (index, anim) in spec.animations.iter().enumerate() {
        if anim.kind != "linear_move" {
            return Err(ValidationError::UnknownDirective {
                index,
                kind: anim.kind.clone(),
            }
            .into());
        }
        builder.animate(AnimationDirective::linear_move(
            anim.asset.clone(),
            anim.start,
            anim.end,
            anim.frames.unwrap_or(DEFAULT_FRAMES),
        ));
    }

    for attachment in &spec.attachments {
        builder.attach(
            attachment.child.clone(),
            attachment.parent.clone(),
            attachment.offset,
        );
    }

    let manifest = builder.build()?;
    tracing::info!(
        "composed '{}' from {} objects",
        manifest.scene_id,
        spec.objects.len()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> AssetDescriptor {
        AssetDescriptor {
            asset_id: AssetId::new(id),
            root_object_name: format!("ASSET_{}", id.to_uppercase()),
            meshes: vec![],
            mesh_count: 0,
            has_armature: false,
            armatures: vec![],
            height: None,
            object_count: 0,
            warnings: vec![],
        }
    }

    fn descriptors() -> BTreeMap<AssetId, AssetDescriptor> {
        ["court_1", "kid_1", "ball_1"]
            .into_iter()
            .map(|id| (AssetId::new(id), descriptor(id)))
            .collect()
    }

    const KID_PLAYING_BALL: &str = r#"{
        "scene": "kid_playing_ball",
        "objects": [
            {"asset": "court_1", "position": [0, 0, 0]},
            {"asset": "kid_1"},
            {"asset": "ball_1"}
        ],
        "animations": [
            {"asset": "kid_1", "type": "linear_move", "start": [0, 0, 0], "end": [3, 0, 0]}
        ],
        "attachments": [
            {"child": "ball_1", "parent": "kid_1", "offset": [0.3, 0, 1]}
        ]
    }"#;

    #[test]
    fn test_auto_place_grid() {
        assert_eq!(auto_place(0), Vec3::ZERO);
        assert_eq!(auto_place(2), Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(auto_place(4), Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_compose_kid_playing_ball() {
        let spec = SceneSpec::from_json(KID_PLAYING_BALL).unwrap();
        let m = compose(&spec, &descriptors()).unwrap();
        assert_eq!(m.scene_id.as_str(), "kid_playing_ball");
        assert_eq!((m.frame_start, m.frame_end), (1, 120));
        assert_eq!(m.placement(&"court_1".into()).unwrap().location, Vec3::ZERO);
        assert_eq!(
            m.placement(&"kid_1".into()).unwrap().location,
            Vec3::new(2.0, 0.0, 0.0)
        );
        assert_eq!(
            m.placement(&"ball_1".into()).unwrap().location,
            Vec3::new(4.0, 0.0, 0.0)
        );
        assert_eq!(m.animations[0].location_keys().unwrap()[1].frame, 120);
        assert_eq!(m.attachments.len(), 1);
    }

    #[test]
    fn test_missing_descriptor() {
        let spec = SceneSpec::from_json(KID_PLAYING_BALL).unwrap();
        let mut known = descriptors();
        known.remove(&AssetId::new("ball_1"));
        let err = compose(&spec, &known).unwrap_err();
        assert!(matches!(err, SceneError::MissingDescriptor(id) if id == "ball_1"));
    }

    #[test]
    fn test_unsupported_animation_kind() {
        let mut spec = SceneSpec::from_json(KID_PLAYING_BALL).unwrap();
        spec.animations[0].kind = "bounce".into();
        let err = compose(&spec, &descriptors()).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Validation(ValidationError::UnknownDirective { index: 0, .. })
        ));
    }

    #[test]
    fn test_composed_manifest_is_validated() {
        let mut spec = SceneSpec::from_json(KID_PLAYING_BALL).unwrap();
        spec.animations[0].frames = Some(FrameSpan::new(50, 10));
        let err = compose(&spec, &descriptors()).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Validation(ValidationError::FrameOrder { .. })
        ));
    }

    #[test]
    fn test_descriptors_from_store() {
        let dir = std::env::temp_dir().join(format!("scenewright_compose_{}", std::process::id()));
        let store = ManifestStore::new(&dir);
        for d in descriptors().values() {
            store.save_descriptor(d).unwrap();
        }
        let spec = SceneSpec::from_json(KID_PLAYING_BALL).unwrap();
        assert!(compose(&spec, &store).is_ok());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
