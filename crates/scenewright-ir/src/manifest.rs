use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scenewright_core::hash::{self, ContentHash};
use scenewright_core::{SceneResult, ValidationError, Vec3};

use crate::animation::{AnimationDirective, FrameSpan, KNOWN_DIRECTIVES};
use crate::asset::AssetId;

/// Suffix of persisted scene manifests: `<scene_id>.scene.json`.
pub const MANIFEST_SUFFIX: &str = ".scene.json";

/// Unique identifier for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

/// Where an asset root goes in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub location: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

impl Placement {
    pub fn at(location: Vec3) -> Self {
        Self {
            location,
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// `child` rigidly follows `parent` at a fixed `offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub child: AssetId,
    pub parent: AssetId,
    #[serde(default)]
    pub offset: Vec3,
}

impl Attachment {
    pub fn new(child: impl Into<AssetId>, parent: impl Into<AssetId>, offset: Vec3) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
            offset,
        }
    }
}

/// Where a parent link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    /// `animations[index]` is a `follow` directive.
    Follow(usize),
    /// `attachments[index]`.
    Attachment(usize),
}

/// A follower → target relationship, whether declared as a `follow`
/// directive or as an attachment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentLink<'a> {
    pub child: &'a AssetId,
    pub parent: &'a AssetId,
    pub offset: Vec3,
    pub source: LinkSource,
}

/// The persisted, portable description of a scene.
///
/// Once written a manifest is treated as immutable: the assembler only ever
/// borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub scene_id: SceneId,
    pub frame_start: i64,
    pub frame_end: i64,
    /// Placement per asset, ordered by asset-id so serialization is stable.
    pub assets: BTreeMap<AssetId, Placement>,
    #[serde(default)]
    pub animations: Vec<AnimationDirective>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Manifest {
    /// Create an empty manifest over the given frame range.
    pub fn new(scene_id: SceneId, frame_start: i64, frame_end: i64) -> Self {
        Self {
            scene_id,
            frame_start,
            frame_end,
            assets: BTreeMap::new(),
            animations: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Parse a manifest from JSON.
    ///
    /// Directive tags are checked before typed decoding so that an unknown
    /// `type` is reported as a validation error with its index.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        if let Some(animations) = value.get("animations").and_then(|a| a.as_array()) {
            for (index, raw) in animations.iter().enumerate() {
                let kind = match raw.get("type") {
                    Some(serde_json::Value::String(kind)) => kind,
                    Some(other) => {
                        return Err(ValidationError::MalformedDirective {
                            index,
                            message: format!("type must be a string, got {}", other),
                        }
                        .into())
                    }
                    None => {
                        return Err(ValidationError::MalformedDirective {
                            index,
                            message: "missing type".into(),
                        }
                        .into())
                    }
                };
                if !KNOWN_DIRECTIVES.contains(&kind.as_str()) {
                    return Err(ValidationError::UnknownDirective {
                        index,
                        kind: kind.clone(),
                    }
                    .into());
                }
                if let Err(e) = serde_json::from_value::<AnimationDirective>(raw.clone()) {
                    return Err(ValidationError::MalformedDirective {
                        index,
                        message: e.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Pretty JSON with two-space indentation, the persisted form.
    pub fn to_json_pretty(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA-256 over the compact JSON form.
    pub fn content_hash(&self) -> SceneResult<ContentHash> {
        Ok(hash::hash_json(self)?)
    }

    /// `<scene_id>.scene.json`
    pub fn file_name(&self) -> String {
        manifest_file_name(&self.scene_id)
    }

    pub fn frame_span(&self) -> FrameSpan {
        FrameSpan::new(self.frame_start, self.frame_end)
    }

    /// Inclusive frame count, saturating at `u64::MAX` for the full `i64` range.
    pub fn frame_count(&self) -> u64 {
        if self.frame_end < self.frame_start {
            return 0;
        }
        self.frame_end.abs_diff(self.frame_start).saturating_add(1)
    }

    pub fn placement(&self, id: &AssetId) -> Option<&Placement> {
        self.assets.get(id)
    }

    pub fn contains_asset(&self, id: &AssetId) -> bool {
        self.assets.contains_key(id)
    }

    /// Every parent link in application order: `follow` directives in
    /// animation order, then attachments.
    pub fn parent_links(&self) -> Vec<ParentLink<'_>> {
        let follows = self
            .animations
            .iter()
            .enumerate()
            .filter_map(|(i, anim)| match anim {
                AnimationDirective::Follow {
                    target,
                    follower,
                    offset,
                } => Some(ParentLink {
                    child: follower,
                    parent: target,
                    offset: *offset,
                    source: LinkSource::Follow(i),
                }),
                AnimationDirective::LinearMove { .. } => None,
            });
        let attachments = self
            .attachments
            .iter()
            .enumerate()
            .map(|(i, a)| ParentLink {
                child: &a.child,
                parent: &a.parent,
                offset: a.offset,
                source: LinkSource::Attachment(i),
            });
        follows.chain(attachments).collect()
    }
}

/// File name for a scene id: `<scene_id>.scene.json`.
pub fn manifest_file_name(scene_id: &SceneId) -> String {
    format!("{}{}", scene_id, MANIFEST_SUFFIX)
}
