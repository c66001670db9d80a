use serde::{Deserialize, Serialize};

use scenewright_core::Vec3;

use crate::asset::AssetId;

/// Directive kinds a manifest may contain, by their JSON `type` tag.
pub const KNOWN_DIRECTIVES: &[&str] = &["linear_move", "follow"];

/// An inclusive `(first, last)` frame pair. Serialized as `[f1, f2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSpan(pub i64, pub i64);

impl FrameSpan {
    pub fn new(start: i64, end: i64) -> Self {
        Self(start, end)
    }

    pub fn start(&self) -> i64 {
        self.0
    }

    pub fn end(&self) -> i64 {
        self.1
    }

    pub fn is_increasing(&self) -> bool {
        self.0 < self.1
    }
}

/// A location sample to be keyed on an asset root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationKey {
    pub frame: i64,
    pub location: Vec3,
}

/// One animation instruction. Order within a manifest matters: later
/// directives on the same asset override or extend earlier keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationDirective {
    /// Key `start` at the first frame and `end` at the last.
    LinearMove {
        asset_id: AssetId,
        start: Vec3,
        end: Vec3,
        frames: FrameSpan,
    },
    /// Rigidly parent `follower` to `target`; not keyframed.
    Follow {
        target: AssetId,
        follower: AssetId,
        #[serde(default)]
        offset: Vec3,
    },
}

impl AnimationDirective {
    pub fn linear_move(asset_id: impl Into<AssetId>, start: Vec3, end: Vec3, frames: FrameSpan) -> Self {
        AnimationDirective::LinearMove {
            asset_id: asset_id.into(),
            start,
            end,
            frames,
        }
    }

    pub fn follow(target: impl Into<AssetId>, follower: impl Into<AssetId>) -> Self {
        AnimationDirective::Follow {
            target: target.into(),
            follower: follower.into(),
            offset: Vec3::ZERO,
        }
    }

    /// The JSON `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            AnimationDirective::LinearMove { .. } => "linear_move",
            AnimationDirective::Follow { .. } => "follow",
        }
    }

    /// Every asset reference, paired with the field that holds it.
    pub fn asset_refs(&self) -> Vec<(&'static str, &AssetId)> {
        match self {
            AnimationDirective::LinearMove { asset_id, .. } => vec![("asset_id", asset_id)],
            AnimationDirective::Follow {
                target, follower, ..
            } => vec![("target", target), ("follower", follower)],
        }
    }

    /// The two samples a `linear_move` inserts; `None` for `follow`.
    pub fn location_keys(&self) -> Option<[LocationKey; 2]> {
        match self {
            AnimationDirective::LinearMove {
                start, end, frames, ..
            } => Some([
                LocationKey {
                    frame: frames.start(),
                    location: *start,
                },
                LocationKey {
                    frame: frames.end(),
                    location: *end,
                },
            ]),
            AnimationDirective::Follow { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_move_json_shape() {
        let anim = AnimationDirective::linear_move(
            "kid_1",
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            FrameSpan::new(1, 120),
        );
        let json = serde_json::to_value(&anim).unwrap();
        assert_eq!(json["type"], "linear_move");
        assert_eq!(json["asset_id"], "kid_1");
        assert_eq!(json["frames"], serde_json::json!([1, 120]));
        assert_eq!(json["end"], serde_json::json!([3.0, 0.0, 0.0]));
    }

    #[test]
    fn test_follow_offset_defaults_to_zero() {
        let anim: AnimationDirective =
            serde_json::from_str(r#"{"type": "follow", "target": "kid_1", "follower": "ball_1"}"#)
                .unwrap();
        assert_eq!(anim, AnimationDirective::follow("kid_1", "ball_1"));
        assert_eq!(anim.kind(), "follow");
        assert!(anim.location_keys().is_none());
    }

    #[test]
    fn test_asset_refs_name_fields() {
        let anim = AnimationDirective::follow("kid_1", "ball_1");
        let refs: Vec<_> = anim
            .asset_refs()
            .into_iter()
            .map(|(field, id)| (field, id.as_str().to_string()))
            .collect();
        assert_eq!(
            refs,
            vec![("target", "kid_1".to_string()), ("follower", "ball_1".to_string())]
        );
    }

    #[test]
    fn test_location_keys() {
        let anim = AnimationDirective::linear_move(
            "kid_1",
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            FrameSpan::new(1, 120),
        );
        let keys = anim.location_keys().unwrap();
        assert_eq!(keys[0].frame, 1);
        assert_eq!(keys[1].location, Vec3::new(3.0, 0.0, 0.0));
    }
}
