/// Core error types for the SceneWright pipeline.
use std::path::PathBuf;

/// A specialized Result type for SceneWright operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// A malformed or inconsistent manifest. Every variant names the offending
/// field and, where one is involved, the asset-id.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("frame_start ({start}) must not exceed frame_end ({end})")]
    FrameRange { start: i64, end: i64 },

    #[error("animations[{index}].{field} references unknown asset '{asset_id}'")]
    UnknownAnimationAsset {
        index: usize,
        field: &'static str,
        asset_id: String,
    },

    #[error("attachments[{index}].{field} references unknown asset '{asset_id}'")]
    UnknownAttachmentAsset {
        index: usize,
        field: &'static str,
        asset_id: String,
    },

    #[error("attachments form a cycle through asset '{asset_id}': {}", .cycle.join(" -> "))]
    AttachmentCycle {
        asset_id: String,
        cycle: Vec<String>,
    },

    #[error("animations[{index}].frames ({start}, {end}) on asset '{asset_id}' must be strictly increasing")]
    FrameOrder {
        index: usize,
        asset_id: String,
        start: i64,
        end: i64,
    },

    #[error("animations[{index}].type '{kind}' is not a known directive")]
    UnknownDirective { index: usize, kind: String },

    #[error("animations[{index}] is malformed: {message}")]
    MalformedDirective { index: usize, message: String },
}

impl ValidationError {
    /// The manifest field the error points at.
    pub fn field(&self) -> String {
        match self {
            ValidationError::FrameRange { .. } => "frame_start".to_string(),
            ValidationError::UnknownAnimationAsset { index, field, .. } => {
                format!("animations[{}].{}", index, field)
            }
            ValidationError::UnknownAttachmentAsset { index, field, .. } => {
                format!("attachments[{}].{}", index, field)
            }
            ValidationError::AttachmentCycle { .. } => "attachments".to_string(),
            ValidationError::FrameOrder { index, .. } => format!("animations[{}].frames", index),
            ValidationError::UnknownDirective { index, .. } => {
                format!("animations[{}].type", index)
            }
            ValidationError::MalformedDirective { index, .. } => format!("animations[{}]", index),
        }
    }

    /// The asset-id involved, if any.
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            ValidationError::UnknownAnimationAsset { asset_id, .. }
            | ValidationError::UnknownAttachmentAsset { asset_id, .. }
            | ValidationError::AttachmentCycle { asset_id, .. }
            | ValidationError::FrameOrder { asset_id, .. } => Some(asset_id),
            _ => None,
        }
    }
}

/// Top-level error type encompassing all pipeline stages.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("manifest validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("unknown asset: '{0}' is not in the asset registry")]
    UnknownAsset(String),

    #[error("unknown scene type: '{0}'")]
    UnknownSceneType(String),

    #[error("layout has no position named '{0}'")]
    MissingLayout(String),

    #[error("could not resolve asset '{asset_id}': {reason}")]
    AssetResolution { asset_id: String, reason: String },

    #[error("unsupported asset format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("missing asset descriptor: {0}")]
    MissingDescriptor(String),

    #[error("host error: {0}")]
    Host(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SceneError {
    /// Create an asset resolution error.
    pub fn resolution(asset_id: impl Into<String>, reason: impl Into<String>) -> Self {
        SceneError::AssetResolution {
            asset_id: asset_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a host capability error.
    pub fn host(message: impl Into<String>) -> Self {
        SceneError::Host(message.into())
    }
}
