//! # scenewright-ir
//!
//! The scene manifest: the portable, versionless description that sits
//! between planning and assembly. A manifest names the assets in a scene,
//! where they go, how they move, and what follows what.
//!
//! Planners produce manifests; the assembler consumes them. Nothing else
//! crosses that boundary.

pub mod animation;
pub mod asset;
pub mod builder;
pub mod manifest;
pub mod store;
pub mod validate;

pub use animation::{AnimationDirective, FrameSpan, LocationKey};
pub use asset::{AssetDescriptor, AssetId, AssetSource, AssetSourceKind, DescriptorWarning};
pub use builder::ManifestBuilder;
pub use manifest::{Attachment, LinkSource, Manifest, ParentLink, Placement, SceneId};
pub use store::ManifestStore;
pub use validate::validate_manifest;
