use scenewright_core::{SceneResult, Vec3};

use crate::animation::{AnimationDirective, FrameSpan};
use crate::asset::AssetId;
use crate::manifest::{Attachment, Manifest, Placement, SceneId};
use crate::validate::validate_manifest;

/// A builder for constructing a Manifest programmatically.
/// Used by the planner and composer, and handy in tests.
pub struct ManifestBuilder {
    manifest: Manifest,
}

impl ManifestBuilder {
    pub fn new(scene_id: impl Into<String>, frame_start: i64, frame_end: i64) -> Self {
        Self {
            manifest: Manifest::new(SceneId::new(scene_id), frame_start, frame_end),
        }
    }

    /// Place an asset. Placing the same id twice keeps the later placement.
    pub fn place(&mut self, id: impl Into<AssetId>, placement: Placement) -> &mut Self {
        self.manifest.assets.insert(id.into(), placement);
        self
    }

    /// Place an asset at `location` with unit scale.
    pub fn place_at(&mut self, id: impl Into<AssetId>, location: Vec3) -> &mut Self {
        self.place(id, Placement::at(location))
    }

    /// Append an animation directive. Order is preserved.
    pub fn animate(&mut self, directive: AnimationDirective) -> &mut Self {
        self.manifest.animations.push(directive);
        self
    }

    /// Append a `linear_move` spanning `frames`.
    pub fn linear_move(
        &mut self,
        id: impl Into<AssetId>,
        start: Vec3,
        end: Vec3,
        frames: FrameSpan,
    ) -> &mut Self {
        self.animate(AnimationDirective::linear_move(id, start, end, frames))
    }

    /// Append a `linear_move` over the manifest's whole frame range.
    pub fn linear_move_full(&mut self, id: impl Into<AssetId>, start: Vec3, end: Vec3) -> &mut Self {
        let frames = self.manifest.frame_span();
        self.linear_move(id, start, end, frames)
    }

    pub fn attach(
        &mut self,
        child: impl Into<AssetId>,
        parent: impl Into<AssetId>,
        offset: Vec3,
    ) -> &mut Self {
        self.manifest
            .attachments
            .push(Attachment::new(child, parent, offset));
        self
    }

    /// Return the manifest without validating it.
    pub fn build_unchecked(self) -> Manifest {
        self.manifest
    }

    /// Validate and return the manifest.
    pub fn build(self) -> SceneResult<Manifest> {
        validate_manifest(&self.manifest)?;
        Ok(self.manifest)
    }
}
