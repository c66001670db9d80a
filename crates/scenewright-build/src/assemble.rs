//! Manifest → live scene.
//!
//! Assembly runs in a fixed order: validate, resolve every asset, import,
//! normalize and place, apply animations in manifest order, attachments,
//! then the frame range. Validation and resolution happen before the host is
//! touched, so a rejected manifest (or a fail-fast resolution error) leaves
//! the scene exactly as it was. A host failure after imports began removes
//! every root created so far before the error is returned, and the frame
//! range is only written once nothing else can fail.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scenewright_core::{
    AssemblyConfig, FollowMode, NormalizeConfig, ResolutionPolicy, SceneError, SceneResult, Vec3,
};
use scenewright_ir::{
    validate_manifest, AnimationDirective, AssetDescriptor, AssetId, AssetSource, Manifest, SceneId,
};

use crate::host::{HostEngine, NodeId, LOCATION};
use crate::ingest::{import_under_root, root_name};
use crate::normalize::{normalize, AssetCategory, NormalizeOutcome};
use crate::resolver::AssetResolver;

/// Caller policy for an assembly run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyOptions {
    pub resolution: ResolutionPolicy,
    pub follow: FollowMode,
    /// Rescale each imported asset before applying its placement scale.
    pub normalize: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            resolution: ResolutionPolicy::default(),
            follow: FollowMode::default(),
            normalize: true,
        }
    }
}

impl AssemblyOptions {
    pub fn best_effort() -> Self {
        Self {
            resolution: ResolutionPolicy::BestEffort,
            ..Self::default()
        }
    }

    pub fn with_follow(mut self, follow: FollowMode) -> Self {
        self.follow = follow;
        self
    }

    /// Import assets at their authored size.
    pub fn raw(mut self) -> Self {
        self.normalize = false;
        self
    }
}

impl From<&AssemblyConfig> for AssemblyOptions {
    fn from(config: &AssemblyConfig) -> Self {
        Self {
            resolution: config.resolution,
            follow: config.follow,
            normalize: config.normalize,
        }
    }
}

/// An asset skipped under best-effort resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFailure {
    pub asset_id: AssetId,
    pub reason: String,
}

/// The assembled scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneHandle {
    pub scene_id: SceneId,
    pub frame_start: i64,
    pub frame_end: i64,
    /// Wrapper root of every asset that made it into the scene.
    pub roots: BTreeMap<AssetId, NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<AssetFailure>,
    /// Animations and attachments dropped because they reference a failed
    /// asset.
    #[serde(default)]
    pub skipped_directives: usize,
}

impl SceneHandle {
    pub fn root(&self, asset_id: &AssetId) -> Option<NodeId> {
        self.roots.get(asset_id).copied()
    }

    /// Every asset resolved and every directive applied.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.skipped_directives == 0
    }
}

/// Builds scenes from manifests.
#[derive(Debug, Clone, Default)]
pub struct Assembler<'a> {
    options: AssemblyOptions,
    heights: NormalizeConfig,
    descriptors: Option<&'a BTreeMap<AssetId, AssetDescriptor>>,
}

impl<'a> Assembler<'a> {
    pub fn new(options: AssemblyOptions) -> Self {
        Self {
            options,
            heights: NormalizeConfig::default(),
            descriptors: None,
        }
    }

    /// Name wrapper roots, and size assets, after stored descriptors where
    /// available.
    pub fn with_descriptors(mut self, descriptors: &'a BTreeMap<AssetId, AssetDescriptor>) -> Self {
        self.descriptors = Some(descriptors);
        self
    }

    /// Category heights for assets without a descriptor height.
    pub fn with_heights(mut self, heights: NormalizeConfig) -> Self {
        self.heights = heights;
        self
    }

    pub fn options(&self) -> AssemblyOptions {
        self.options
    }

    /// The descriptor's `root_object_name`, else `ASSET_<ID>`.
    pub fn root_name_for(&self, asset_id: &AssetId) -> String {
        self.descriptors
            .and_then(|d| d.get(asset_id))
            .map(|d| d.root_object_name.clone())
            .unwrap_or_else(|| root_name(asset_id))
    }

    /// The descriptor's recorded height, else the category height.
    pub fn target_height_for(&self, asset_id: &AssetId) -> f64 {
        self.descriptors
            .and_then(|d| d.get(asset_id))
            .and_then(|d| d.height)
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or_else(|| AssetCategory::classify(asset_id).target_height(&self.heights))
    }

    pub fn assemble<H, R>(
        &self,
        host: &mut H,
        manifest: &Manifest,
        resolver: &R,
    ) -> SceneResult<SceneHandle>
    where
        H: HostEngine + ?Sized,
        R: AssetResolver + ?Sized,
    {
        validate_manifest(manifest)?;

        let mut handle = SceneHandle {
            scene_id: manifest.scene_id.clone(),
            frame_start: manifest.frame_start,
            frame_end: manifest.frame_end,
            roots: BTreeMap::new(),
            failures: Vec::new(),
            skipped_directives: 0,
        };
        let sources = self.resolve_all(manifest, resolver, &mut handle)?;

        tracing::info!(
            "assembling '{}': {} assets ({} resolution, {} follow)",
            manifest.scene_id,
            sources.len(),
            self.options.resolution,
            self.options.follow
        );

        if let Err(err) = self.build(host, manifest, &sources, &mut handle) {
            rollback(host, &handle.roots);
            return Err(err);
        }

        tracing::info!(
            "assembled '{}': {} roots, {} failures, {} skipped directives",
            manifest.scene_id,
            handle.roots.len(),
            handle.failures.len(),
            handle.skipped_directives
        );
        Ok(handle)
    }

    /// Resolve every asset up front. Fail-fast returns the first error,
    /// always naming the asset-id.
    fn resolve_all<R: AssetResolver + ?Sized>(
        &self,
        manifest: &Manifest,
        resolver: &R,
        handle: &mut SceneHandle,
    ) -> SceneResult<Vec<(AssetId, AssetSource)>> {
        let mut sources = Vec::with_capacity(manifest.assets.len());
        for asset_id in manifest.assets.keys() {
            match resolver.resolve(asset_id) {
                Ok(source) => sources.push((asset_id.clone(), source)),
                Err(err) => {
                    let reason = match err {
                        SceneError::AssetResolution { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    match self.options.resolution {
                        ResolutionPolicy::FailFast => {
                            return Err(SceneError::resolution(asset_id.as_str(), reason));
                        }
                        ResolutionPolicy::BestEffort => {
                            tracing::warn!("skipping asset '{}': {}", asset_id, reason);
                            handle.failures.push(AssetFailure {
                                asset_id: asset_id.clone(),
                                reason,
                            });
                        }
                    }
                }
            }
        }
        Ok(sources)
    }

    fn build<H: HostEngine + ?Sized>(
        &self,
        host: &mut H,
        manifest: &Manifest,
        sources: &[(AssetId, AssetSource)],
        handle: &mut SceneHandle,
    ) -> SceneResult<()> {
        for (asset_id, source) in sources {
            let root = import_under_root(host, source, &self.root_name_for(asset_id))?;
            handle.roots.insert(asset_id.clone(), root);

            if self.options.normalize {
                if let NormalizeOutcome::Scaled { factor, .. } =
                    normalize(host, root, self.target_height_for(asset_id))?
                {
                    tracing::debug!("'{}' rescaled by {:.4}", asset_id, factor);
                }
            }
            if let Some(placement) = manifest.placement(asset_id) {
                host.set_location(root, placement.location)?;
                let scale = host.scale(root)?;
                host.set_scale(root, scale.mul(&placement.scale))?;
            }
            tracing::debug!("placed '{}' as {}", asset_id, root);
        }

        for (index, directive) in manifest.animations.iter().enumerate() {
            if let Some(missing) = directive
                .asset_refs()
                .into_iter()
                .find(|(_, id)| !handle.roots.contains_key(*id))
            {
                tracing::warn!(
                    "skipping animations[{}] ({}): asset '{}' is not in the scene",
                    index,
                    directive.kind(),
                    missing.1
                );
                handle.skipped_directives += 1;
                continue;
            }
            self.apply_animation(host, manifest, directive, &handle.roots)?;
        }

        for (index, attachment) in manifest.attachments.iter().enumerate() {
            let (Some(&child), Some(&parent)) = (
                handle.roots.get(&attachment.child),
                handle.roots.get(&attachment.parent),
            ) else {
                tracing::warn!(
                    "skipping attachments[{}]: '{}' -> '{}' is incomplete",
                    index,
                    attachment.child,
                    attachment.parent
                );
                handle.skipped_directives += 1;
                continue;
            };
            self.link(host, manifest, child, parent, attachment.offset)?;
        }

        host.set_frame_range(manifest.frame_start, manifest.frame_end)
    }

    fn apply_animation<H: HostEngine + ?Sized>(
        &self,
        host: &mut H,
        manifest: &Manifest,
        directive: &AnimationDirective,
        roots: &BTreeMap<AssetId, NodeId>,
    ) -> SceneResult<()> {
        let root_of = |id: &AssetId| {
            roots
                .get(id)
                .copied()
                .ok_or_else(|| SceneError::host(format!("asset '{}' has no root", id)))
        };
        match directive {
            AnimationDirective::LinearMove {
                asset_id,
                start,
                end,
                frames,
            } => {
                let node = root_of(asset_id)?;
                host.set_location(node, *start)?;
                host.insert_keyframe(node, LOCATION, frames.start())?;
                host.set_location(node, *end)?;
                host.insert_keyframe(node, LOCATION, frames.end())?;
                Ok(())
            }
            AnimationDirective::Follow {
                target,
                follower,
                offset,
            } => {
                let (follower, target) = (root_of(follower)?, root_of(target)?);
                self.link(host, manifest, follower, target, *offset)
            }
        }
    }

    fn link<H: HostEngine + ?Sized>(
        &self,
        host: &mut H,
        manifest: &Manifest,
        follower: NodeId,
        target: NodeId,
        offset: Vec3,
    ) -> SceneResult<()> {
        match self.options.follow {
            FollowMode::Continuous => host.link_follow(follower, target, offset),
            FollowMode::Snapshot => {
                let at = host.location_at(target, manifest.frame_start)?;
                host.set_location(follower, at.add(&offset))
            }
        }
    }
}

/// Remove every root created by a failed build.
fn rollback<H: HostEngine + ?Sized>(host: &mut H, roots: &BTreeMap<AssetId, NodeId>) {
    for (asset_id, root) in roots {
        if let Err(err) = host.remove_subtree(*root) {
            tracing::warn!("rollback of '{}' failed: {}", asset_id, err);
        }
    }
}

/// Assemble with default options: fail-fast, continuous follow.
pub fn assemble<H, R>(host: &mut H, manifest: &Manifest, resolver: &R) -> SceneResult<SceneHandle>
where
    H: HostEngine + ?Sized,
    R: AssetResolver + ?Sized,
{
    Assembler::default().assemble(host, manifest, resolver)
}
