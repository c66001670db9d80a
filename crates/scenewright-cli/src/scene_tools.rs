use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use scenewright_core::SceneConfig;
use scenewright_ir::{AnimationDirective, Manifest, ManifestStore};
use scenewright_plan::{SceneIntent, SceneSpec};

pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    Manifest::from_json(&raw).with_context(|| format!("invalid manifest: {}", path.display()))
}

pub fn read_intent(path: &Path) -> Result<SceneIntent> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read intent: {}", path.display()))?;
    SceneIntent::from_json(&raw).with_context(|| format!("invalid intent: {}", path.display()))
}

pub fn read_spec(path: &Path) -> Result<SceneSpec> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scene spec: {}", path.display()))?;
    SceneSpec::from_json(&raw).with_context(|| format!("invalid scene spec: {}", path.display()))
}

/// The manifest store: `--out-dir` if given, else `[paths].manifests_dir`.
pub fn store_for(config: &SceneConfig, out_dir: Option<PathBuf>) -> ManifestStore {
    ManifestStore::new(out_dir.unwrap_or_else(|| config.paths.manifests_dir.clone()))
}

/// Save a manifest, or print it when `stdout` is set. Returns the written
/// path, if any.
pub fn emit_manifest(
    manifest: &Manifest,
    store: &ManifestStore,
    stdout: bool,
) -> Result<Option<PathBuf>> {
    if stdout {
        println!("{}", manifest.to_json_pretty()?);
        return Ok(None);
    }
    let path = store
        .save_manifest(manifest)
        .with_context(|| format!("failed to write manifest to {}", store.dir().display()))?;
    Ok(Some(path))
}

/// Tree view of a manifest, ending with its content hash.
pub fn render_manifest_tree(manifest: &Manifest) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "🎬 Scene: {} (frames {}..={}, {} total)",
        manifest.scene_id,
        manifest.frame_start,
        manifest.frame_end,
        manifest.frame_count()
    )?;

    writeln!(out, "├── 📦 Assets ({})", manifest.assets.len())?;
    for (id, placement) in &manifest.assets {
        writeln!(
            out,
            "│   ├── {} at {} scale {}",
            id, placement.location, placement.scale
        )?;
    }

    writeln!(out, "├── 🎞  Animations ({})", manifest.animations.len())?;
    for (i, directive) in manifest.animations.iter().enumerate() {
        let line = match directive {
            AnimationDirective::LinearMove {
                asset_id,
                start,
                end,
                frames,
            } => format!(
                "linear_move {} {} -> {} over {}..{}",
                asset_id,
                start,
                end,
                frames.start(),
                frames.end()
            ),
            AnimationDirective::Follow {
                target,
                follower,
                offset,
            } => format!("follow {} -> {} offset {}", follower, target, offset),
        };
        writeln!(out, "│   ├── [{}] {}", i, line)?;
    }

    writeln!(out, "├── 🔗 Attachments ({})", manifest.attachments.len())?;
    for attachment in &manifest.attachments {
        writeln!(
            out,
            "│   ├── {} -> {} offset {}",
            attachment.child, attachment.parent, attachment.offset
        )?;
    }

    writeln!(out, "└── # {}", manifest.content_hash()?)?;
    Ok(out)
}
