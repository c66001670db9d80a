//! Import, standardize and describe a single asset.

use scenewright_core::{NormalizeConfig, SceneResult};
use scenewright_ir::{AssetDescriptor, AssetId, AssetSource};

use crate::describe::describe;
use crate::host::{HostEngine, NodeId};
use crate::normalize::{normalize_asset, NormalizeOutcome};
use crate::resolver::AssetResolver;

/// Default wrapper-root name: `ASSET_<ID>`, upper-cased.
pub fn root_name(asset_id: &AssetId) -> String {
    format!("ASSET_{}", asset_id.as_str().to_uppercase())
}

/// Import `source` under a fresh, scene-linked empty named `root_name`.
///
/// Imported nodes without a parent are re-parented under the root; the
/// rest of the imported hierarchy is kept. If the import fails the root is
/// removed again.
pub fn import_under_root<H: HostEngine + ?Sized>(
    host: &mut H,
    source: &AssetSource,
    root_name: &str,
) -> SceneResult<NodeId> {
    let root = host.new_empty_node(root_name)?;
    let wrapped = host
        .link_to_scene_root(root)
        .and_then(|_| wrap_import(host, source, root));
    if let Err(err) = wrapped {
        if let Err(cleanup) = host.remove_subtree(root) {
            tracing::warn!("could not remove '{}' after failed import: {}", root_name, cleanup);
        }
        return Err(err);
    }
    Ok(root)
}

fn wrap_import<H: HostEngine + ?Sized>(
    host: &mut H,
    source: &AssetSource,
    root: NodeId,
) -> SceneResult<()> {
    for node in host.import(source)? {
        if host.parent(node)?.is_none() {
            host.set_parent(node, Some(root))?;
        }
    }
    Ok(())
}

/// Result of ingesting one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub root: NodeId,
    pub outcome: NormalizeOutcome,
    pub descriptor: AssetDescriptor,
}

/// Resolve, import under `ASSET_<ID>`, normalize by category and describe.
/// Persisting the descriptor is left to the caller. On failure nothing of
/// the asset is left in the host.
pub fn ingest<H, R>(
    host: &mut H,
    resolver: &R,
    asset_id: &AssetId,
    heights: &NormalizeConfig,
) -> SceneResult<IngestReport>
where
    H: HostEngine + ?Sized,
    R: AssetResolver + ?Sized,
{
    let source = resolver.resolve(asset_id)?;
    tracing::info!("ingesting '{}' from {}", asset_id, source.path.display());

    let root = import_under_root(host, &source, &root_name(asset_id))?;
    let standardized = normalize_asset(host, asset_id, root, heights)
        .and_then(|outcome| Ok((outcome, describe(&*host, asset_id, root)?)));
    let (outcome, descriptor) = match standardized {
        Ok(done) => done,
        Err(err) => {
            if let Err(cleanup) = host.remove_subtree(root) {
                tracing::warn!("could not remove '{}' after failed ingest: {}", asset_id, cleanup);
            }
            return Err(err);
        }
    };

    tracing::info!(
        "ingested '{}': {} meshes, height {:?}",
        asset_id,
        descriptor.mesh_count,
        descriptor.height
    );
    Ok(IngestReport {
        root,
        outcome,
        descriptor,
    })
}
