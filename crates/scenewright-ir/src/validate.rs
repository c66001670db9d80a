use std::collections::BTreeMap;

use scenewright_core::ValidationError;

use crate::animation::AnimationDirective;
use crate::asset::AssetId;
use crate::manifest::Manifest;

/// Validate a manifest for structural correctness.
///
/// Checks run in a fixed order and stop at the first failure:
/// frame range, animation references, attachment references, parent-link
/// cycles, then per-directive frame ordering.
pub fn validate_manifest(manifest: &Manifest) -> Result<(), ValidationError> {
    if manifest.frame_start > manifest.frame_end {
        return Err(ValidationError::FrameRange {
            start: manifest.frame_start,
            end: manifest.frame_end,
        });
    }

    for (index, anim) in manifest.animations.iter().enumerate() {
        for (field, id) in anim.asset_refs() {
            if !manifest.contains_asset(id) {
                return Err(ValidationError::UnknownAnimationAsset {
                    index,
                    field,
                    asset_id: id.to_string(),
                });
            }
        }
    }

    for (index, attachment) in manifest.attachments.iter().enumerate() {
        for (field, id) in [("child", &attachment.child), ("parent", &attachment.parent)] {
            if !manifest.contains_asset(id) {
                return Err(ValidationError::UnknownAttachmentAsset {
                    index,
                    field,
                    asset_id: id.to_string(),
                });
            }
        }
    }

    if let Some(cycle) = find_parent_cycle(manifest) {
        return Err(ValidationError::AttachmentCycle {
            asset_id: cycle[0].to_string(),
            cycle: cycle.iter().map(|id| id.to_string()).collect(),
        });
    }

    for (index, anim) in manifest.animations.iter().enumerate() {
        if let AnimationDirective::LinearMove {
            asset_id, frames, ..
        } = anim
        {
            if !frames.is_increasing() {
                return Err(ValidationError::FrameOrder {
                    index,
                    asset_id: asset_id.to_string(),
                    start: frames.start(),
                    end: frames.end(),
                });
            }
        }
    }

    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Find a cycle in the child → parent graph formed by attachments and
/// `follow` directives. Returns the cycle as a path that starts and ends on
/// the same asset, e.g. `[a, b, a]`.
///
/// Iterative DFS; chain length is bounded by memory, not by the call stack.
pub fn find_parent_cycle(manifest: &Manifest) -> Option<Vec<&AssetId>> {
    let mut edges: BTreeMap<&AssetId, Vec<&AssetId>> = BTreeMap::new();
    for link in manifest.parent_links() {
        edges.entry(link.child).or_default().push(link.parent);
    }

    let mut marks: BTreeMap<&AssetId, Mark> = BTreeMap::new();
    // Current DFS path; each entry holds the index of its next edge to try.
    let mut path: Vec<(&AssetId, usize)> = Vec::new();

    for &root in edges.keys() {
        if marks.contains_key(root) {
            continue;
        }
        marks.insert(root, Mark::OnPath);
        path.push((root, 0));

        while let Some((node, next_edge)) = path.last_mut() {
            let Some(next) = edges.get(*node).and_then(|e| e.get(*next_edge)).copied() else {
                marks.insert(*node, Mark::Done);
                path.pop();
                continue;
            };
            *next_edge += 1;

            match marks.get(next).copied() {
                Some(Mark::OnPath) => {
                    let start = path.iter().position(|(n, _)| *n == next).unwrap_or(0);
                    let mut cycle: Vec<&AssetId> = path[start..].iter().map(|(n, _)| *n).collect();
                    cycle.push(next);
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(next, Mark::OnPath);
                    path.push((next, 0));
                }
            }
        }
    }
    None
}
