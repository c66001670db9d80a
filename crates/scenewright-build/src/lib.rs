//! # scenewright-build
//!
//! Everything that touches a 3D host: the [`HostEngine`] capability trait,
//! an in-memory reference host ([`SceneGraph`]), asset resolution, height
//! normalization, descriptor generation, and manifest assembly.

pub mod assemble;
pub mod bounds;
pub mod describe;
pub mod graph;
pub mod host;
pub mod ingest;
pub mod normalize;
pub mod resolver;

pub use assemble::{assemble, AssemblyOptions, AssetFailure, Assembler, SceneHandle};
pub use bounds::{combined_bounds, descendants};
pub use describe::describe;
pub use graph::{PrefabLibrary, PrefabNode, SceneGraph, SceneSnapshot};
pub use host::{HostEngine, NodeId, NodeKind};
pub use ingest::{import_under_root, ingest, root_name, IngestReport};
pub use normalize::{normalize, normalize_asset, AssetCategory, NormalizeOutcome};
pub use resolver::{AssetResolver, DirectoryResolver};
