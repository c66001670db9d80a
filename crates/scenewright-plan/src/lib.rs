//! # scenewright-plan
//!
//! Turns a high-level scene intent (or a hand-written scene spec) into a
//! validated manifest. Planning is pure: no host, no files, no randomness.

pub mod compose;
pub mod intent;
pub mod planner;
pub mod registry;

pub use compose::{compose, DescriptorSource, SceneSpec, SpecAnimation, SpecObject};
pub use intent::{SceneIntent, SceneType};
pub use planner::{plan, Planner, RoleBinding};
pub use registry::{positions, AssetRegistry, Layout};
