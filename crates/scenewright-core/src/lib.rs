//! # scenewright-core
//!
//! Core types and primitives for the SceneWright scene pipeline.
//! This crate contains foundational types shared across all SceneWright
//! crates: vectors, transforms, bounding boxes, configuration, content
//! hashes, and error types.

pub mod config;
pub mod error;
pub mod hash;
pub mod math;
pub mod types;

pub use config::*;

pub use error::{SceneError, SceneResult, ValidationError};
pub use hash::ContentHash;
pub use math::{Aabb, Transform3D, Vec3};
pub use types::{FollowMode, ResolutionPolicy};
