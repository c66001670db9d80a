use std::collections::BTreeMap;

use scenewright_core::{SceneError, SceneResult, Vec3};
use scenewright_ir::AssetId;

/// Named layout positions the templates refer to.
pub mod positions {
    pub const ACTOR_START: &str = "actor_start";
    pub const MOVE_TARGET: &str = "move_target";
    pub const OBJECT_HOLD_OFFSET: &str = "object_hold_offset";
    pub const COURT_CENTER: &str = "court_center";
}

/// Logical role name → concrete asset-id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRegistry {
    entries: BTreeMap<String, AssetId>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The stock registry: `kid`, `ball`, `court`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register("kid", "kid_1")
            .register("ball", "ball_1")
            .register("court", "court_1");
        registry
    }

    /// Add or replace an entry.
    pub fn register(&mut self, name: impl Into<String>, id: impl Into<AssetId>) -> &mut Self {
        self.entries.insert(name.into(), id.into());
        self
    }

    /// Apply overrides, e.g. from the `[planner.registry]` config table.
    pub fn extend<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (name, id) in overrides {
            self.register(name.clone(), id.as_str());
        }
    }

    pub fn resolve(&self, name: &str) -> SceneResult<AssetId> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| SceneError::UnknownAsset(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Named world positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    positions: BTreeMap<String, Vec3>,
}

impl Layout {
    pub fn new() -> Self {
        Self {
            positions: BTreeMap::new(),
        }
    }

    /// The stock layout, a basketball court with the actor at its center.
    pub fn builtin() -> Self {
        let mut layout = Self::new();
        layout
            .set(positions::COURT_CENTER, Vec3::ZERO)
            .set(positions::ACTOR_START, Vec3::ZERO)
            .set(positions::OBJECT_HOLD_OFFSET, Vec3::new(0.3, 0.0, 1.0))
            .set(positions::MOVE_TARGET, Vec3::new(3.0, 0.0, 0.0));
        layout
    }

    pub fn set(&mut self, name: impl Into<String>, position: Vec3) -> &mut Self {
        self.positions.insert(name.into(), position);
        self
    }

    pub fn extend<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a String, &'a Vec3)>) {
        for (name, position) in overrides {
            self.set(name.clone(), *position);
        }
    }

    pub fn get(&self, name: &str) -> SceneResult<Vec3> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::MissingLayout(name.to_string()))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = AssetRegistry::builtin();
        assert_eq!(registry.resolve("kid").unwrap(), AssetId::new("kid_1"));
        assert!(matches!(
            registry.resolve("dog"),
            Err(SceneError::UnknownAsset(name)) if name == "dog"
        ));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["ball", "court", "kid"]);
    }

    #[test]
    fn test_registry_overrides() {
        let mut registry = AssetRegistry::builtin();
        let overrides: BTreeMap<String, String> =
            [("kid".to_string(), "kid_2".to_string())].into_iter().collect();
        registry.extend(&overrides);
        assert_eq!(registry.resolve("kid").unwrap(), AssetId::new("kid_2"));
    }

    #[test]
    fn test_layout_lookup() {
        let layout = Layout::builtin();
        assert_eq!(
            layout.get(positions::OBJECT_HOLD_OFFSET).unwrap(),
            Vec3::new(0.3, 0.0, 1.0)
        );
        assert!(matches!(
            layout.get("bleachers"),
            Err(SceneError::MissingLayout(_))
        ));
    }
}
