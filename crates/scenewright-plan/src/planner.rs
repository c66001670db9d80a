use scenewright_core::{PlannerConfig, SceneResult};
use scenewright_ir::{AssetId, Manifest, ManifestBuilder};

use crate::intent::{SceneIntent, SceneType};
use crate::registry::{positions, AssetRegistry, Layout};

/// Intent roles resolved to concrete asset-ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBinding {
    pub actor: AssetId,
    pub object: AssetId,
    pub environment: AssetId,
}

/// Deterministic, rule-based planner: the same intent always yields a
/// byte-identical manifest.
#[derive(Debug, Clone)]
pub struct Planner {
    registry: AssetRegistry,
    layout: Layout,
    scene_id: String,
    frame_start: i64,
    frame_end: i64,
}

impl Planner {
    pub fn new(registry: AssetRegistry, layout: Layout) -> Self {
        let defaults = PlannerConfig::default();
        Self {
            registry,
            layout,
            scene_id: defaults.scene_id,
            frame_start: defaults.frame_start,
            frame_end: defaults.frame_end,
        }
    }

    /// Built-in registry and layout, overridden by the config tables.
    pub fn from_config(config: &PlannerConfig) -> Self {
        let mut registry = AssetRegistry::builtin();
        registry.extend(&config.registry);
        let mut layout = Layout::builtin();
        layout.extend(&config.layout);
        Self::new(registry, layout)
            .with_scene_id(config.scene_id.clone())
            .with_frames(config.frame_start, config.frame_end)
    }

    pub fn with_scene_id(mut self, scene_id: impl Into<String>) -> Self {
        self.scene_id = scene_id.into();
        self
    }

    pub fn with_frames(mut self, frame_start: i64, frame_end: i64) -> Self {
        self.frame_start = frame_start;
        self.frame_end = frame_end;
        self
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Resolve the intent's three roles through the registry.
    pub fn bind(&self, intent: &SceneIntent) -> SceneResult<RoleBinding> {
        Ok(RoleBinding {
            actor: self.registry.resolve(&intent.actor)?,
            object: self.registry.resolve(&intent.object)?,
            environment: self.registry.resolve(&intent.environment)?,
        })
    }

    /// Turn an intent into a validated manifest.
    pub fn plan(&self, intent: &SceneIntent) -> SceneResult<Manifest> {
        let roles = self.bind(intent)?;
        let scene_type: SceneType = intent.scene_type.parse()?;

        let builder = match scene_type {
            SceneType::StaticScene => self.static_scene(&roles)?,
            SceneType::MoveActor => self.move_actor(&roles)?,
            SceneType::CarryObject => self.carry_object(&roles)?,
        };
        let manifest = builder.build()?;

        tracing::info!(
            "planned {} '{}': {} assets, {} animations, {} attachments",
            scene_type,
            manifest.scene_id,
            manifest.assets.len(),
            manifest.animations.len(),
            manifest.attachments.len()
        );
        Ok(manifest)
    }

    fn static_scene(&self, roles: &RoleBinding) -> SceneResult<ManifestBuilder> {
        let mut builder = ManifestBuilder::new(&*self.scene_id, self.frame_start, self.frame_end);
        builder
            .place_at(roles.actor.clone(), self.layout.get(positions::ACTOR_START)?)
            .place_at(
                roles.object.clone(),
                self.layout.get(positions::OBJECT_HOLD_OFFSET)?,
            )
            .place_at(
                roles.environment.clone(),
                self.layout.get(positions::COURT_CENTER)?,
            );
        Ok(builder)
    }

    fn move_actor(&self, roles: &RoleBinding) -> SceneResult<ManifestBuilder> {
        let mut builder = self.static_scene(roles)?;
        builder.linear_move_full(
            roles.actor.clone(),
            self.layout.get(positions::ACTOR_START)?,
            self.layout.get(positions::MOVE_TARGET)?,
        );
        Ok(builder)
    }

    fn carry_object(&self, roles: &RoleBinding) -> SceneResult<ManifestBuilder> {
        let mut builder = self.move_actor(roles)?;
        builder.attach(
            roles.object.clone(),
            roles.actor.clone(),
            self.layout.get(positions::OBJECT_HOLD_OFFSET)?,
        );
        Ok(builder)
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(AssetRegistry::builtin(), Layout::builtin())
    }
}

/// Plan with the built-in registry, layout, and frame range.
pub fn plan(intent: &SceneIntent) -> SceneResult<Manifest> {
    Planner::default().plan(intent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenewright_core::{SceneError, ValidationError, Vec3};
    use scenewright_ir::{AnimationDirective, Attachment, FrameSpan};

    fn intent(scene_type: &str) -> SceneIntent {
        SceneIntent::new(scene_type, "kid", "ball", "court")
    }

    #[test]
    fn test_static_scene() {
        let m = plan(&intent("static_scene")).unwrap();
        assert_eq!(m.scene_id.as_str(), "scene_auto");
        assert_eq!((m.frame_start, m.frame_end), (1, 120));
        assert_eq!(m.assets.len(), 3);
        assert_eq!(
            m.placement(&"ball_1".into()).unwrap().location,
            Vec3::new(0.3, 0.0, 1.0)
        );
        assert_eq!(m.placement(&"court_1".into()).unwrap().scale, Vec3::ONE);
        assert!(m.animations.is_empty());
        assert!(m.attachments.is_empty());
    }

    #[test]
    fn test_move_actor_scenario() {
        let m = plan(&intent("move_actor")).unwrap();
        assert_eq!(
            m.animations,
            vec![AnimationDirective::linear_move(
                "kid_1",
                Vec3::ZERO,
                Vec3::new(3.0, 0.0, 0.0),
                FrameSpan::new(1, 120),
            )]
        );
        assert!(m.attachments.is_empty());
    }

    #[test]
    fn test_carry_object_scenario() {
        let move_actor = plan(&intent("move_actor")).unwrap();
        let m = plan(&intent("carry_object")).unwrap();
        assert_eq!(m.animations, move_actor.animations);
        assert_eq!(
            m.attachments,
            vec![Attachment::new("ball_1", "kid_1", Vec3::new(0.3, 0.0, 1.0))]
        );
    }

    #[test]
    fn test_plan_is_byte_identical() {
        for scene_type in SceneType::ALL {
            let a = plan(&intent(scene_type.as_str())).unwrap();
            let b = plan(&intent(scene_type.as_str())).unwrap();
            assert_eq!(a.to_json_pretty().unwrap(), b.to_json_pretty().unwrap());
            assert_eq!(a.content_hash().unwrap(), b.content_hash().unwrap());
        }
    }

    #[test]
    fn test_unknown_scene_type() {
        let err = plan(&intent("juggle")).unwrap_err();
        assert!(matches!(err, SceneError::UnknownSceneType(t) if t == "juggle"));
    }

    #[test]
    fn test_unknown_asset_checked_before_scene_type() {
        let err = plan(&SceneIntent::new("juggle", "kid", "frisbee", "court")).unwrap_err();
        assert!(matches!(err, SceneError::UnknownAsset(n) if n == "frisbee"));
    }

    #[test]
    fn test_frames_follow_planner_range() {
        let planner = Planner::default()
            .with_scene_id("long_walk")
            .with_frames(10, 250);
        let m = planner.plan(&intent("move_actor")).unwrap();
        assert_eq!(m.scene_id.as_str(), "long_walk");
        assert_eq!(
            m.animations[0].location_keys().unwrap()[1].frame,
            250
        );
    }

    #[test]
    fn test_inverted_frames_fail_validation() {
        let planner = Planner::default().with_frames(120, 1);
        let err = planner.plan(&intent("static_scene")).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Validation(ValidationError::FrameRange { .. })
        ));
    }

    #[test]
    fn test_config_overrides() {
        let mut config = PlannerConfig::default();
        config.registry.insert("dog".into(), "dog_1".into());
        config.layout.insert("move_target".into(), Vec3::new(0.0, 5.0, 0.0));
        let planner = Planner::from_config(&config);
        let m = planner
            .plan(&SceneIntent::new("carry_object", "dog", "ball", "court"))
            .unwrap();
        assert!(m.contains_asset(&"dog_1".into()));
        match &m.animations[0] {
            AnimationDirective::LinearMove { end, .. } => assert_eq!(*end, Vec3::new(0.0, 5.0, 0.0)),
            other => panic!("unexpected directive: {other:?}"),
        }
    }

    #[test]
    fn test_same_actor_and_object_is_rejected() {
        let err = plan(&SceneIntent::new("carry_object", "kid", "kid", "court")).unwrap_err();
        assert!(matches!(
            err,
            SceneError::Validation(ValidationError::AttachmentCycle { .. })
        ));
    }
}
