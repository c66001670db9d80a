use serde::{Deserialize, Serialize};

use scenewright_core::SceneError;

/// Planner input: which template to use and which logical assets fill its
/// roles. Intents are ephemeral; only the manifest they produce is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneIntent {
    /// One of `static_scene`, `move_actor`, `carry_object`.
    pub scene_type: String,
    pub actor: String,
    pub object: String,
    pub environment: String,
}

impl SceneIntent {
    pub fn new(
        scene_type: impl Into<String>,
        actor: impl Into<String>,
        object: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            scene_type: scene_type.into(),
            actor: actor.into(),
            object: object.into(),
            environment: environment.into(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The fixed catalog of scene templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    /// Everything placed, nothing moves.
    StaticScene,
    /// The actor walks from its start position to the move target.
    MoveActor,
    /// As `MoveActor`, with the object attached to the actor.
    CarryObject,
}

impl SceneType {
    pub const ALL: [SceneType; 3] = [
        SceneType::StaticScene,
        SceneType::MoveActor,
        SceneType::CarryObject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneType::StaticScene => "static_scene",
            SceneType::MoveActor => "move_actor",
            SceneType::CarryObject => "carry_object",
        }
    }
}

impl std::str::FromStr for SceneType {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SceneError::UnknownSceneType(s.to_string()))
    }
}

impl std::fmt::Display for SceneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_type_parse() {
        assert_eq!("carry_object".parse::<SceneType>().unwrap(), SceneType::CarryObject);
        let err = "dance_party".parse::<SceneType>().unwrap_err();
        assert!(matches!(err, SceneError::UnknownSceneType(t) if t == "dance_party"));
    }

    #[test]
    fn test_intent_from_json() {
        let intent = SceneIntent::from_json(
            r#"{"scene_type": "move_actor", "actor": "kid", "object": "ball", "environment": "court"}"#,
        )
        .unwrap();
        assert_eq!(intent, SceneIntent::new("move_actor", "kid", "ball", "court"));
    }
}
