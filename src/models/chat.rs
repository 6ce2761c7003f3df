// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat endpoint contract and the language model's action vocabulary.

use crate::models::{Exercise, Workout};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Chat turn request. The caller supplies the current workout state, which
/// is trusted as the base to mutate rather than re-fetched server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "workoutId")]
    pub workout_id: String,
    pub exercises: Vec<Exercise>,
    pub workout: Workout,
}

/// Chat turn response: the assistant's reply plus the updated state.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChatResponse {
    pub response: String,
    pub exercises: Vec<Exercise>,
    pub workout: Workout,
}

/// One mutation produced by the language model.
///
/// Actions are deserialized one object at a time so that a single malformed
/// action is skipped without discarding the rest of the turn.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatAction {
    /// Insert a new exercise.
    Add {
        exercise: String,
        sets: Option<i64>,
        reps: Option<i64>,
        weight: Option<f64>,
        unit: Option<String>,
    },
    /// Change fields on an existing exercise (fuzzy-matched by name).
    Update {
        exercise: String,
        sets: Option<i64>,
        reps: Option<i64>,
        weight: Option<f64>,
        unit: Option<String>,
    },
    /// Remove an exercise (fuzzy-matched by name).
    Delete { exercise: String },
    /// Append to the workout's notes.
    Note { content: String },
    /// Rename an exercise (fuzzy-matched by name).
    Rename { exercise: String, new_name: String },
    /// Set the workout's name and optionally its tag.
    SetWorkout {
        name: Option<String>,
        tag: Option<String>,
    },
}

/// The JSON object the model is instructed to return.
///
/// Actions stay raw [`serde_json::Value`]s here; see [`ChatAction`].
#[derive(Debug, Clone, Deserialize)]
pub struct ModelReply {
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
    #[serde(default)]
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tags_deserialize() {
        let raw = r#"[
            {"type": "add", "exercise": "Bench press", "sets": 3, "reps": 8, "weight": 135},
            {"type": "update", "exercise": "bench", "sets": 4},
            {"type": "delete", "exercise": "Dips"},
            {"type": "note", "content": "Felt strong"},
            {"type": "rename", "exercise": "Rows", "new_name": "Barbell rows"},
            {"type": "set_workout", "name": "Push Day", "tag": "Lifting"}
        ]"#;

        let actions: Vec<ChatAction> = serde_json::from_str(raw).unwrap();
        assert_eq!(actions.len(), 6);
        assert!(matches!(&actions[0], ChatAction::Add { sets: Some(3), .. }));
        assert!(matches!(
            &actions[5],
            ChatAction::SetWorkout { name: Some(n), .. } if n == "Push Day"
        ));
    }

    #[test]
    fn test_unknown_action_type_rejected() {
        let raw = r#"{"type": "explode", "exercise": "Bench press"}"#;
        assert!(serde_json::from_str::<ChatAction>(raw).is_err());
    }

    #[test]
    fn test_reply_defaults() {
        let reply: ModelReply = serde_json::from_str(r#"{"response": "hi"}"#).unwrap();
        assert!(reply.actions.is_empty());
        assert_eq!(reply.response, "hi");
    }
}
