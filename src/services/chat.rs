// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat action pipeline.
//!
//! Turns a free-text message into a list of structured actions via the
//! language model, then applies them to the workout log one by one. The
//! pipeline is deliberately best-effort: there is no transaction around a
//! turn, a failed action is logged and skipped, and partial application of
//! a multi-action turn is expected behavior. Unparseable model output never
//! mutates anything; the caller gets their state back with an apology.

use crate::config::Config;
use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::exercise::is_cardio_unit;
use crate::models::{ChatAction, ChatRequest, ChatResponse, Exercise, ModelReply, Workout};
use crate::services::anthropic::AnthropicClient;

const DEFAULT_SETS: i64 = 3;
const DEFAULT_REPS: i64 = 8;

/// Reply used when the model's output has no parseable JSON object.
const FALLBACK_REPLY: &str = "I had trouble understanding that. Could you rephrase it?";

const SYSTEM_PROMPT: &str = r#"You are a fitness tracking assistant. Your job is to parse natural language workout commands and convert them into structured actions.

The user is logging their workout. They will tell you what exercises they did, how many sets, reps, and weight, or what cardio they did and for how long or how far.

You must respond with valid JSON in this exact format:
{
  "actions": [
    {"type": "add", "exercise": "Exercise Name", "sets": 3, "reps": 8, "weight": 135, "unit": "lbs"},
    {"type": "update", "exercise": "Exercise Name", "sets": 4},
    {"type": "delete", "exercise": "Exercise Name"},
    {"type": "note", "content": "Note text here"},
    {"type": "rename", "exercise": "Old Name", "new_name": "New Name"},
    {"type": "set_workout", "name": "Workout Name", "tag": "Lifting"}
  ],
  "response": "A brief, friendly confirmation of what you did"
}

Action types:
- "add": Add a new exercise with sets, reps, and optionally weight
- "update": Update an existing exercise (only include fields that are changing)
- "delete": Remove an exercise from the workout
- "note": Add a note to the workout
- "rename": Rename an existing exercise
- "set_workout": Set the workout's name and optionally its tag

Units: "lbs", "kg", "min", "sec", "miles", "km", "cal", "bodyweight". For cardio (units "min", "sec", "miles", "km", "cal") put the duration, distance, or calories in "weight" and leave out sets and reps.

Rules:
1. Parse common workout notation like "3x8" (3 sets of 8 reps), "3 sets of 8", etc.
2. Weight is optional - only include if specified
3. Weight is in lbs unless the user says otherwise; pass unit "kg" when they log kilograms
4. For updates, match the exercise name flexibly (e.g., "bench" should match "Bench press")
5. If user says they "skipped" an exercise, delete it
6. Keep responses brief and gym-friendly
7. If you can't understand the request, still return valid JSON with an empty actions array and helpful response
8. Always maintain proper JSON format with double quotes

The current workout and its exercises will be provided for context."#;

/// Chat service: one language-model call plus sequential action application
/// per turn.
#[derive(Clone)]
pub struct ChatService {
    client: Option<AnthropicClient>,
}

impl ChatService {
    /// Build from configuration; no API key means the service is disabled
    /// and every turn returns a misconfiguration error.
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: config
                .anthropic_api_key
                .as_ref()
                .map(|key| AnthropicClient::new(key.clone(), config.anthropic_model.clone())),
        }
    }

    /// Build with an explicit client (tests use a mock).
    pub fn with_client(client: AnthropicClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Build a disabled service (no API key configured).
    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Run one chat turn against the caller-supplied workout state.
    pub async fn handle(&self, db: &FirestoreDb, req: ChatRequest) -> Result<ChatResponse, AppError> {
        let client = self.client.as_ref().ok_or(AppError::ModelNotConfigured)?;

        let ChatRequest {
            message,
            workout_id,
            exercises,
            workout,
        } = req;

        let context = build_context(&workout, &exercises);
        let user_prompt = format!("{}\n\nUser says: \"{}\"", context, message);

        let raw = client.complete(SYSTEM_PROMPT, &user_prompt).await?;

        let Some(reply) = parse_reply(&raw) else {
            tracing::warn!(output = %raw, "Could not parse model output");
            return Ok(ChatResponse {
                response: FALLBACK_REPLY.to_string(),
                exercises,
                workout,
            });
        };

        let (workout, exercises) = self
            .apply_actions(db, &workout_id, workout, exercises, reply.actions)
            .await;

        Ok(ChatResponse {
            response: reply.response,
            exercises,
            workout,
        })
    }

    /// Apply actions strictly in order, best-effort.
    ///
    /// Each action attempts its mutation independently; a database failure
    /// or a non-matching name is logged and skipped without affecting the
    /// rest of the turn. The returned state reflects only the mutations
    /// that succeeded.
    async fn apply_actions(
        &self,
        db: &FirestoreDb,
        workout_id: &str,
        mut workout: Workout,
        mut exercises: Vec<Exercise>,
        actions: Vec<serde_json::Value>,
    ) -> (Workout, Vec<Exercise>) {
        // New rows are sequenced after the list the caller sent, so several
        // adds in one turn share an order value (display sorting tolerates
        // ties).
        let base_order = exercises.len() as i64;

        for raw in actions {
            let action: ChatAction = match serde_json::from_value(raw) {
                Ok(action) => action,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unrecognized chat action");
                    continue;
                }
            };

            match action {
                ChatAction::Add {
                    exercise,
                    sets,
                    reps,
                    weight,
                    unit,
                } => {
                    let cardio = unit.as_deref().is_some_and(is_cardio_unit);
                    let row = Exercise {
                        id: uuid::Uuid::new_v4().to_string(),
                        workout_id: workout_id.to_string(),
                        name: exercise,
                        sets: if cardio { None } else { Some(sets.unwrap_or(DEFAULT_SETS)) },
                        reps: if cardio { None } else { Some(reps.unwrap_or(DEFAULT_REPS)) },
                        weight,
                        unit,
                        order: base_order,
                        created_at: chrono::Utc::now().to_rfc3339(),
                    };
                    match db.insert_exercise(&row).await {
                        Ok(()) => exercises.push(row),
                        Err(e) => tracing::warn!(error = %e, "Chat add action failed"),
                    }
                }
                ChatAction::Update {
                    exercise,
                    sets,
                    reps,
                    weight,
                    unit,
                } => {
                    let Some(existing) = find_matching(&exercises, &exercise) else {
                        tracing::debug!(search = %exercise, "No exercise matched update action");
                        continue;
                    };
                    let mut updated = existing.clone();
                    if let Some(s) = sets {
                        updated.sets = Some(s);
                    }
                    if let Some(r) = reps {
                        updated.reps = Some(r);
                    }
                    if let Some(w) = weight {
                        updated.weight = Some(w);
                    }
                    if let Some(u) = unit {
                        updated.unit = Some(u);
                    }
                    if updated.is_cardio() {
                        updated.sets = None;
                        updated.reps = None;
                    }
                    match db.update_exercise(&updated).await {
                        Ok(()) => replace_by_id(&mut exercises, updated),
                        Err(e) => tracing::warn!(error = %e, "Chat update action failed"),
                    }
                }
                ChatAction::Delete { exercise } => {
                    let Some(existing) = find_matching(&exercises, &exercise) else {
                        tracing::debug!(search = %exercise, "No exercise matched delete action");
                        continue;
                    };
                    let id = existing.id.clone();
                    match db.delete_exercise(&id).await {
                        Ok(()) => exercises.retain(|e| e.id != id),
                        Err(e) => tracing::warn!(error = %e, "Chat delete action failed"),
                    }
                }
                ChatAction::Note { content } => {
                    let mut updated = workout.clone();
                    updated.notes = Some(match &workout.notes {
                        Some(notes) => format!("{}\n{}", notes, content),
                        None => content,
                    });
                    match db.update_workout(&updated).await {
                        Ok(()) => workout = updated,
                        Err(e) => tracing::warn!(error = %e, "Chat note action failed"),
                    }
                }
                ChatAction::Rename { exercise, new_name } => {
                    let Some(existing) = find_matching(&exercises, &exercise) else {
                        tracing::debug!(search = %exercise, "No exercise matched rename action");
                        continue;
                    };
                    let mut updated = existing.clone();
                    updated.name = new_name;
                    match db.update_exercise(&updated).await {
                        Ok(()) => replace_by_id(&mut exercises, updated),
                        Err(e) => tracing::warn!(error = %e, "Chat rename action failed"),
                    }
                }
                ChatAction::SetWorkout { name, tag } => {
                    let mut updated = workout.clone();
                    if let Some(name) = name {
                        updated.name = name;
                    }
                    if let Some(tag) = tag {
                        updated.tag = tag;
                    }
                    match db.update_workout(&updated).await {
                        Ok(()) => workout = updated,
                        Err(e) => tracing::warn!(error = %e, "Chat set_workout action failed"),
                    }
                }
            }
        }

        (workout, exercises)
    }
}

/// Serialize the current workout state for the model's context block.
fn build_context(workout: &Workout, exercises: &[Exercise]) -> String {
    let mut context = format!("Workout: \"{}\" (tag: {})\n", workout.name, workout.tag);

    if exercises.is_empty() {
        context.push_str("No exercises in this workout yet.");
    } else {
        context.push_str("Current exercises in this workout:\n");
        let lines: Vec<String> = exercises.iter().map(context_line).collect();
        context.push_str(&lines.join("\n"));
    }

    context
}

fn context_line(exercise: &Exercise) -> String {
    if exercise.is_cardio() {
        match exercise.weight {
            Some(magnitude) => format!(
                "- {}: {} {}",
                exercise.name,
                magnitude,
                exercise.unit.as_deref().unwrap_or("")
            ),
            None => format!("- {}", exercise.name),
        }
    } else {
        let mut line = format!(
            "- {}: {} sets x {} reps",
            exercise.name,
            exercise.sets.unwrap_or(0),
            exercise.reps.unwrap_or(0)
        );
        if let Some(weight) = exercise.weight {
            line.push_str(&format!(
                " @ {} {}",
                weight,
                exercise.unit.as_deref().unwrap_or("lbs")
            ));
        }
        line
    }
}

/// Pull the first brace-delimited JSON substring out of the model's text,
/// tolerating prose before and after, and parse it.
fn parse_reply(text: &str) -> Option<ModelReply> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Fuzzy exercise lookup: case-insensitive substring match in either
/// direction; first match wins, no ambiguity resolution.
fn find_matching<'a>(exercises: &'a [Exercise], search: &str) -> Option<&'a Exercise> {
    let search = search.to_lowercase();
    exercises.iter().find(|e| {
        let name = e.name.to_lowercase();
        name.contains(&search) || search.contains(&name)
    })
}

fn replace_by_id(exercises: &mut [Exercise], updated: Exercise) {
    if let Some(slot) = exercises.iter_mut().find(|e| e.id == updated.id) {
        *slot = updated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_exercise(id: &str, name: &str) -> Exercise {
        Exercise {
            id: id.to_string(),
            workout_id: "w1".to_string(),
            name: name.to_string(),
            sets: Some(3),
            reps: Some(8),
            weight: Some(135.0),
            unit: None,
            order: 0,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn make_workout() -> Workout {
        Workout {
            id: "w1".to_string(),
            user_id: "u1".to_string(),
            name: "Custom".to_string(),
            tag: "Lifting".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            notes: None,
            created_at: "2026-01-05T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_parse_reply_with_surrounding_prose() {
        let raw = r#"Sure, done! {"actions": [], "response": "Logged it"} Anything else?"#;
        let reply = parse_reply(raw).unwrap();
        assert!(reply.actions.is_empty());
        assert_eq!(reply.response, "Logged it");
    }

    #[test]
    fn test_parse_reply_without_json_fails() {
        assert!(parse_reply("No JSON here at all").is_none());
        assert!(parse_reply("} backwards {").is_none());
        assert!(parse_reply("{not valid json}").is_none());
    }

    #[test]
    fn test_fuzzy_match_is_bidirectional_and_case_insensitive() {
        let exercises = vec![
            make_exercise("e1", "Bench Press"),
            make_exercise("e2", "Squats"),
        ];

        // Search term contained in stored name
        assert_eq!(find_matching(&exercises, "bench").unwrap().id, "e1");
        // Stored name contained in search term
        assert_eq!(
            find_matching(&exercises, "Incline Bench Press").unwrap().id,
            "e1"
        );
        assert_eq!(find_matching(&exercises, "SQUATS").unwrap().id, "e2");
        assert!(find_matching(&exercises, "Deadlift").is_none());
    }

    #[test]
    fn test_fuzzy_match_first_wins() {
        let exercises = vec![
            make_exercise("e1", "Incline bench press"),
            make_exercise("e2", "Bench press"),
        ];
        assert_eq!(find_matching(&exercises, "bench").unwrap().id, "e1");
    }

    #[test]
    fn test_context_block_shapes() {
        let workout = make_workout();
        assert!(build_context(&workout, &[]).contains("No exercises in this workout yet."));

        let mut cardio = make_exercise("e1", "Running");
        cardio.sets = None;
        cardio.reps = None;
        cardio.weight = Some(30.0);
        cardio.unit = Some("min".to_string());

        let context = build_context(&workout, &[make_exercise("e2", "Bench press"), cardio]);
        assert!(context.contains("- Bench press: 3 sets x 8 reps @ 135 lbs"));
        assert!(context.contains("- Running: 30 min"));
    }

    #[tokio::test]
    async fn test_failed_mutations_leave_state_unchanged() {
        // Offline database: every mutation fails, so best-effort application
        // must return the caller's state untouched.
        let db = FirestoreDb::new_mock();
        let service = ChatService::with_client(AnthropicClient::new_mock_fn(|_, _| {
            r#"{"actions": [
                {"type": "add", "exercise": "Deadlift", "sets": 5, "reps": 5},
                {"type": "delete", "exercise": "bench"},
                {"type": "note", "content": "felt heavy"}
            ], "response": "Updated your log"}"#
                .to_string()
        }));

        let req = ChatRequest {
            message: "log it".to_string(),
            workout_id: "w1".to_string(),
            exercises: vec![make_exercise("e1", "Bench press")],
            workout: make_workout(),
        };

        let resp = service.handle(&db, req).await.unwrap();
        assert_eq!(resp.response, "Updated your log");
        assert_eq!(resp.exercises.len(), 1);
        assert_eq!(resp.exercises[0].name, "Bench press");
        assert_eq!(resp.workout.notes, None);
    }

    #[tokio::test]
    async fn test_malformed_output_soft_fails() {
        let db = FirestoreDb::new_mock();
        let service = ChatService::with_client(AnthropicClient::new_mock_fn(|_, _| {
            "I could not figure that one out, sorry.".to_string()
        }));

        let req = ChatRequest {
            message: "???".to_string(),
            workout_id: "w1".to_string(),
            exercises: vec![make_exercise("e1", "Bench press")],
            workout: make_workout(),
        };

        let resp = service.handle(&db, req).await.unwrap();
        assert_eq!(resp.response, FALLBACK_REPLY);
        assert_eq!(resp.exercises.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_service_reports_misconfiguration() {
        let db = FirestoreDb::new_mock();
        let service = ChatService::disabled();

        let req = ChatRequest {
            message: "hi".to_string(),
            workout_id: "w1".to_string(),
            exercises: vec![],
            workout: make_workout(),
        };

        let err = service.handle(&db, req).await.unwrap_err();
        assert!(matches!(err, AppError::ModelNotConfigured));
    }

    #[tokio::test]
    async fn test_malformed_action_is_skipped_not_fatal() {
        let db = FirestoreDb::new_mock();
        let service = ChatService::with_client(AnthropicClient::new_mock_fn(|_, _| {
            r#"{"actions": [
                {"type": "hallucinated_kind", "exercise": "Bench press"},
                {"kind": "missing type tag"}
            ], "response": "Done"}"#
                .to_string()
        }));

        let req = ChatRequest {
            message: "do something odd".to_string(),
            workout_id: "w1".to_string(),
            exercises: vec![],
            workout: make_workout(),
        };

        // Turn still completes with the model's reply.
        let resp = service.handle(&db, req).await.unwrap();
        assert_eq!(resp.response, "Done");
        assert!(resp.exercises.is_empty());
    }
}
