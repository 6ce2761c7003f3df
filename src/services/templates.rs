// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed workout templates offered by the new-workout flow.
//!
//! Templates are in-code data; creating a workout from one copies its
//! exercise list. The "custom" template is the empty placeholder the chat
//! assistant can later name via `set_workout`.

/// Seed exercise inside a template.
pub struct TemplateExercise {
    pub name: &'static str,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
}

/// A selectable workout template.
pub struct WorkoutTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub tag: &'static str,
    pub exercises: &'static [TemplateExercise],
}

pub const WORKOUT_TEMPLATES: [WorkoutTemplate; 4] = [
    WorkoutTemplate {
        id: "back-day",
        name: "Back Day",
        tag: "Lifting",
        exercises: &[
            TemplateExercise { name: "Pull ups", sets: 3, reps: 8, weight: None },
            TemplateExercise { name: "Face pulls", sets: 3, reps: 12, weight: None },
            TemplateExercise { name: "Dumbbell curls", sets: 3, reps: 10, weight: None },
            TemplateExercise { name: "Rows", sets: 3, reps: 8, weight: None },
        ],
    },
    WorkoutTemplate {
        id: "chest-day",
        name: "Chest Day",
        tag: "Lifting",
        exercises: &[
            TemplateExercise { name: "Bench press", sets: 3, reps: 8, weight: None },
            TemplateExercise { name: "Incline dumbbell press", sets: 3, reps: 10, weight: None },
            TemplateExercise { name: "Cable flyes", sets: 3, reps: 12, weight: None },
            TemplateExercise { name: "Dips", sets: 3, reps: 10, weight: None },
        ],
    },
    WorkoutTemplate {
        id: "leg-day",
        name: "Leg Day",
        tag: "Lifting",
        exercises: &[
            TemplateExercise { name: "Squats", sets: 4, reps: 8, weight: None },
            TemplateExercise { name: "Romanian deadlifts", sets: 3, reps: 10, weight: None },
            TemplateExercise { name: "Leg press", sets: 3, reps: 12, weight: None },
            TemplateExercise { name: "Calf raises", sets: 4, reps: 15, weight: None },
        ],
    },
    WorkoutTemplate {
        id: "custom",
        name: "Custom",
        tag: "Lifting",
        exercises: &[],
    },
];

/// Look up a template by id.
pub fn find_template(id: &str) -> Option<&'static WorkoutTemplate> {
    WORKOUT_TEMPLATES.iter().find(|t| t.id == id)
}
