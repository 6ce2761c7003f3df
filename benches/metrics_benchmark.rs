use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ironlog::models::{Exercise, Workout};
use ironlog::services::metrics::compute_metrics;
use std::collections::HashMap;

fn two_week_fixture(today: NaiveDate) -> (Vec<Workout>, HashMap<String, Vec<Exercise>>) {
    let mut workouts = Vec::new();
    let mut exercises_by_workout = HashMap::new();

    for days_back in 0..14 {
        let id = format!("w{}", days_back);
        workouts.push(Workout {
            id: id.clone(),
            user_id: "bench-user".to_string(),
            name: format!("Workout {}", days_back),
            tag: "Lifting".to_string(),
            date: today - Duration::days(days_back),
            notes: None,
            created_at: "2026-03-01T10:00:00Z".to_string(),
        });

        let exercises: Vec<Exercise> = (0..8)
            .map(|n| Exercise {
                id: format!("{}-e{}", id, n),
                workout_id: id.clone(),
                name: format!("Exercise {}", n),
                sets: Some(3 + n % 2),
                reps: Some(8 + n),
                weight: Some(45.0 + 5.0 * n as f64),
                unit: if n % 4 == 0 {
                    Some("kg".to_string())
                } else {
                    None
                },
                order: n,
                created_at: "2026-03-01T10:00:00Z".to_string(),
            })
            .collect();

        exercises_by_workout.insert(id, exercises);
    }

    (workouts, exercises_by_workout)
}

fn benchmark_compute_metrics(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date");
    let (workouts, exercises_by_workout) = two_week_fixture(today);

    c.bench_function("compute_metrics_two_week_window", |b| {
        b.iter(|| {
            compute_metrics(
                black_box(today),
                black_box(&workouts),
                black_box(&exercises_by_workout),
            )
        })
    });
}

criterion_group!(benches, benchmark_compute_metrics);
criterion_main!(benches);
