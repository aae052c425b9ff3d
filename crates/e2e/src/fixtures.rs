//! Small request-body builders shared by the specs.

use uuid::Uuid;

use arrowhead_api::{CreateTaskRequest, StepAnswers, TaskPriority};

/// A unique short suffix for names that must not collide across runs.
pub fn short_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

/// A minimal task create request with no assignees.
pub fn task(title: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.to_string(),
        description: None,
        priority: Some(TaskPriority::Medium),
        due_date: None,
        assigned_member_ids: Vec::new(),
    }
}

/// Step answers for the given `(field, value)` pairs.
pub fn answers(pairs: &[(&str, &str)]) -> StepAnswers {
    let mut answers = StepAnswers::new();
    for (field, value) in pairs {
        answers.0.insert(field.to_string(), value.to_string());
    }
    answers
}
