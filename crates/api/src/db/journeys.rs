//! Guest journey session + task query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::{JourneySessions, JourneyTasks};
use super::Built;

// ── Sessions ──────────────────────────────────────────────────────────────

/// Column list for session SELECT queries, in row-mapper order.
fn session_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.columns([
        JourneySessions::Id,
        JourneySessions::SessionId,
        JourneySessions::Module,
        JourneySessions::StepData,
        JourneySessions::CompletedSteps,
        JourneySessions::CurrentStep,
        JourneySessions::IsCompleted,
        JourneySessions::CompletedAt,
        JourneySessions::CreatedAt,
        JourneySessions::UpdatedAt,
    ])
}

/// INSERT a new session.
pub fn session_insert(
    id: &str,
    session_id: &str,
    module: &str,
    step_data_json: &str,
    current_step: u32,
) -> Built {
    Query::insert()
        .into_table(JourneySessions::Table)
        .columns([
            JourneySessions::Id,
            JourneySessions::SessionId,
            JourneySessions::Module,
            JourneySessions::StepData,
            JourneySessions::CurrentStep,
        ])
        .values_panic([
            id.into(),
            session_id.into(),
            module.into(),
            step_data_json.into(),
            current_step.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// SELECT a session by its client-chosen session_id.
pub fn session_get(session_id: &str) -> Built {
    let mut q = Query::select().to_owned();
    session_columns(&mut q);
    q.from(JourneySessions::Table)
        .and_where(Expr::col(JourneySessions::SessionId).eq(session_id))
        .build(SqliteQueryBuilder)
}

/// Update a single column, bumping updated_at.
fn session_update_column(session_id: &str, col: JourneySessions, value: sea_query::Value) -> Built {
    Query::update()
        .table(JourneySessions::Table)
        .value(col, value)
        .value(JourneySessions::UpdatedAt, Expr::cust("datetime('now')"))
        .and_where(Expr::col(JourneySessions::SessionId).eq(session_id))
        .build(SqliteQueryBuilder)
}

pub fn session_update_step_data(session_id: &str, json: &str) -> Built {
    session_update_column(session_id, JourneySessions::StepData, json.into())
}

pub fn session_update_completed_steps(session_id: &str, json: &str) -> Built {
    session_update_column(session_id, JourneySessions::CompletedSteps, json.into())
}

pub fn session_update_current_step(session_id: &str, step: u32) -> Built {
    session_update_column(session_id, JourneySessions::CurrentStep, step.into())
}

pub fn session_update_completed(session_id: &str, is_completed: bool) -> Built {
    session_update_column(session_id, JourneySessions::IsCompleted, is_completed.into())
}

pub fn session_update_completed_at(session_id: &str, completed_at: &str) -> Built {
    session_update_column(session_id, JourneySessions::CompletedAt, completed_at.into())
}

// ── Session tasks ─────────────────────────────────────────────────────────

/// Column list for journey-task SELECT queries, in row-mapper order.
fn task_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.columns([
        JourneyTasks::Id,
        JourneyTasks::SessionId,
        JourneyTasks::Title,
        JourneyTasks::Description,
        JourneyTasks::Status,
        JourneyTasks::Priority,
        JourneyTasks::DueDate,
        JourneyTasks::CreatedAt,
        JourneyTasks::UpdatedAt,
    ])
}

/// INSERT a session task.
pub fn task_insert(
    id: &str,
    session_id: &str,
    title: &str,
    description: Option<&str>,
    status: &str,
    priority: &str,
    due_date: Option<&str>,
) -> Built {
    Query::insert()
        .into_table(JourneyTasks::Table)
        .columns([
            JourneyTasks::Id,
            JourneyTasks::SessionId,
            JourneyTasks::Title,
            JourneyTasks::Description,
            JourneyTasks::Status,
            JourneyTasks::Priority,
            JourneyTasks::DueDate,
        ])
        .values_panic([
            id.into(),
            session_id.into(),
            title.into(),
            description.map(|s| s.to_string()).into(),
            status.into(),
            priority.into(),
            due_date.map(|s| s.to_string()).into(),
        ])
        .build(SqliteQueryBuilder)
}

/// SELECT a session task by id.
pub fn task_get(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    task_columns(&mut q);
    q.from(JourneyTasks::Table)
        .and_where(Expr::col(JourneyTasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// List a session's tasks, oldest first.
pub fn tasks_for_session(session_id: &str) -> Built {
    let mut q = Query::select().to_owned();
    task_columns(&mut q);
    q.from(JourneyTasks::Table)
        .and_where(Expr::col(JourneyTasks::SessionId).eq(session_id))
        .order_by(JourneyTasks::CreatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Update a single column, bumping updated_at.
fn task_update_column(id: &str, col: JourneyTasks, value: sea_query::Value) -> Built {
    Query::update()
        .table(JourneyTasks::Table)
        .value(col, value)
        .value(JourneyTasks::UpdatedAt, Expr::cust("datetime('now')"))
        .and_where(Expr::col(JourneyTasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn task_update_title(id: &str, title: &str) -> Built {
    task_update_column(id, JourneyTasks::Title, title.into())
}

pub fn task_update_description(id: &str, description: &str) -> Built {
    task_update_column(id, JourneyTasks::Description, description.into())
}

pub fn task_update_status(id: &str, status: &str) -> Built {
    task_update_column(id, JourneyTasks::Status, status.into())
}

pub fn task_update_priority(id: &str, priority: &str) -> Built {
    task_update_column(id, JourneyTasks::Priority, priority.into())
}

pub fn task_update_due_date(id: &str, due_date: &str) -> Built {
    task_update_column(id, JourneyTasks::DueDate, due_date.into())
}

/// DELETE a session task.
pub fn task_delete(id: &str) -> Built {
    Query::delete()
        .from_table(JourneyTasks::Table)
        .and_where(Expr::col(JourneyTasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}
