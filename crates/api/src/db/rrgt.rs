//! RRGT plan / subtask / rabbit query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::{Objectives, RrgtPlans, RrgtRabbits, RrgtSubtasks, Tasks};
use super::Built;

// ── Plans ─────────────────────────────────────────────────────────────────

/// INSERT a new plan.
pub fn plan_insert(
    id: &str,
    task_id: &str,
    team_member_id: &str,
    project_id: &str,
    objective_id: &str,
    max_column_index: i64,
) -> Built {
    Query::insert()
        .into_table(RrgtPlans::Table)
        .columns([
            RrgtPlans::Id,
            RrgtPlans::TaskId,
            RrgtPlans::TeamMemberId,
            RrgtPlans::ProjectId,
            RrgtPlans::ObjectiveId,
            RrgtPlans::MaxColumnIndex,
        ])
        .values_panic([
            id.into(),
            task_id.into(),
            team_member_id.into(),
            project_id.into(),
            objective_id.into(),
            max_column_index.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// A member's plan for a task, if provisioned: (plan id).
pub fn plan_for_task(task_id: &str, team_member_id: &str) -> Built {
    Query::select()
        .column(RrgtPlans::Id)
        .from(RrgtPlans::Table)
        .and_where(Expr::col(RrgtPlans::TaskId).eq(task_id))
        .and_where(Expr::col(RrgtPlans::TeamMemberId).eq(team_member_id))
        .build(SqliteQueryBuilder)
}

/// A plan owned by a member: (id, max_column_index).
pub fn plan_owned(plan_id: &str, team_member_id: &str) -> Built {
    Query::select()
        .columns([RrgtPlans::Id, RrgtPlans::MaxColumnIndex])
        .from(RrgtPlans::Table)
        .and_where(Expr::col(RrgtPlans::Id).eq(plan_id))
        .and_where(Expr::col(RrgtPlans::TeamMemberId).eq(team_member_id))
        .build(SqliteQueryBuilder)
}

/// A member's plans joined with task and objective summaries, with optional
/// project/objective filters. Row order:
/// (plan id, task_id, team_member_id, project_id, objective_id,
///  max_column_index,
///  task title, task status, task priority, task due_date,
///  objective name,
///  rabbit current_column_index, rabbit updated_at).
pub fn plans_for_member(
    team_member_id: &str,
    project_id: Option<&str>,
    objective_id: Option<&str>,
) -> Built {
    let mut q = Query::select()
        .column((RrgtPlans::Table, RrgtPlans::Id))
        .column((RrgtPlans::Table, RrgtPlans::TaskId))
        .column((RrgtPlans::Table, RrgtPlans::TeamMemberId))
        .column((RrgtPlans::Table, RrgtPlans::ProjectId))
        .column((RrgtPlans::Table, RrgtPlans::ObjectiveId))
        .column((RrgtPlans::Table, RrgtPlans::MaxColumnIndex))
        .column((Tasks::Table, Tasks::Title))
        .column((Tasks::Table, Tasks::Status))
        .column((Tasks::Table, Tasks::Priority))
        .column((Tasks::Table, Tasks::DueDate))
        .column((Objectives::Table, Objectives::Name))
        .column((RrgtRabbits::Table, RrgtRabbits::CurrentColumnIndex))
        .column((RrgtRabbits::Table, RrgtRabbits::UpdatedAt))
        .from(RrgtPlans::Table)
        .inner_join(
            Tasks::Table,
            Expr::col((Tasks::Table, Tasks::Id)).equals((RrgtPlans::Table, RrgtPlans::TaskId)),
        )
        .inner_join(
            Objectives::Table,
            Expr::col((Objectives::Table, Objectives::Id))
                .equals((RrgtPlans::Table, RrgtPlans::ObjectiveId)),
        )
        .left_join(
            RrgtRabbits::Table,
            Expr::col((RrgtRabbits::Table, RrgtRabbits::PlanId))
                .equals((RrgtPlans::Table, RrgtPlans::Id)),
        )
        .and_where(Expr::col((RrgtPlans::Table, RrgtPlans::TeamMemberId)).eq(team_member_id))
        .to_owned();
    if let Some(pid) = project_id {
        q.and_where(Expr::col((RrgtPlans::Table, RrgtPlans::ProjectId)).eq(pid));
    }
    if let Some(oid) = objective_id {
        q.and_where(Expr::col((RrgtPlans::Table, RrgtPlans::ObjectiveId)).eq(oid));
    }
    q.order_by((RrgtPlans::Table, RrgtPlans::CreatedAt), Order::Asc)
        .build(SqliteQueryBuilder)
}

// ── Subtasks ──────────────────────────────────────────────────────────────

/// INSERT a subtask cell.
pub fn subtask_insert(id: &str, plan_id: &str, column_index: i64, text: Option<&str>) -> Built {
    Query::insert()
        .into_table(RrgtSubtasks::Table)
        .columns([
            RrgtSubtasks::Id,
            RrgtSubtasks::PlanId,
            RrgtSubtasks::ColumnIndex,
            RrgtSubtasks::Text,
        ])
        .values_panic([
            id.into(),
            plan_id.into(),
            column_index.into(),
            text.map(|s| s.to_string()).into(),
        ])
        .build(SqliteQueryBuilder)
}

/// Upsert a subtask cell's text.
pub fn subtask_upsert(id: &str, plan_id: &str, column_index: i64, text: &str) -> Built {
    let sql = "INSERT INTO rrgt_subtasks (id, plan_id, column_index, text) \
               VALUES (?, ?, ?, ?) \
               ON CONFLICT(plan_id, column_index) DO UPDATE SET \
               text = excluded.text, updated_at = datetime('now')"
        .to_string();
    let values = sea_query::Values(vec![
        id.into(),
        plan_id.into(),
        column_index.into(),
        text.into(),
    ]);
    (sql, values)
}

/// A plan's subtask cells by column:
/// (id, plan_id, column_index, text, updated_at).
pub fn subtasks_for_plan(plan_id: &str) -> Built {
    Query::select()
        .columns([
            RrgtSubtasks::Id,
            RrgtSubtasks::PlanId,
            RrgtSubtasks::ColumnIndex,
            RrgtSubtasks::Text,
            RrgtSubtasks::UpdatedAt,
        ])
        .from(RrgtSubtasks::Table)
        .and_where(Expr::col(RrgtSubtasks::PlanId).eq(plan_id))
        .order_by(RrgtSubtasks::ColumnIndex, Order::Asc)
        .build(SqliteQueryBuilder)
}

/// The single cell at a column, if any: (id, text).
pub fn subtask_at(plan_id: &str, column_index: i64) -> Built {
    Query::select()
        .columns([
            RrgtSubtasks::Id,
            RrgtSubtasks::PlanId,
            RrgtSubtasks::ColumnIndex,
            RrgtSubtasks::Text,
            RrgtSubtasks::UpdatedAt,
        ])
        .from(RrgtSubtasks::Table)
        .and_where(Expr::col(RrgtSubtasks::PlanId).eq(plan_id))
        .and_where(Expr::col(RrgtSubtasks::ColumnIndex).eq(column_index))
        .build(SqliteQueryBuilder)
}

// ── Rabbits ───────────────────────────────────────────────────────────────

/// INSERT a rabbit at a column.
pub fn rabbit_insert(plan_id: &str, column_index: i64) -> Built {
    Query::insert()
        .into_table(RrgtRabbits::Table)
        .columns([RrgtRabbits::PlanId, RrgtRabbits::CurrentColumnIndex])
        .values_panic([plan_id.into(), column_index.into()])
        .build(SqliteQueryBuilder)
}

/// Upsert a rabbit's position.
pub fn rabbit_upsert(plan_id: &str, column_index: i64) -> Built {
    let sql = "INSERT INTO rrgt_rabbits (plan_id, current_column_index) \
               VALUES (?, ?) \
               ON CONFLICT(plan_id) DO UPDATE SET \
               current_column_index = excluded.current_column_index, \
               updated_at = datetime('now')"
        .to_string();
    let values = sea_query::Values(vec![plan_id.into(), column_index.into()]);
    (sql, values)
}

/// A plan's rabbit: (plan_id, current_column_index, updated_at).
pub fn rabbit_get(plan_id: &str) -> Built {
    Query::select()
        .columns([
            RrgtRabbits::PlanId,
            RrgtRabbits::CurrentColumnIndex,
            RrgtRabbits::UpdatedAt,
        ])
        .from(RrgtRabbits::Table)
        .and_where(Expr::col(RrgtRabbits::PlanId).eq(plan_id))
        .build(SqliteQueryBuilder)
}
