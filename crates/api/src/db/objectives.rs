//! Objective + edit-lock query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::tables::{ObjectiveLocks, Objectives};
use super::Built;

/// Column list for objective SELECT queries, in row-mapper order.
fn objective_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.columns([
        Objectives::Id,
        Objectives::ProjectId,
        Objectives::Name,
        Objectives::CurrentStep,
        Objectives::JourneyStatus,
        Objectives::TargetCompletionDate,
        Objectives::ActualCompletionDate,
        Objectives::IsArchived,
        Objectives::CreatedAt,
        Objectives::UpdatedAt,
    ])
}

/// INSERT a new objective.
pub fn insert(
    id: &str,
    project_id: &str,
    name: &str,
    current_step: u32,
    target_completion_date: Option<&str>,
) -> Built {
    Query::insert()
        .into_table(Objectives::Table)
        .columns([
            Objectives::Id,
            Objectives::ProjectId,
            Objectives::Name,
            Objectives::CurrentStep,
            Objectives::TargetCompletionDate,
        ])
        .values_panic([
            id.into(),
            project_id.into(),
            name.into(),
            current_step.into(),
            target_completion_date.map(|s| s.to_string()).into(),
        ])
        .build(SqliteQueryBuilder)
}

/// SELECT a single objective's summary columns.
pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    objective_columns(&mut q);
    q.from(Objectives::Table)
        .and_where(Expr::col(Objectives::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// SELECT an objective's three step-answer JSON columns.
pub fn get_step_data(id: &str) -> Built {
    Query::select()
        .columns([
            Objectives::BrainstormData,
            Objectives::ChooseData,
            Objectives::ObjectivesData,
        ])
        .from(Objectives::Table)
        .and_where(Expr::col(Objectives::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// List a project's objectives, oldest first.
pub fn list_for_project(
    project_id: &str,
    include_archived: bool,
    journey_status: Option<&str>,
) -> Built {
    let mut q = Query::select().to_owned();
    objective_columns(&mut q);
    q.from(Objectives::Table)
        .and_where(Expr::col(Objectives::ProjectId).eq(project_id));
    if !include_archived {
        q.and_where(Expr::col(Objectives::IsArchived).eq(false));
    }
    if let Some(status) = journey_status {
        q.and_where(Expr::col(Objectives::JourneyStatus).eq(status));
    }
    q.order_by(Objectives::CreatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}

/// The project an objective belongs to.
pub fn project_of(id: &str) -> Built {
    Query::select()
        .column(Objectives::ProjectId)
        .from(Objectives::Table)
        .and_where(Expr::col(Objectives::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Update a single column, bumping updated_at.
fn update_column(id: &str, col: Objectives, value: sea_query::Value) -> Built {
    Query::update()
        .table(Objectives::Table)
        .value(col, value)
        .value(Objectives::UpdatedAt, Expr::cust("datetime('now')"))
        .and_where(Expr::col(Objectives::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn update_name(id: &str, name: &str) -> Built {
    update_column(id, Objectives::Name, name.into())
}

pub fn update_current_step(id: &str, step: u32) -> Built {
    update_column(id, Objectives::CurrentStep, step.into())
}

pub fn update_journey_status(id: &str, status: &str) -> Built {
    update_column(id, Objectives::JourneyStatus, status.into())
}

pub fn update_target_completion_date(id: &str, date: &str) -> Built {
    update_column(id, Objectives::TargetCompletionDate, date.into())
}

pub fn update_actual_completion_date(id: &str, date: &str) -> Built {
    update_column(id, Objectives::ActualCompletionDate, date.into())
}

pub fn update_archived(id: &str, is_archived: bool) -> Built {
    update_column(id, Objectives::IsArchived, is_archived.into())
}

/// Overwrite one module's step-answer JSON column.
pub fn update_step_data(id: &str, col: Objectives, json: &str) -> Built {
    update_column(id, col, json.into())
}

/// DELETE an objective (cascades to tasks, plans, touchbases).
pub fn delete(id: &str) -> Built {
    Query::delete()
        .from_table(Objectives::Table)
        .and_where(Expr::col(Objectives::Id).eq(id))
        .build(SqliteQueryBuilder)
}

// ── Edit locks ────────────────────────────────────────────────────────────

/// The lock row for an objective: (team_member_id, expires_at).
pub fn lock_get(objective_id: &str) -> Built {
    Query::select()
        .columns([ObjectiveLocks::TeamMemberId, ObjectiveLocks::ExpiresAt])
        .from(ObjectiveLocks::Table)
        .and_where(Expr::col(ObjectiveLocks::ObjectiveId).eq(objective_id))
        .build(SqliteQueryBuilder)
}

/// Upsert a lock: insert, or take over/renew on conflict.
///
/// The caller has already checked that any existing live lock belongs to the
/// same member; expired locks may be overwritten freely.
pub fn lock_upsert(objective_id: &str, team_member_id: &str, expires_at: u64) -> Built {
    let sql = "INSERT INTO objective_locks (objective_id, team_member_id, expires_at) \
               VALUES (?, ?, ?) \
               ON CONFLICT(objective_id) DO UPDATE SET \
               team_member_id = excluded.team_member_id, \
               expires_at = excluded.expires_at"
        .to_string();
    let values = sea_query::Values(vec![
        objective_id.into(),
        team_member_id.into(),
        (expires_at as i64).into(),
    ]);
    (sql, values)
}

/// DELETE a member's own lock.
pub fn lock_release(objective_id: &str, team_member_id: &str) -> Built {
    Query::delete()
        .from_table(ObjectiveLocks::Table)
        .and_where(Expr::col(ObjectiveLocks::ObjectiveId).eq(objective_id))
        .and_where(Expr::col(ObjectiveLocks::TeamMemberId).eq(team_member_id))
        .build(SqliteQueryBuilder)
}

/// Reap expired lock rows.
pub fn lock_reap(now_unix: u64) -> Built {
    Query::delete()
        .from_table(ObjectiveLocks::Table)
        .and_where(Expr::col(ObjectiveLocks::ExpiresAt).lte(now_unix as i64))
        .build(SqliteQueryBuilder)
}
