//! Scoreboard task + assignment query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use super::tables::{TaskAssignments, Tasks, Users};
use super::Built;

/// Column list for task SELECT queries, in row-mapper order.
fn task_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.columns([
        Tasks::Id,
        Tasks::ObjectiveId,
        Tasks::Title,
        Tasks::Description,
        Tasks::Status,
        Tasks::Priority,
        Tasks::DueDate,
        Tasks::SortOrder,
        Tasks::CreatedAt,
        Tasks::UpdatedAt,
    ])
}

/// INSERT a new task at the given sort position.
#[allow(clippy::too_many_arguments)]
pub fn insert(
    id: &str,
    objective_id: &str,
    title: &str,
    description: Option<&str>,
    status: &str,
    priority: &str,
    due_date: Option<&str>,
    sort_order: i64,
) -> Built {
    Query::insert()
        .into_table(Tasks::Table)
        .columns([
            Tasks::Id,
            Tasks::ObjectiveId,
            Tasks::Title,
            Tasks::Description,
            Tasks::Status,
            Tasks::Priority,
            Tasks::DueDate,
            Tasks::SortOrder,
        ])
        .values_panic([
            id.into(),
            objective_id.into(),
            title.into(),
            description.map(|s| s.to_string()).into(),
            status.into(),
            priority.into(),
            due_date.map(|s| s.to_string()).into(),
            sort_order.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// SELECT a single task by id.
pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    task_columns(&mut q);
    q.from(Tasks::Table)
        .and_where(Expr::col(Tasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// List an objective's tasks by sort order.
pub fn list_for_objective(objective_id: &str) -> Built {
    let mut q = Query::select().to_owned();
    task_columns(&mut q);
    q.from(Tasks::Table)
        .and_where(Expr::col(Tasks::ObjectiveId).eq(objective_id))
        .order_by(Tasks::SortOrder, Order::Asc)
        .order_by(Tasks::CreatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Ids of an objective's tasks (for reorder validation).
pub fn ids_for_objective(objective_id: &str) -> Built {
    Query::select()
        .column(Tasks::Id)
        .from(Tasks::Table)
        .and_where(Expr::col(Tasks::ObjectiveId).eq(objective_id))
        .build(SqliteQueryBuilder)
}

/// Next sort position for an objective (max + 1, COALESCEd to 0).
pub fn next_sort_order(objective_id: &str) -> Built {
    Query::select()
        .expr_as(
            Expr::cust("COALESCE(MAX(sort_order) + 1, 0)"),
            Alias::new("next"),
        )
        .from(Tasks::Table)
        .and_where(Expr::col(Tasks::ObjectiveId).eq(objective_id))
        .build(SqliteQueryBuilder)
}

/// Set one task's sort position.
pub fn set_sort_order(id: &str, sort_order: i64) -> Built {
    Query::update()
        .table(Tasks::Table)
        .value(Tasks::SortOrder, sort_order)
        .and_where(Expr::col(Tasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Update a single column, bumping updated_at.
fn update_column(id: &str, col: Tasks, value: sea_query::Value) -> Built {
    Query::update()
        .table(Tasks::Table)
        .value(col, value)
        .value(Tasks::UpdatedAt, Expr::cust("datetime('now')"))
        .and_where(Expr::col(Tasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn update_title(id: &str, title: &str) -> Built {
    update_column(id, Tasks::Title, title.into())
}

pub fn update_description(id: &str, description: &str) -> Built {
    update_column(id, Tasks::Description, description.into())
}

pub fn update_status(id: &str, status: &str) -> Built {
    update_column(id, Tasks::Status, status.into())
}

pub fn update_priority(id: &str, priority: &str) -> Built {
    update_column(id, Tasks::Priority, priority.into())
}

pub fn update_due_date(id: &str, due_date: &str) -> Built {
    update_column(id, Tasks::DueDate, due_date.into())
}

/// DELETE a task.
pub fn delete(id: &str) -> Built {
    Query::delete()
        .from_table(Tasks::Table)
        .and_where(Expr::col(Tasks::Id).eq(id))
        .build(SqliteQueryBuilder)
}

// ── Assignments ───────────────────────────────────────────────────────────

/// INSERT a task assignment.
pub fn assignment_insert(task_id: &str, team_member_id: &str) -> Built {
    Query::insert()
        .into_table(TaskAssignments::Table)
        .columns([TaskAssignments::TaskId, TaskAssignments::TeamMemberId])
        .values_panic([task_id.into(), team_member_id.into()])
        .build(SqliteQueryBuilder)
}

/// DELETE all assignments of a task (before a full-set replace).
pub fn assignment_clear(task_id: &str) -> Built {
    Query::delete()
        .from_table(TaskAssignments::Table)
        .and_where(Expr::col(TaskAssignments::TaskId).eq(task_id))
        .build(SqliteQueryBuilder)
}

/// Assignees of a task with display names: (team_member_id, display_name).
pub fn assignment_list(task_id: &str) -> Built {
    use super::tables::TeamMembers;
    Query::select()
        .column((TaskAssignments::Table, TaskAssignments::TeamMemberId))
        .column((Users::Table, Users::DisplayName))
        .from(TaskAssignments::Table)
        .inner_join(
            TeamMembers::Table,
            Expr::col((TeamMembers::Table, TeamMembers::Id))
                .equals((TaskAssignments::Table, TaskAssignments::TeamMemberId)),
        )
        .inner_join(
            Users::Table,
            Expr::col((Users::Table, Users::Id)).equals((TeamMembers::Table, TeamMembers::UserId)),
        )
        .and_where(Expr::col((TaskAssignments::Table, TaskAssignments::TaskId)).eq(task_id))
        .build(SqliteQueryBuilder)
}

/// Task ids assigned to a member.
pub fn task_ids_for_member(team_member_id: &str) -> Built {
    Query::select()
        .column(TaskAssignments::TaskId)
        .from(TaskAssignments::Table)
        .and_where(Expr::col(TaskAssignments::TeamMemberId).eq(team_member_id))
        .build(SqliteQueryBuilder)
}

/// Whether a member is assigned to a task.
pub fn assignment_exists(task_id: &str, team_member_id: &str) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(TaskAssignments::Table)
        .and_where(Expr::col(TaskAssignments::TaskId).eq(task_id))
        .and_where(Expr::col(TaskAssignments::TeamMemberId).eq(team_member_id))
        .build(SqliteQueryBuilder)
}
