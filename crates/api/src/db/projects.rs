//! Project query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use super::tables::Projects;
use super::Built;

/// Column list for project SELECT queries, in row-mapper order.
fn project_columns(q: &mut sea_query::SelectStatement) -> &mut sea_query::SelectStatement {
    q.columns([
        Projects::Id,
        Projects::TeamId,
        Projects::Name,
        Projects::Vision,
        Projects::CompletionStatus,
        Projects::EstimatedCompletionDate,
        Projects::IsArchived,
        Projects::CreatedAt,
        Projects::UpdatedAt,
    ])
}

/// INSERT a new project.
pub fn insert(
    id: &str,
    team_id: &str,
    name: &str,
    vision: Option<&str>,
    estimated_completion_date: Option<&str>,
) -> Built {
    Query::insert()
        .into_table(Projects::Table)
        .columns([
            Projects::Id,
            Projects::TeamId,
            Projects::Name,
            Projects::Vision,
            Projects::EstimatedCompletionDate,
        ])
        .values_panic([
            id.into(),
            team_id.into(),
            name.into(),
            vision.map(|s| s.to_string()).into(),
            estimated_completion_date.map(|s| s.to_string()).into(),
        ])
        .build(SqliteQueryBuilder)
}

/// SELECT a single project by id.
pub fn get_by_id(id: &str) -> Built {
    let mut q = Query::select().to_owned();
    project_columns(&mut q);
    q.from(Projects::Table)
        .and_where(Expr::col(Projects::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// List a team's projects, oldest first.
pub fn list_for_team(team_id: &str, include_archived: bool) -> Built {
    let mut q = Query::select().to_owned();
    project_columns(&mut q);
    q.from(Projects::Table)
        .and_where(Expr::col(Projects::TeamId).eq(team_id));
    if !include_archived {
        q.and_where(Expr::col(Projects::IsArchived).eq(false));
    }
    q.order_by(Projects::CreatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Duplicate-name check within a team, excluding `exclude_id` when renaming.
pub fn name_taken(team_id: &str, name: &str, exclude_id: Option<&str>) -> Built {
    let mut q = Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Projects::Table)
        .and_where(Expr::col(Projects::TeamId).eq(team_id))
        .and_where(Expr::col(Projects::Name).eq(name))
        .to_owned();
    if let Some(id) = exclude_id {
        q.and_where(Expr::col(Projects::Id).ne(id));
    }
    q.build(SqliteQueryBuilder)
}

/// The team a project belongs to.
pub fn team_of(id: &str) -> Built {
    Query::select()
        .column(Projects::TeamId)
        .from(Projects::Table)
        .and_where(Expr::col(Projects::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Update a single text column.
fn update_column(id: &str, col: Projects, value: sea_query::Value) -> Built {
    Query::update()
        .table(Projects::Table)
        .value(col, value)
        .value(Projects::UpdatedAt, Expr::cust("datetime('now')"))
        .and_where(Expr::col(Projects::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn update_name(id: &str, name: &str) -> Built {
    update_column(id, Projects::Name, name.into())
}

pub fn update_vision(id: &str, vision: &str) -> Built {
    update_column(id, Projects::Vision, vision.into())
}

pub fn update_completion_status(id: &str, status: &str) -> Built {
    update_column(id, Projects::CompletionStatus, status.into())
}

pub fn update_estimated_completion_date(id: &str, date: &str) -> Built {
    update_column(id, Projects::EstimatedCompletionDate, date.into())
}

pub fn update_archived(id: &str, is_archived: bool) -> Built {
    update_column(id, Projects::IsArchived, is_archived.into())
}

/// DELETE a project (cascades to objectives, tasks, plans).
pub fn delete(id: &str) -> Built {
    Query::delete()
        .from_table(Projects::Table)
        .and_where(Expr::col(Projects::Id).eq(id))
        .build(SqliteQueryBuilder)
}
