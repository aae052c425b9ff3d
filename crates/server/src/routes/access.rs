//! Resource → team resolution shared by the route modules.
//!
//! Projects, objectives, tasks, and plans are all scoped to a team through
//! foreign keys; every handler resolves the target resource up to its team
//! and compares against the caller's membership.

use rusqlite::Connection;

use arrowhead_api::db;

use crate::error::ApiErr;
use crate::routes::auth::{AuthUser, MemberContext};
use crate::storage::sq_query_row;

/// The team a project belongs to, or 404.
pub fn project_team(conn: &Connection, project_id: &str) -> Result<String, ApiErr> {
    sq_query_row(conn, db::projects::team_of(project_id), |row| row.get(0))
        .map_err(|_| ApiErr::not_found("project not found"))
}

/// The (project, team) an objective belongs to, or 404.
pub fn objective_team(conn: &Connection, objective_id: &str) -> Result<(String, String), ApiErr> {
    let project_id: String =
        sq_query_row(conn, db::objectives::project_of(objective_id), |row| {
            row.get(0)
        })
        .map_err(|_| ApiErr::not_found("objective not found"))?;
    let team_id = project_team(conn, &project_id)?;
    Ok((project_id, team_id))
}

/// The (objective, team) a task belongs to, or 404.
pub fn task_team(conn: &Connection, task_id: &str) -> Result<(String, String), ApiErr> {
    let objective_id: String = sq_query_row(conn, db::tasks::get_by_id(task_id), |row| row.get(1))
        .map_err(|_| ApiErr::not_found("task not found"))?;
    let (_, team_id) = objective_team(conn, &objective_id)?;
    Ok((objective_id, team_id))
}

/// Caller's membership in the team owning `project_id`, or 403/404.
pub fn member_for_project<'a>(
    conn: &Connection,
    user: &'a AuthUser,
    project_id: &str,
) -> Result<&'a MemberContext, ApiErr> {
    let team_id = project_team(conn, project_id)?;
    user.require_member_of(&team_id)
}

/// Caller's membership in the team owning `objective_id`, or 403/404.
pub fn member_for_objective<'a>(
    conn: &Connection,
    user: &'a AuthUser,
    objective_id: &str,
) -> Result<&'a MemberContext, ApiErr> {
    let (_, team_id) = objective_team(conn, objective_id)?;
    user.require_member_of(&team_id)
}

/// Caller's membership in the team owning `task_id`, or 403/404.
pub fn member_for_task<'a>(
    conn: &Connection,
    user: &'a AuthUser,
    task_id: &str,
) -> Result<&'a MemberContext, ApiErr> {
    let (_, team_id) = task_team(conn, task_id)?;
    user.require_member_of(&team_id)
}
