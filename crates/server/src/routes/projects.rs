use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use arrowhead_api::{
    db, service, CreateProjectRequest, ListProjectsResponse, ProjectListQuery, ProjectResponse,
    UpdateProjectRequest,
};

use crate::error::ApiErr;
use crate::routes::access;
use crate::routes::auth::AuthUser;
use crate::storage::{project_from_row, sq_execute, sq_query_map, sq_query_row, Db};

/// Whether `name` collides with another project in the team.
fn name_taken(
    conn: &rusqlite::Connection,
    team_id: &str,
    name: &str,
    exclude_id: Option<&str>,
) -> bool {
    sq_query_row(
        conn,
        db::projects::name_taken(team_id, name, exclude_id),
        |row| row.get::<_, i64>(0).map(|c| c > 0),
    )
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Create project
// ---------------------------------------------------------------------------

/// POST /api/teams/:id/projects — create a project (project managers only).
pub async fn create_project(
    State(db): State<Db>,
    user: AuthUser,
    Path(team_id): Path<String>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiErr> {
    let member = user.require_member_of(&team_id)?;
    if !member.role.can_manage_projects() {
        return Err(ApiErr::forbidden(
            "insufficient permissions to create projects",
        ));
    }

    let name = service::validate_name("project", &req.name).map_err(ApiErr::from)?;
    let conn = db.conn();

    if name_taken(&conn, &team_id, &name, None) {
        return Err(ApiErr::conflict(
            "a project with this name already exists in your team",
        ));
    }

    let project_id = Uuid::new_v4().to_string();
    sq_execute(
        &conn,
        db::projects::insert(
            &project_id,
            &team_id,
            &name,
            req.vision.as_deref(),
            req.estimated_completion_date.as_deref(),
        ),
    )
    .map_err(|e| {
        tracing::error!("create project: {e}");
        ApiErr::internal("failed to create project")
    })?;

    let project = sq_query_row(&conn, db::projects::get_by_id(&project_id), project_from_row)
        .map_err(ApiErr::from_db("load created project"))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// ---------------------------------------------------------------------------
// List projects
// ---------------------------------------------------------------------------

/// GET /api/teams/:id/projects — list a team's projects (members only).
pub async fn list_projects(
    State(db): State<Db>,
    user: AuthUser,
    Path(team_id): Path<String>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<ListProjectsResponse>, ApiErr> {
    user.require_member_of(&team_id)?;
    let conn = db.conn();

    let projects = sq_query_map(
        &conn,
        db::projects::list_for_team(&team_id, query.include_archived),
        project_from_row,
    )
    .map_err(ApiErr::from_db("list projects"))?;

    Ok(Json(ListProjectsResponse { projects }))
}

// ---------------------------------------------------------------------------
// Get project
// ---------------------------------------------------------------------------

/// GET /api/projects/:id — project detail (team members only).
pub async fn get_project(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectResponse>, ApiErr> {
    let conn = db.conn();
    access::member_for_project(&conn, &user, &id)?;

    let project = sq_query_row(&conn, db::projects::get_by_id(&id), project_from_row)
        .map_err(|_| ApiErr::not_found("project not found"))?;

    Ok(Json(project))
}

// ---------------------------------------------------------------------------
// Update project
// ---------------------------------------------------------------------------

/// PUT /api/projects/:id — partial project update (project managers only).
pub async fn update_project(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiErr> {
    let conn = db.conn();
    let team_id = access::project_team(&conn, &id)?;
    let member = user.require_member_of(&team_id)?;
    if !member.role.can_manage_projects() {
        return Err(ApiErr::forbidden(
            "insufficient permissions to update projects",
        ));
    }

    if let Some(ref name) = req.name {
        let name = service::validate_name("project", name).map_err(ApiErr::from)?;
        if name_taken(&conn, &team_id, &name, Some(&id)) {
            return Err(ApiErr::conflict(
                "a project with this name already exists in your team",
            ));
        }
        sq_execute(&conn, db::projects::update_name(&id, &name))
            .map_err(ApiErr::from_db("update project name"))?;
    }

    if let Some(ref vision) = req.vision {
        sq_execute(&conn, db::projects::update_vision(&id, vision))
            .map_err(ApiErr::from_db("update project vision"))?;
    }

    if let Some(status) = req.completion_status {
        sq_execute(
            &conn,
            db::projects::update_completion_status(&id, status.as_str()),
        )
        .map_err(ApiErr::from_db("update project status"))?;
    }

    if let Some(ref date) = req.estimated_completion_date {
        sq_execute(
            &conn,
            db::projects::update_estimated_completion_date(&id, date),
        )
        .map_err(ApiErr::from_db("update project date"))?;
    }

    if let Some(is_archived) = req.is_archived {
        sq_execute(&conn, db::projects::update_archived(&id, is_archived))
            .map_err(ApiErr::from_db("update project archived"))?;
    }

    let project = sq_query_row(&conn, db::projects::get_by_id(&id), project_from_row)
        .map_err(|_| ApiErr::not_found("project not found"))?;

    Ok(Json(project))
}

// ---------------------------------------------------------------------------
// Delete project
// ---------------------------------------------------------------------------

/// DELETE /api/projects/:id — delete a project and everything under it
/// (Account Owner/Manager only).
pub async fn delete_project(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiErr> {
    let conn = db.conn();
    let team_id = access::project_team(&conn, &id)?;
    let member = user.require_member_of(&team_id)?;
    if !member.role.is_account_admin() {
        return Err(ApiErr::forbidden("account admin only"));
    }

    let affected = sq_execute(&conn, db::projects::delete(&id))
        .map_err(ApiErr::from_db("delete project"))?;
    if affected == 0 {
        return Err(ApiErr::not_found("project not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
