//! Guest journey sessions — the unauthenticated free-tool flow.
//!
//! Sessions are keyed by an opaque client-chosen `session_id`; there is no
//! account and no team, so handlers only validate shapes and vocabularies.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use arrowhead_api::{
    db, service, CreateJourneySessionRequest, CreateJourneyTaskRequest, JourneyExportResponse,
    JourneySessionResponse, JourneyTaskResponse, ListJourneyTasksResponse,
    UpdateJourneySessionRequest, UpdateJourneyTaskRequest,
};

use crate::error::ApiErr;
use crate::storage::{
    journey_session_from_row, journey_task_from_row, sq_execute, sq_query_map, sq_query_row, Db,
};

fn load_session(
    conn: &rusqlite::Connection,
    session_id: &str,
) -> Result<JourneySessionResponse, ApiErr> {
    sq_query_row(
        conn,
        db::journeys::session_get(session_id),
        journey_session_from_row,
    )
    .map_err(|_| ApiErr::not_found("journey session not found"))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// POST /api/journey/sessions — start a guest journey.
pub async fn create_session(
    State(db): State<Db>,
    Json(req): Json<CreateJourneySessionRequest>,
) -> Result<(StatusCode, Json<JourneySessionResponse>), ApiErr> {
    let session_id = req.session_id.trim();
    if session_id.is_empty() {
        return Err(ApiErr::bad_request("'session_id' is required"));
    }

    let step_data = req.step_data.unwrap_or_default();
    service::validate_answers(req.module, &step_data).map_err(ApiErr::from)?;

    let current_step = match req.current_step {
        Some(step) => service::validate_step(step).map_err(ApiErr::from)?,
        None => req.module.first_step(),
    };

    let json = serde_json::to_string(&step_data)
        .map_err(|e| ApiErr::internal(format!("serialize step data: {e}")))?;

    let id = Uuid::new_v4().to_string();
    let conn = db.conn();
    let result = sq_execute(
        &conn,
        db::journeys::session_insert(&id, session_id, req.module.as_str(), &json, current_step),
    );

    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(ApiErr::conflict("a session with this id already exists"));
        }
        Err(e) => {
            tracing::error!("create journey session: {e}");
            return Err(ApiErr::internal("failed to create journey session"));
        }
    }

    Ok((StatusCode::CREATED, Json(load_session(&conn, session_id)?)))
}

/// GET /api/journey/sessions/:session_id — fetch a guest journey.
pub async fn get_session(
    State(db): State<Db>,
    Path(session_id): Path<String>,
) -> Result<Json<JourneySessionResponse>, ApiErr> {
    let conn = db.conn();
    Ok(Json(load_session(&conn, &session_id)?))
}

/// PUT /api/journey/sessions/:session_id — save guest journey progress.
pub async fn update_session(
    State(db): State<Db>,
    Path(session_id): Path<String>,
    Json(req): Json<UpdateJourneySessionRequest>,
) -> Result<Json<JourneySessionResponse>, ApiErr> {
    let conn = db.conn();
    let session = load_session(&conn, &session_id)?;

    if let Some(ref incoming) = req.step_data {
        service::validate_answers(session.module, incoming).map_err(ApiErr::from)?;
        let mut merged = session.step_data.clone();
        merged.merge(incoming);
        let json = serde_json::to_string(&merged)
            .map_err(|e| ApiErr::internal(format!("serialize step data: {e}")))?;
        sq_execute(&conn, db::journeys::session_update_step_data(&session_id, &json))
            .map_err(ApiErr::from_db("update step data"))?;
    }

    if let Some(ref steps) = req.completed_steps {
        let json = serde_json::to_string(steps)
            .map_err(|e| ApiErr::internal(format!("serialize completed steps: {e}")))?;
        sq_execute(
            &conn,
            db::journeys::session_update_completed_steps(&session_id, &json),
        )
        .map_err(ApiErr::from_db("update completed steps"))?;
    }

    if let Some(step) = req.current_step {
        let step = service::validate_step(step).map_err(ApiErr::from)?;
        sq_execute(&conn, db::journeys::session_update_current_step(&session_id, step))
            .map_err(ApiErr::from_db("update current step"))?;
    }

    if let Some(is_completed) = req.is_completed {
        sq_execute(
            &conn,
            db::journeys::session_update_completed(&session_id, is_completed),
        )
        .map_err(ApiErr::from_db("update completed flag"))?;
        if is_completed && session.completed_at.is_none() {
            sq_execute(
                &conn,
                db::journeys::session_update_completed_at(&session_id, &service::now_sqlite()),
            )
            .map_err(ApiErr::from_db("stamp completed_at"))?;
        }
    }

    Ok(Json(load_session(&conn, &session_id)?))
}

/// GET /api/journey/sessions/:session_id/export — the bundle the client
/// renders into PDF/markdown.
pub async fn export_session(
    State(db): State<Db>,
    Path(session_id): Path<String>,
) -> Result<Json<JourneyExportResponse>, ApiErr> {
    let conn = db.conn();
    let session = load_session(&conn, &session_id)?;
    let tasks = sq_query_map(
        &conn,
        db::journeys::tasks_for_session(&session_id),
        journey_task_from_row,
    )
    .map_err(ApiErr::from_db("list journey tasks"))?;

    Ok(Json(JourneyExportResponse {
        export_type: session.module,
        export_date: service::now_sqlite(),
        session,
        tasks,
    }))
}

// ---------------------------------------------------------------------------
// Session tasks
// ---------------------------------------------------------------------------

/// POST /api/journey/tasks — create a task in a guest session.
pub async fn create_task(
    State(db): State<Db>,
    Json(req): Json<CreateJourneyTaskRequest>,
) -> Result<(StatusCode, Json<JourneyTaskResponse>), ApiErr> {
    let conn = db.conn();
    // The FK also enforces this, but a 404 reads better than a 500.
    load_session(&conn, &req.session_id)?;

    let title = service::validate_name("task", &req.title).map_err(ApiErr::from)?;

    let id = Uuid::new_v4().to_string();
    sq_execute(
        &conn,
        db::journeys::task_insert(
            &id,
            &req.session_id,
            &title,
            req.description.as_deref(),
            req.status.unwrap_or_default().as_str(),
            req.priority.unwrap_or_default().as_str(),
            req.due_date.as_deref(),
        ),
    )
    .map_err(|e| {
        tracing::error!("create journey task: {e}");
        ApiErr::internal("failed to create task")
    })?;

    let task = sq_query_row(&conn, db::journeys::task_get(&id), journey_task_from_row)
        .map_err(ApiErr::from_db("load created task"))?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Query parameters for `GET /api/journey/tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub session_id: String,
}

/// GET /api/journey/tasks?session_id= — a session's tasks.
pub async fn list_tasks(
    State(db): State<Db>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<ListJourneyTasksResponse>, ApiErr> {
    let conn = db.conn();
    let tasks = sq_query_map(
        &conn,
        db::journeys::tasks_for_session(&query.session_id),
        journey_task_from_row,
    )
    .map_err(ApiErr::from_db("list journey tasks"))?;

    Ok(Json(ListJourneyTasksResponse { tasks }))
}

/// PUT /api/journey/tasks/:id — partial task update.
pub async fn update_task(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(req): Json<UpdateJourneyTaskRequest>,
) -> Result<Json<JourneyTaskResponse>, ApiErr> {
    let conn = db.conn();
    sq_query_row(&conn, db::journeys::task_get(&id), journey_task_from_row)
        .map_err(|_| ApiErr::not_found("task not found"))?;

    if let Some(ref title) = req.title {
        let title = service::validate_name("task", title).map_err(ApiErr::from)?;
        sq_execute(&conn, db::journeys::task_update_title(&id, &title))
            .map_err(ApiErr::from_db("update task title"))?;
    }
    if let Some(ref description) = req.description {
        sq_execute(&conn, db::journeys::task_update_description(&id, description))
            .map_err(ApiErr::from_db("update task description"))?;
    }
    if let Some(status) = req.status {
        sq_execute(&conn, db::journeys::task_update_status(&id, status.as_str()))
            .map_err(ApiErr::from_db("update task status"))?;
    }
    if let Some(priority) = req.priority {
        sq_execute(
            &conn,
            db::journeys::task_update_priority(&id, priority.as_str()),
        )
        .map_err(ApiErr::from_db("update task priority"))?;
    }
    if let Some(ref due_date) = req.due_date {
        sq_execute(&conn, db::journeys::task_update_due_date(&id, due_date))
            .map_err(ApiErr::from_db("update task due date"))?;
    }

    let task = sq_query_row(&conn, db::journeys::task_get(&id), journey_task_from_row)
        .map_err(ApiErr::from_db("reload task"))?;

    Ok(Json(task))
}

/// DELETE /api/journey/tasks/:id — delete a task.
pub async fn delete_task(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiErr> {
    let conn = db.conn();
    let affected = sq_execute(&conn, db::journeys::task_delete(&id))
        .map_err(ApiErr::from_db("delete journey task"))?;
    if affected == 0 {
        return Err(ApiErr::not_found("task not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
