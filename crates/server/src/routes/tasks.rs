use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::collections::HashSet;
use uuid::Uuid;

use arrowhead_api::{
    db, service, CreateTaskRequest, ListTasksResponse, ReorderTasksRequest, TaskAssignee,
    TaskResponse, TaskStatus, UpdateTaskRequest,
};

use crate::error::ApiErr;
use crate::routes::access;
use crate::routes::auth::AuthUser;
use crate::storage::{sq_execute, sq_query_map, sq_query_row, task_from_row, Db};

/// Load a task's assignees.
fn assignees(conn: &rusqlite::Connection, task_id: &str) -> Vec<TaskAssignee> {
    sq_query_map(conn, db::tasks::assignment_list(task_id), |row| {
        Ok(TaskAssignee {
            team_member_id: row.get(0)?,
            display_name: row.get(1)?,
        })
    })
    .unwrap_or_default()
}

/// Load a task with its assignees filled in.
fn load_task(conn: &rusqlite::Connection, task_id: &str) -> Result<TaskResponse, ApiErr> {
    let mut task = sq_query_row(conn, db::tasks::get_by_id(task_id), task_from_row)
        .map_err(|_| ApiErr::not_found("task not found"))?;
    task.assigned_members = assignees(conn, task_id);
    Ok(task)
}

/// Verify every id in `member_ids` is a member of `team_id`.
fn validate_assignees(
    conn: &rusqlite::Connection,
    team_id: &str,
    member_ids: &[String],
) -> Result<(), ApiErr> {
    for member_id in member_ids {
        let row = sq_query_row(conn, db::teams::member_by_id(member_id), |row| {
            row.get::<_, String>(1)
        });
        match row {
            Ok(t) if t == team_id => {}
            _ => {
                return Err(ApiErr::bad_request(
                    "assigned members must belong to the objective's team",
                ))
            }
        }
    }
    Ok(())
}

/// Replace a task's assignment set.
fn replace_assignments(
    conn: &rusqlite::Connection,
    task_id: &str,
    member_ids: &[String],
) -> Result<(), ApiErr> {
    sq_execute(conn, db::tasks::assignment_clear(task_id))
        .map_err(ApiErr::from_db("clear assignments"))?;
    // Dedup to keep the composite PK happy.
    let unique: HashSet<&String> = member_ids.iter().collect();
    for member_id in unique {
        sq_execute(conn, db::tasks::assignment_insert(task_id, member_id))
            .map_err(ApiErr::from_db("insert assignment"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Create task
// ---------------------------------------------------------------------------

/// POST /api/objectives/:id/tasks — create a task at the end of the
/// objective's sort order (members only).
pub async fn create_task(
    State(db): State<Db>,
    user: AuthUser,
    Path(objective_id): Path<String>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErr> {
    let conn = db.conn();
    let member = access::member_for_objective(&conn, &user, &objective_id)?;

    let title = service::validate_name("task", &req.title).map_err(ApiErr::from)?;
    validate_assignees(&conn, &member.team_id, &req.assigned_member_ids)?;

    let sort_order: i64 = sq_query_row(
        &conn,
        db::tasks::next_sort_order(&objective_id),
        |row| row.get(0),
    )
    .unwrap_or(0);

    let task_id = Uuid::new_v4().to_string();
    sq_execute(
        &conn,
        db::tasks::insert(
            &task_id,
            &objective_id,
            &title,
            req.description.as_deref(),
            TaskStatus::Todo.as_str(),
            req.priority.unwrap_or_default().as_str(),
            req.due_date.as_deref(),
            sort_order,
        ),
    )
    .map_err(|e| {
        tracing::error!("create task: {e}");
        ApiErr::internal("failed to create task")
    })?;

    replace_assignments(&conn, &task_id, &req.assigned_member_ids)?;

    Ok((StatusCode::CREATED, Json(load_task(&conn, &task_id)?)))
}

// ---------------------------------------------------------------------------
// List tasks
// ---------------------------------------------------------------------------

/// GET /api/objectives/:id/tasks — the objective's tasks in sort order, each
/// with its assignees (members only).
pub async fn list_tasks(
    State(db): State<Db>,
    user: AuthUser,
    Path(objective_id): Path<String>,
) -> Result<Json<ListTasksResponse>, ApiErr> {
    let conn = db.conn();
    access::member_for_objective(&conn, &user, &objective_id)?;

    let mut tasks = sq_query_map(
        &conn,
        db::tasks::list_for_objective(&objective_id),
        task_from_row,
    )
    .map_err(ApiErr::from_db("list tasks"))?;

    for task in &mut tasks {
        task.assigned_members = assignees(&conn, &task.id);
    }

    Ok(Json(ListTasksResponse { tasks }))
}

// ---------------------------------------------------------------------------
// Update task
// ---------------------------------------------------------------------------

/// PUT /api/tasks/:id — partial task update; `assigned_member_ids` replaces
/// the full assignment set (members only).
pub async fn update_task(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiErr> {
    let conn = db.conn();
    let member = access::member_for_task(&conn, &user, &id)?;

    if let Some(ref title) = req.title {
        let title = service::validate_name("task", title).map_err(ApiErr::from)?;
        sq_execute(&conn, db::tasks::update_title(&id, &title))
            .map_err(ApiErr::from_db("update task title"))?;
    }

    if let Some(ref description) = req.description {
        sq_execute(&conn, db::tasks::update_description(&id, description))
            .map_err(ApiErr::from_db("update task description"))?;
    }

    if let Some(status) = req.status {
        sq_execute(&conn, db::tasks::update_status(&id, status.as_str()))
            .map_err(ApiErr::from_db("update task status"))?;
    }

    if let Some(priority) = req.priority {
        sq_execute(&conn, db::tasks::update_priority(&id, priority.as_str()))
            .map_err(ApiErr::from_db("update task priority"))?;
    }

    if let Some(ref due_date) = req.due_date {
        sq_execute(&conn, db::tasks::update_due_date(&id, due_date))
            .map_err(ApiErr::from_db("update task due date"))?;
    }

    if let Some(ref member_ids) = req.assigned_member_ids {
        validate_assignees(&conn, &member.team_id, member_ids)?;
        replace_assignments(&conn, &id, member_ids)?;
    }

    Ok(Json(load_task(&conn, &id)?))
}

// ---------------------------------------------------------------------------
// Delete task
// ---------------------------------------------------------------------------

/// DELETE /api/tasks/:id — delete a task (members only).
pub async fn delete_task(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiErr> {
    let conn = db.conn();
    access::member_for_task(&conn, &user, &id)?;

    let affected =
        sq_execute(&conn, db::tasks::delete(&id)).map_err(ApiErr::from_db("delete task"))?;
    if affected == 0 {
        return Err(ApiErr::not_found("task not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Reorder tasks
// ---------------------------------------------------------------------------

/// Validate that `requested` is exactly the set `existing`.
fn reorder_ids_match(requested: &[String], existing: &[String]) -> bool {
    if requested.len() != existing.len() {
        return false;
    }
    let requested: HashSet<&String> = requested.iter().collect();
    requested.len() == existing.len() && existing.iter().all(|id| requested.contains(id))
}

/// PUT /api/objectives/:id/tasks/reorder — persist a drag-and-drop order.
///
/// The submitted ids must be exactly the objective's tasks; positions become
/// sort_order 0..n-1.
pub async fn reorder_tasks(
    State(db): State<Db>,
    user: AuthUser,
    Path(objective_id): Path<String>,
    Json(req): Json<ReorderTasksRequest>,
) -> Result<Json<ListTasksResponse>, ApiErr> {
    let conn = db.conn();
    access::member_for_objective(&conn, &user, &objective_id)?;

    let existing: Vec<String> = sq_query_map(
        &conn,
        db::tasks::ids_for_objective(&objective_id),
        |row| row.get(0),
    )
    .map_err(ApiErr::from_db("list task ids"))?;

    if !reorder_ids_match(&req.task_ids, &existing) {
        return Err(ApiErr::bad_request(
            "task_ids must contain exactly the objective's tasks",
        ));
    }

    for (position, task_id) in req.task_ids.iter().enumerate() {
        sq_execute(&conn, db::tasks::set_sort_order(task_id, position as i64))
            .map_err(ApiErr::from_db("set sort order"))?;
    }

    let mut tasks = sq_query_map(
        &conn,
        db::tasks::list_for_objective(&objective_id),
        task_from_row,
    )
    .map_err(ApiErr::from_db("list tasks"))?;
    for task in &mut tasks {
        task.assigned_members = assignees(&conn, &task.id);
    }

    Ok(Json(ListTasksResponse { tasks }))
}

#[cfg(test)]
mod tests {
    use super::reorder_ids_match;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reorder_requires_exact_id_set() {
        let existing = ids(&["a", "b", "c"]);
        assert!(reorder_ids_match(&ids(&["c", "a", "b"]), &existing));
        assert!(!reorder_ids_match(&ids(&["a", "b"]), &existing));
        assert!(!reorder_ids_match(&ids(&["a", "b", "d"]), &existing));
        assert!(!reorder_ids_match(&ids(&["a", "a", "b"]), &existing));
        assert!(reorder_ids_match(&[], &[]));
    }
}
