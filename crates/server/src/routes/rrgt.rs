use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use arrowhead_core::rrgt::{column_in_range, DEFAULT_MAX_COLUMN_INDEX, SUBTASK_COLUMNS};

use arrowhead_api::{
    db, ListPlansResponse, MemberRrgtResponse, RabbitResponse, RrgtObjectiveInfo, RrgtPlanResponse,
    RrgtQuery, RrgtTaskInfo, SubtaskResponse, UpdateRabbitRequest, UpsertSubtaskRequest,
};

use crate::error::ApiErr;
use crate::routes::auth::AuthUser;
use crate::routes::dial;
use crate::storage::{sq_execute, sq_query_map, sq_query_row, subtask_from_row, Db};

/// Maps a `db::rrgt::plans_for_member` row; subtasks are filled by the
/// caller.
fn plan_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RrgtPlanResponse> {
    let status: String = row.get(7)?;
    let priority: String = row.get(8)?;
    let rabbit_col: Option<i64> = row.get(11)?;
    let rabbit_updated: Option<String> = row.get(12)?;
    let plan_id: String = row.get(0)?;
    Ok(RrgtPlanResponse {
        id: plan_id.clone(),
        task_id: row.get(1)?,
        team_member_id: row.get(2)?,
        project_id: row.get(3)?,
        objective_id: row.get(4)?,
        max_column_index: row.get(5)?,
        task: RrgtTaskInfo {
            id: row.get(1)?,
            title: row.get(6)?,
            status: status.parse().unwrap_or_default(),
            priority: priority.parse().unwrap_or_default(),
            due_date: row.get(9)?,
        },
        objective: RrgtObjectiveInfo {
            id: row.get(4)?,
            project_id: row.get(3)?,
            name: row.get(10)?,
        },
        rabbit: match (rabbit_col, rabbit_updated) {
            (Some(current_column_index), Some(updated_at)) => Some(RabbitResponse {
                plan_id,
                current_column_index,
                updated_at,
            }),
            _ => None,
        },
        subtasks: Vec::new(),
    })
}

/// Ensure every task assigned to `member_id` has a provisioned plan:
/// plan row, rabbit at the Start column, empty subtask cells 1-5.
fn provision_plans(conn: &rusqlite::Connection, member_id: &str) -> Result<(), ApiErr> {
    let task_ids: Vec<String> = sq_query_map(
        conn,
        db::tasks::task_ids_for_member(member_id),
        |row| row.get(0),
    )
    .map_err(ApiErr::from_db("list assigned tasks"))?;

    for task_id in task_ids {
        let existing =
            sq_query_row(conn, db::rrgt::plan_for_task(&task_id, member_id), |row| {
                row.get::<_, String>(0)
            });
        if existing.is_ok() {
            continue;
        }

        let objective_id: String =
            match sq_query_row(conn, db::tasks::get_by_id(&task_id), |row| row.get(1)) {
                Ok(id) => id,
                // Assignment outlived its task row; nothing to provision.
                Err(_) => continue,
            };
        let project_id: String =
            match sq_query_row(conn, db::objectives::project_of(&objective_id), |row| {
                row.get(0)
            }) {
                Ok(id) => id,
                Err(_) => continue,
            };

        let plan_id = Uuid::new_v4().to_string();
        sq_execute(
            conn,
            db::rrgt::plan_insert(
                &plan_id,
                &task_id,
                member_id,
                &project_id,
                &objective_id,
                DEFAULT_MAX_COLUMN_INDEX,
            ),
        )
        .map_err(ApiErr::from_db("insert plan"))?;

        sq_execute(conn, db::rrgt::rabbit_insert(&plan_id, 0))
            .map_err(ApiErr::from_db("insert rabbit"))?;

        for column in SUBTASK_COLUMNS {
            let subtask_id = Uuid::new_v4().to_string();
            sq_execute(
                conn,
                db::rrgt::subtask_insert(&subtask_id, &plan_id, column, Some("")),
            )
            .map_err(ApiErr::from_db("insert subtask"))?;
        }
    }

    Ok(())
}

/// Load a member's plans (already provisioned) with subtasks attached.
fn load_plans(
    conn: &rusqlite::Connection,
    member_id: &str,
    project_id: Option<&str>,
    objective_id: Option<&str>,
) -> Result<Vec<RrgtPlanResponse>, ApiErr> {
    let mut plans = sq_query_map(
        conn,
        db::rrgt::plans_for_member(member_id, project_id, objective_id),
        plan_from_row,
    )
    .map_err(ApiErr::from_db("list plans"))?;

    for plan in &mut plans {
        plan.subtasks = sq_query_map(conn, db::rrgt::subtasks_for_plan(&plan.id), subtask_from_row)
            .map_err(ApiErr::from_db("list subtasks"))?;
    }

    Ok(plans)
}

// ---------------------------------------------------------------------------
// My grid
// ---------------------------------------------------------------------------

/// GET /api/rrgt/mine — the caller's grid, auto-provisioning plans for any
/// assigned task that lacks one.
pub async fn my_rrgt(
    State(db): State<Db>,
    user: AuthUser,
    Query(query): Query<RrgtQuery>,
) -> Result<Json<ListPlansResponse>, ApiErr> {
    let member = user.require_member()?;
    let conn = db.conn();

    provision_plans(&conn, &member.member_id)?;
    let plans = load_plans(
        &conn,
        &member.member_id,
        query.project_id.as_deref(),
        query.objective_id.as_deref(),
    )?;

    let total = plans.len();
    Ok(Json(ListPlansResponse { plans, total }))
}

// ---------------------------------------------------------------------------
// Manager god-view
// ---------------------------------------------------------------------------

/// GET /api/rrgt/:member_id — another member's grid and dial
/// (Account Owner/Manager only; dial privacy flags respected).
pub async fn member_rrgt(
    State(db): State<Db>,
    user: AuthUser,
    Path(member_id): Path<String>,
) -> Result<Json<MemberRrgtResponse>, ApiErr> {
    let me = user.require_member()?;
    if !me.role.is_account_admin() {
        return Err(ApiErr::forbidden(
            "only Account Owner and Account Manager can view team member grids",
        ));
    }

    let conn = db.conn();

    // Target must be in the caller's team.
    let target_team: String =
        sq_query_row(&conn, db::teams::member_by_id(&member_id), |row| row.get(1))
            .map_err(|_| ApiErr::not_found("team member not found"))?;
    if target_team != me.team_id {
        return Err(ApiErr::not_found("team member not found"));
    }

    let plans = load_plans(&conn, &member_id, None, None)?;

    let dial_state = dial::load_dial(&conn, &member_id)
        .map(|mut state| {
            // Privacy flags hide the cell contents from the god-view.
            if state.is_left_private {
                state.left_text = None;
                state.left_task_title = None;
            }
            if state.is_right_private {
                state.right_task_title = None;
            }
            state
        });

    Ok(Json(MemberRrgtResponse {
        team_member_id: member_id,
        plans,
        dial_state,
    }))
}

// ---------------------------------------------------------------------------
// Rabbit + subtask cells
// ---------------------------------------------------------------------------

/// The plan's max column, if the caller owns it.
fn owned_plan_max(
    conn: &rusqlite::Connection,
    plan_id: &str,
    member_id: &str,
) -> Result<i64, ApiErr> {
    sq_query_row(conn, db::rrgt::plan_owned(plan_id, member_id), |row| {
        row.get(1)
    })
    .map_err(|_| ApiErr::not_found("plan not found or you do not have access"))
}

/// PUT /api/rrgt/plans/:plan_id/rabbit — move the rabbit marker
/// (plan owner only).
pub async fn update_rabbit(
    State(db): State<Db>,
    user: AuthUser,
    Path(plan_id): Path<String>,
    Json(req): Json<UpdateRabbitRequest>,
) -> Result<Json<RabbitResponse>, ApiErr> {
    let member = user.require_member()?;
    let conn = db.conn();

    let max = owned_plan_max(&conn, &plan_id, &member.member_id)?;
    if !column_in_range(req.column_index, max) {
        return Err(ApiErr::bad_request(
            "column_index is out of range for this plan",
        ));
    }

    sq_execute(&conn, db::rrgt::rabbit_upsert(&plan_id, req.column_index))
        .map_err(ApiErr::from_db("upsert rabbit"))?;

    let rabbit = sq_query_row(&conn, db::rrgt::rabbit_get(&plan_id), |row| {
        Ok(RabbitResponse {
            plan_id: row.get(0)?,
            current_column_index: row.get(1)?,
            updated_at: row.get(2)?,
        })
    })
    .map_err(ApiErr::from_db("load rabbit"))?;

    Ok(Json(rabbit))
}

/// PUT /api/rrgt/plans/:plan_id/subtasks — upsert a subtask cell's text
/// (plan owner only).
pub async fn upsert_subtask(
    State(db): State<Db>,
    user: AuthUser,
    Path(plan_id): Path<String>,
    Json(req): Json<UpsertSubtaskRequest>,
) -> Result<Json<SubtaskResponse>, ApiErr> {
    let member = user.require_member()?;
    let conn = db.conn();

    let max = owned_plan_max(&conn, &plan_id, &member.member_id)?;
    if !column_in_range(req.column_index, max) {
        return Err(ApiErr::bad_request(
            "column_index is out of range for this plan",
        ));
    }

    let subtask_id = Uuid::new_v4().to_string();
    sq_execute(
        &conn,
        db::rrgt::subtask_upsert(&subtask_id, &plan_id, req.column_index, &req.text),
    )
    .map_err(ApiErr::from_db("upsert subtask"))?;

    let subtask = sq_query_row(
        &conn,
        db::rrgt::subtask_at(&plan_id, req.column_index),
        subtask_from_row,
    )
    .map_err(ApiErr::from_db("load subtask"))?;

    Ok(Json(subtask))
}
