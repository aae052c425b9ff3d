use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use arrowhead_core::lock::{self, LockView};
use arrowhead_core::{journey, JourneyModule, JourneyStatus};

use arrowhead_api::{
    db, service, CreateObjectiveRequest, ListObjectivesResponse, LockResponse, LockStatusResponse,
    ObjectiveDetailResponse, ObjectiveListQuery, ObjectiveResponse, OkResponse, ResumeResponse,
    StepAnswers, UpdateObjectiveRequest,
};

use crate::error::ApiErr;
use crate::routes::access;
use crate::routes::auth::{now_unix, AuthUser, MemberContext};
use crate::storage::{
    objective_from_row, sq_execute, sq_query_map, sq_query_row, step_data_from_row, Db,
};

// ---------------------------------------------------------------------------
// Create objective
// ---------------------------------------------------------------------------

/// POST /api/projects/:id/objectives — create an objective
/// (project managers only).
pub async fn create_objective(
    State(db): State<Db>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(req): Json<CreateObjectiveRequest>,
) -> Result<(StatusCode, Json<ObjectiveResponse>), ApiErr> {
    let conn = db.conn();
    let member = access::member_for_project(&conn, &user, &project_id)?;
    if !member.role.can_manage_projects() {
        return Err(ApiErr::forbidden(
            "insufficient permissions to create objectives",
        ));
    }

    let name = service::validate_name("objective", &req.name).map_err(ApiErr::from)?;
    let initial_step = journey::initial_step(req.start_with_brainstorm);

    let objective_id = Uuid::new_v4().to_string();
    sq_execute(
        &conn,
        db::objectives::insert(
            &objective_id,
            &project_id,
            &name,
            initial_step,
            req.target_date.as_deref(),
        ),
    )
    .map_err(|e| {
        tracing::error!("create objective: {e}");
        ApiErr::internal("failed to create objective")
    })?;

    let objective = sq_query_row(
        &conn,
        db::objectives::get_by_id(&objective_id),
        objective_from_row,
    )
    .map_err(ApiErr::from_db("load created objective"))?;

    Ok((StatusCode::CREATED, Json(objective)))
}

// ---------------------------------------------------------------------------
// List objectives
// ---------------------------------------------------------------------------

/// GET /api/projects/:id/objectives — list a project's objectives
/// (members only).
pub async fn list_objectives(
    State(db): State<Db>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Query(query): Query<ObjectiveListQuery>,
) -> Result<Json<ListObjectivesResponse>, ApiErr> {
    let conn = db.conn();
    access::member_for_project(&conn, &user, &project_id)?;

    let status = query.journey_status.map(|s| s.as_str());
    let objectives = sq_query_map(
        &conn,
        db::objectives::list_for_project(&project_id, query.include_archived, status),
        objective_from_row,
    )
    .map_err(ApiErr::from_db("list objectives"))?;

    Ok(Json(ListObjectivesResponse { objectives }))
}

// ---------------------------------------------------------------------------
// Get objective
// ---------------------------------------------------------------------------

fn load_detail(
    conn: &rusqlite::Connection,
    objective_id: &str,
) -> Result<ObjectiveDetailResponse, ApiErr> {
    let objective = sq_query_row(
        conn,
        db::objectives::get_by_id(objective_id),
        objective_from_row,
    )
    .map_err(|_| ApiErr::not_found("objective not found"))?;

    let (brainstorm_data, choose_data, objectives_data) = sq_query_row(
        conn,
        db::objectives::get_step_data(objective_id),
        step_data_from_row,
    )
    .map_err(ApiErr::from_db("load step data"))?;

    Ok(ObjectiveDetailResponse {
        objective,
        brainstorm_data,
        choose_data,
        objectives_data,
    })
}

/// GET /api/objectives/:id — objective detail with step answers.
pub async fn get_objective(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ObjectiveDetailResponse>, ApiErr> {
    let conn = db.conn();
    access::member_for_objective(&conn, &user, &id)?;
    Ok(Json(load_detail(&conn, &id)?))
}

// ---------------------------------------------------------------------------
// Update objective (journey progress save)
// ---------------------------------------------------------------------------

/// Merge incoming answers into one module's JSON column.
fn merge_step_data(
    conn: &rusqlite::Connection,
    objective_id: &str,
    module: JourneyModule,
    col: db::Objectives,
    stored: &StepAnswers,
    incoming: &StepAnswers,
) -> Result<(), ApiErr> {
    service::validate_answers(module, incoming).map_err(ApiErr::from)?;
    let mut merged = stored.clone();
    merged.merge(incoming);
    let json = serde_json::to_string(&merged)
        .map_err(|e| ApiErr::internal(format!("serialize step data: {e}")))?;
    sq_execute(
        conn,
        db::objectives::update_step_data(objective_id, col, &json),
    )
    .map_err(ApiErr::from_db("update step data"))?;
    Ok(())
}

/// PUT /api/objectives/:id — save journey progress.
///
/// Requires membership and, while someone else holds the edit lock, fails
/// with 423 so two wizards never interleave saves.
pub async fn update_objective(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateObjectiveRequest>,
) -> Result<Json<ObjectiveDetailResponse>, ApiErr> {
    let conn = db.conn();
    let member = access::member_for_objective(&conn, &user, &id)?;

    if let LockView::Other { .. } = lock_view(&conn, &id, member) {
        return Err(ApiErr::locked(lock_holder_message(&conn, &id)));
    }

    if let Some(ref name) = req.name {
        let name = service::validate_name("objective", name).map_err(ApiErr::from)?;
        sq_execute(&conn, db::objectives::update_name(&id, &name))
            .map_err(ApiErr::from_db("update objective name"))?;
    }

    if let Some(step) = req.current_step {
        let step = service::validate_step(step).map_err(ApiErr::from)?;
        sq_execute(&conn, db::objectives::update_current_step(&id, step))
            .map_err(ApiErr::from_db("update current step"))?;
    }

    if let Some(ref date) = req.target_completion_date {
        sq_execute(&conn, db::objectives::update_target_completion_date(&id, date))
            .map_err(ApiErr::from_db("update target date"))?;
    }

    if let Some(is_archived) = req.is_archived {
        sq_execute(&conn, db::objectives::update_archived(&id, is_archived))
            .map_err(ApiErr::from_db("update archived"))?;
    }

    // Merge step answers per module
    if req.brainstorm_data.is_some() || req.choose_data.is_some() || req.objectives_data.is_some() {
        let (brainstorm, choose, objectives) = sq_query_row(
            &conn,
            db::objectives::get_step_data(&id),
            step_data_from_row,
        )
        .map_err(ApiErr::from_db("load step data"))?;

        if let Some(ref incoming) = req.brainstorm_data {
            merge_step_data(
                &conn,
                &id,
                JourneyModule::Brainstorm,
                db::Objectives::BrainstormData,
                &brainstorm,
                incoming,
            )?;
        }
        if let Some(ref incoming) = req.choose_data {
            merge_step_data(
                &conn,
                &id,
                JourneyModule::Choose,
                db::Objectives::ChooseData,
                &choose,
                incoming,
            )?;
        }
        if let Some(ref incoming) = req.objectives_data {
            merge_step_data(
                &conn,
                &id,
                JourneyModule::Objectives,
                db::Objectives::ObjectivesData,
                &objectives,
                incoming,
            )?;
        }
    }

    if let Some(status) = req.journey_status {
        sq_execute(
            &conn,
            db::objectives::update_journey_status(&id, status.as_str()),
        )
        .map_err(ApiErr::from_db("update journey status"))?;

        // Completing the journey stamps the completion date.
        if status == JourneyStatus::Complete {
            sq_execute(
                &conn,
                db::objectives::update_actual_completion_date(&id, &service::now_sqlite()),
            )
            .map_err(ApiErr::from_db("stamp completion date"))?;
        }
    }

    Ok(Json(load_detail(&conn, &id)?))
}

// ---------------------------------------------------------------------------
// Delete objective
// ---------------------------------------------------------------------------

/// DELETE /api/objectives/:id — delete an objective
/// (Account Owner/Manager only).
pub async fn delete_objective(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiErr> {
    let conn = db.conn();
    let member = access::member_for_objective(&conn, &user, &id)?;
    if !member.role.is_account_admin() {
        return Err(ApiErr::forbidden("account admin only"));
    }

    let affected = sq_execute(&conn, db::objectives::delete(&id))
        .map_err(ApiErr::from_db("delete objective"))?;
    if affected == 0 {
        return Err(ApiErr::not_found("objective not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Resume
// ---------------------------------------------------------------------------

/// GET /api/objectives/:id/resume — journey state plus lock status, used by
/// the wizard to restore itself.
pub async fn resume(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ResumeResponse>, ApiErr> {
    let conn = db.conn();
    let member = access::member_for_objective(&conn, &user, &id)?;

    let objective = load_detail(&conn, &id)?;
    let lock = lock_status(&conn, &id, member);

    Ok(Json(ResumeResponse { objective, lock }))
}

// ---------------------------------------------------------------------------
// Edit locks
// ---------------------------------------------------------------------------

/// Read the lock row (reaping expired rows first) and classify it.
fn lock_view(conn: &rusqlite::Connection, objective_id: &str, member: &MemberContext) -> LockView {
    let now = now_unix();
    let _ = sq_execute(conn, db::objectives::lock_reap(now));

    let row = sq_query_row(conn, db::objectives::lock_get(objective_id), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })
    .ok();

    lock::view(
        row.as_ref().map(|(holder, exp)| (holder.as_str(), (*exp).max(0) as u64)),
        &member.member_id,
        now,
    )
}

/// "<name> is editing this objective" for 423 responses.
fn lock_holder_message(conn: &rusqlite::Connection, objective_id: &str) -> String {
    let holder: Option<String> = sq_query_row(conn, db::objectives::lock_get(objective_id), |row| {
        row.get(0)
    })
    .ok();
    let name = holder
        .and_then(|member_id| {
            sq_query_row(conn, db::teams::member_display_name(&member_id), |row| {
                row.get::<_, String>(0)
            })
            .ok()
        })
        .unwrap_or_else(|| "another member".to_string());
    format!("{name} is editing this objective")
}

fn lock_status(
    conn: &rusqlite::Connection,
    objective_id: &str,
    member: &MemberContext,
) -> LockStatusResponse {
    match lock_view(conn, objective_id, member) {
        LockView::Free => LockStatusResponse {
            locked_by_me: false,
            locked_by_other: false,
            holder_member_id: None,
            holder_display_name: None,
            expires_at: None,
        },
        LockView::Mine => {
            let expires_at = sq_query_row(conn, db::objectives::lock_get(objective_id), |row| {
                row.get::<_, i64>(1)
            })
            .ok()
            .map(|e| e.max(0) as u64);
            LockStatusResponse {
                locked_by_me: true,
                locked_by_other: false,
                holder_member_id: Some(member.member_id.clone()),
                holder_display_name: None,
                expires_at,
            }
        }
        LockView::Other { expires_at } => {
            let holder_member_id =
                sq_query_row(conn, db::objectives::lock_get(objective_id), |row| {
                    row.get::<_, String>(0)
                })
                .ok();
            let holder_display_name = holder_member_id.as_deref().and_then(|member_id| {
                sq_query_row(conn, db::teams::member_display_name(member_id), |row| {
                    row.get::<_, String>(0)
                })
                .ok()
            });
            LockStatusResponse {
                locked_by_me: false,
                locked_by_other: true,
                holder_member_id,
                holder_display_name,
                expires_at: Some(expires_at),
            }
        }
    }
}

/// POST /api/objectives/:id/lock — acquire or renew the edit lock.
///
/// Acquiring your own or an expired lock succeeds (heartbeat renew); a live
/// foreign lock fails with 423.
pub async fn acquire_lock(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<LockResponse>, ApiErr> {
    let conn = db.conn();
    let member = access::member_for_objective(&conn, &user, &id)?;

    if let LockView::Other { .. } = lock_view(&conn, &id, member) {
        return Err(ApiErr::locked(lock_holder_message(&conn, &id)));
    }

    let expires_at = lock::lock_expiry(now_unix());
    sq_execute(
        &conn,
        db::objectives::lock_upsert(&id, &member.member_id, expires_at),
    )
    .map_err(ApiErr::from_db("acquire lock"))?;

    Ok(Json(LockResponse {
        acquired: true,
        expires_at,
    }))
}

/// DELETE /api/objectives/:id/lock — release your own lock. Releasing a
/// foreign or absent lock is a no-op.
pub async fn release_lock(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let conn = db.conn();
    let member = access::member_for_objective(&conn, &user, &id)?;

    let affected = sq_execute(
        &conn,
        db::objectives::lock_release(&id, &member.member_id),
    )
    .map_err(ApiErr::from_db("release lock"))?;

    Ok(Json(OkResponse { ok: affected > 0 }))
}
