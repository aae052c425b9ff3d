use axum::{extract::State, Json};

use arrowhead_api::{db, DialMineResponse, DialStateResponse, UpdateDialRequest};

use crate::error::ApiErr;
use crate::routes::auth::AuthUser;
use crate::storage::{sq_execute, sq_query_row, Db};

/// Load a member's dial state with the slot task titles resolved.
pub(crate) fn load_dial(
    conn: &rusqlite::Connection,
    member_id: &str,
) -> Option<DialStateResponse> {
    let mut state = sq_query_row(conn, db::dial::get_for_member(member_id), |row| {
        let selected: Option<String> = row.get(8)?;
        Ok(DialStateResponse {
            team_member_id: row.get(0)?,
            left_plan_id: row.get(1)?,
            left_column_index: row.get(2)?,
            left_text: row.get(3)?,
            left_task_title: None,
            is_left_private: row.get(4)?,
            right_plan_id: row.get(5)?,
            right_column_index: row.get(6)?,
            right_task_title: None,
            is_right_private: row.get(7)?,
            selected_slot: selected.and_then(|s| s.parse().ok()),
            updated_at: row.get(9)?,
        })
    })
    .ok()?;

    state.left_task_title = state.left_plan_id.as_deref().and_then(|plan_id| {
        sq_query_row(conn, db::dial::task_title_for_plan(plan_id, member_id), |row| {
            row.get::<_, String>(0)
        })
        .ok()
    });
    state.right_task_title = state.right_plan_id.as_deref().and_then(|plan_id| {
        sq_query_row(conn, db::dial::task_title_for_plan(plan_id, member_id), |row| {
            row.get::<_, String>(0)
        })
        .ok()
    });

    Some(state)
}

/// Verify a referenced plan belongs to the caller.
fn check_plan_ownership(
    conn: &rusqlite::Connection,
    member_id: &str,
    plan_id: Option<&str>,
    side: &str,
) -> Result<(), ApiErr> {
    if let Some(plan_id) = plan_id {
        sq_query_row(conn, db::rrgt::plan_owned(plan_id, member_id), |row| {
            row.get::<_, String>(0)
        })
        .map_err(|_| ApiErr::bad_request(format!("{side} plan does not belong to you")))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// My dial
// ---------------------------------------------------------------------------

/// GET /api/dial/mine — the caller's dial state, or null before first use.
pub async fn my_dial(
    State(db): State<Db>,
    user: AuthUser,
) -> Result<Json<DialMineResponse>, ApiErr> {
    let member = user.require_member()?;
    let conn = db.conn();

    Ok(Json(DialMineResponse {
        dial_state: load_dial(&conn, &member.member_id),
    }))
}

/// PUT /api/dial/mine — full-state dial replace; referenced plans must
/// belong to the caller.
pub async fn update_dial(
    State(db): State<Db>,
    user: AuthUser,
    Json(req): Json<UpdateDialRequest>,
) -> Result<Json<DialMineResponse>, ApiErr> {
    let member = user.require_member()?;
    let conn = db.conn();

    check_plan_ownership(&conn, &member.member_id, req.left_plan_id.as_deref(), "left")?;
    check_plan_ownership(&conn, &member.member_id, req.right_plan_id.as_deref(), "right")?;

    sq_execute(
        &conn,
        db::dial::upsert(
            &member.member_id,
            req.left_plan_id.as_deref(),
            req.left_column_index,
            req.left_text.as_deref(),
            req.is_left_private,
            req.right_plan_id.as_deref(),
            req.right_column_index,
            req.is_right_private,
            req.selected_slot.map(|s| s.as_str()),
        ),
    )
    .map_err(ApiErr::from_db("upsert dial state"))?;

    Ok(Json(DialMineResponse {
        dial_state: load_dial(&conn, &member.member_id),
    }))
}
