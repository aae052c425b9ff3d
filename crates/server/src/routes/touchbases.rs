use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use arrowhead_api::{
    db, service, CreateTouchbaseRequest, ListTouchbasesResponse, TouchbaseResponse,
};

use crate::error::ApiErr;
use crate::routes::access;
use crate::routes::auth::AuthUser;
use crate::storage::{sq_execute, sq_query_map, touchbase_from_row, Db};

/// GET /api/objectives/:id/touchbases — touchbase history, newest first
/// (members only).
pub async fn list_touchbases(
    State(db): State<Db>,
    user: AuthUser,
    Path(objective_id): Path<String>,
) -> Result<Json<ListTouchbasesResponse>, ApiErr> {
    let conn = db.conn();
    access::member_for_objective(&conn, &user, &objective_id)?;

    let touchbases = sq_query_map(
        &conn,
        db::touchbases::list_for_objective(&objective_id),
        touchbase_from_row,
    )
    .map_err(ApiErr::from_db("list touchbases"))?;

    Ok(Json(ListTouchbasesResponse { touchbases }))
}

/// POST /api/objectives/:id/touchbases — record a touchbase (members only).
pub async fn create_touchbase(
    State(db): State<Db>,
    user: AuthUser,
    Path(objective_id): Path<String>,
    Json(req): Json<CreateTouchbaseRequest>,
) -> Result<(StatusCode, Json<TouchbaseResponse>), ApiErr> {
    let conn = db.conn();
    let member = access::member_for_objective(&conn, &user, &objective_id)?;

    let touchbase_date = req.touchbase_date.unwrap_or_else(service::now_sqlite);
    let responses_json = serde_json::to_string(&req.responses)
        .map_err(|e| ApiErr::internal(format!("serialize responses: {e}")))?;

    let id = Uuid::new_v4().to_string();
    sq_execute(
        &conn,
        db::touchbases::insert(
            &id,
            &objective_id,
            &member.member_id,
            &touchbase_date,
            &responses_json,
        ),
    )
    .map_err(|e| {
        tracing::error!("create touchbase: {e}");
        ApiErr::internal("failed to record touchbase")
    })?;

    let touchbases = sq_query_map(
        &conn,
        db::touchbases::list_for_objective(&objective_id),
        touchbase_from_row,
    )
    .map_err(ApiErr::from_db("reload touchbases"))?;
    let created = touchbases
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| ApiErr::internal("failed to load recorded touchbase"))?;

    Ok((StatusCode::CREATED, Json(created)))
}
