use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use arrowhead_api::{
    db, service, AddMemberRequest, CreateTeamRequest, ListMembersResponse, MemberResponse,
    TeamDetailResponse, TeamResponse, TeamRole, UpdateMemberRequest, UpdateTeamRequest,
};

use crate::error::ApiErr;
use crate::routes::auth::AuthUser;
use crate::storage::{member_from_row, sq_execute, sq_query_map, sq_query_row, team_from_row, Db};

// ---------------------------------------------------------------------------
// Create team
// ---------------------------------------------------------------------------

/// POST /api/teams — create a new team. Creator becomes its Account Owner.
pub async fn create_team(
    State(db): State<Db>,
    user: AuthUser,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiErr> {
    if user.member.is_some() {
        return Err(ApiErr::conflict("you already belong to a team"));
    }
    let name = service::validate_name("team", &req.name).map_err(ApiErr::from)?;

    let team_id = Uuid::new_v4().to_string();
    let member_id = Uuid::new_v4().to_string();
    let conn = db.conn();

    sq_execute(
        &conn,
        db::teams::insert(&team_id, &name, req.description.as_deref(), &user.user_id),
    )
    .map_err(|e| {
        tracing::error!("create team: {e}");
        ApiErr::internal("failed to create team")
    })?;

    // Creator joins as Account Owner
    sq_execute(
        &conn,
        db::teams::member_insert(
            &member_id,
            &team_id,
            &user.user_id,
            TeamRole::AccountOwner.as_str(),
        ),
    )
    .map_err(|e| {
        tracing::error!("add creator as member: {e}");
        ApiErr::internal("failed to create team")
    })?;

    let team = sq_query_row(&conn, db::teams::get_by_id(&team_id), team_from_row)
        .map_err(ApiErr::from_db("load created team"))?;

    Ok((StatusCode::CREATED, Json(team)))
}

// ---------------------------------------------------------------------------
// Get team detail
// ---------------------------------------------------------------------------

/// GET /api/teams/:id — team info with member count (members only).
pub async fn get_team(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TeamDetailResponse>, ApiErr> {
    user.require_member_of(&id)?;
    let conn = db.conn();

    let team = sq_query_row(&conn, db::teams::get_by_id(&id), team_from_row)
        .map_err(|_| ApiErr::not_found("team not found"))?;

    let member_count: i64 = sq_query_row(&conn, db::teams::member_count(&id), |row| row.get(0))
        .unwrap_or(0);

    Ok(Json(TeamDetailResponse { team, member_count }))
}

// ---------------------------------------------------------------------------
// Update team
// ---------------------------------------------------------------------------

/// PUT /api/teams/:id — update name or description (Account Owner/Manager).
pub async fn update_team(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>, ApiErr> {
    let member = user.require_member_of(&id)?;
    if !member.role.is_account_admin() {
        return Err(ApiErr::forbidden("account admin only"));
    }

    let conn = db.conn();

    if let Some(ref name) = req.name {
        let name = service::validate_name("team", name).map_err(ApiErr::from)?;
        sq_execute(&conn, db::teams::update_name(&id, &name))
            .map_err(ApiErr::from_db("update team name"))?;
    }

    if let Some(ref desc) = req.description {
        sq_execute(&conn, db::teams::update_description(&id, desc))
            .map_err(ApiErr::from_db("update team description"))?;
    }

    let team = sq_query_row(&conn, db::teams::get_by_id(&id), team_from_row)
        .map_err(|_| ApiErr::not_found("team not found"))?;

    Ok(Json(team))
}

// ---------------------------------------------------------------------------
// List members
// ---------------------------------------------------------------------------

/// GET /api/teams/:id/members — list all members (members only).
pub async fn list_members(
    State(db): State<Db>,
    user: AuthUser,
    Path(team_id): Path<String>,
) -> Result<Json<ListMembersResponse>, ApiErr> {
    user.require_member_of(&team_id)?;
    let conn = db.conn();

    let members: Vec<MemberResponse> =
        sq_query_map(&conn, db::teams::member_list(&team_id), member_from_row)
            .map_err(ApiErr::from_db("list members"))?;

    Ok(Json(ListMembersResponse { members }))
}

// ---------------------------------------------------------------------------
// Add member (by email)
// ---------------------------------------------------------------------------

/// POST /api/teams/:id/members — add an existing user by email
/// (Account Owner/Manager only).
pub async fn add_member(
    State(db): State<Db>,
    user: AuthUser,
    Path(team_id): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiErr> {
    let member = user.require_member_of(&team_id)?;
    if !member.role.is_account_admin() {
        return Err(ApiErr::forbidden("account admin only"));
    }

    let email = service::validate_email(&req.email).map_err(ApiErr::from)?;
    let role = req.role.unwrap_or(TeamRole::TeamMember);

    let conn = db.conn();

    let (target_user_id, _display_name) =
        sq_query_row(&conn, db::users::get_id_by_email(&email), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|_| ApiErr::not_found("no account with this email"))?;

    let member_id = Uuid::new_v4().to_string();
    let result = sq_execute(
        &conn,
        db::teams::member_insert(&member_id, &team_id, &target_user_id, role.as_str()),
    );

    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            // Unique user_id: either already in this team or in another one.
            return Err(ApiErr::conflict("user already belongs to a team"));
        }
        Err(e) => {
            tracing::error!("add member: {e}");
            return Err(ApiErr::internal("failed to add member"));
        }
    }

    let members = sq_query_map(&conn, db::teams::member_list(&team_id), member_from_row)
        .map_err(ApiErr::from_db("reload members"))?;
    let added = members
        .into_iter()
        .find(|m| m.id == member_id)
        .ok_or_else(|| ApiErr::internal("failed to load added member"))?;

    Ok((StatusCode::CREATED, Json(added)))
}

// ---------------------------------------------------------------------------
// Update member role
// ---------------------------------------------------------------------------

/// How many Account Owners the team has.
fn owner_count(conn: &rusqlite::Connection, team_id: &str) -> i64 {
    sq_query_row(
        conn,
        db::teams::member_count_with_role(team_id, TeamRole::AccountOwner.as_str()),
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// PUT /api/teams/:id/members/:member_id — change a member's role
/// (Account Owner only).
pub async fn update_member(
    State(db): State<Db>,
    user: AuthUser,
    Path((team_id, member_id)): Path<(String, String)>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, ApiErr> {
    let member = user.require_member_of(&team_id)?;
    if member.role != TeamRole::AccountOwner {
        return Err(ApiErr::forbidden("account owner only"));
    }

    let conn = db.conn();

    let (_, target_team, _, current_role) =
        sq_query_row(&conn, db::teams::member_by_id(&member_id), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|_| ApiErr::not_found("member not found"))?;

    if target_team != team_id {
        return Err(ApiErr::not_found("member not found"));
    }

    // Never leave the team ownerless.
    if current_role == TeamRole::AccountOwner.as_str()
        && req.role != TeamRole::AccountOwner
        && owner_count(&conn, &team_id) <= 1
    {
        return Err(ApiErr::conflict("cannot demote the last account owner"));
    }

    sq_execute(
        &conn,
        db::teams::member_update_role(&team_id, &member_id, req.role.as_str()),
    )
    .map_err(ApiErr::from_db("update member role"))?;

    let members = sq_query_map(&conn, db::teams::member_list(&team_id), member_from_row)
        .map_err(ApiErr::from_db("reload members"))?;
    let updated = members
        .into_iter()
        .find(|m| m.id == member_id)
        .ok_or_else(|| ApiErr::internal("failed to load updated member"))?;

    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// Remove member
// ---------------------------------------------------------------------------

/// DELETE /api/teams/:id/members/:member_id — remove a member
/// (Account Owner/Manager only).
pub async fn remove_member(
    State(db): State<Db>,
    user: AuthUser,
    Path((team_id, member_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiErr> {
    let member = user.require_member_of(&team_id)?;
    if !member.role.is_account_admin() {
        return Err(ApiErr::forbidden("account admin only"));
    }

    let conn = db.conn();

    let (_, target_team, _, target_role) =
        sq_query_row(&conn, db::teams::member_by_id(&member_id), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|_| ApiErr::not_found("member not found"))?;

    if target_team != team_id {
        return Err(ApiErr::not_found("member not found"));
    }

    if target_role == TeamRole::AccountOwner.as_str() && owner_count(&conn, &team_id) <= 1 {
        return Err(ApiErr::conflict("cannot remove the last account owner"));
    }

    let affected = sq_execute(&conn, db::teams::member_delete(&team_id, &member_id))
        .map_err(|e| {
            tracing::error!("remove member: {e}");
            ApiErr::internal("failed to remove member")
        })?;

    if affected == 0 {
        return Err(ApiErr::not_found("member not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
