use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use arrowhead_api::{
    crypto, db, service, AuthTokenResponse, ChangePasswordRequest, LoginRequest, LogoutRequest,
    OkResponse, ProfileResponse, RefreshRequest, RegisterRequest, TeamContext, TeamRole,
};

use crate::error::ApiErr;
use crate::storage::{sq_execute, sq_query_row, Db};
use crate::AppConfig;

/// Current Unix time in seconds.
pub fn now_unix() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

// ---------------------------------------------------------------------------
// Auth extractor
// ---------------------------------------------------------------------------

/// Team placement of an authenticated user.
#[derive(Debug, Clone)]
pub struct MemberContext {
    pub member_id: String,
    pub team_id: String,
    pub role: TeamRole,
}

/// Authenticated user extracted from the `Authorization: Bearer <JWT>`
/// header, with the team membership row (if any) pre-loaded.
pub struct AuthUser {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub member: Option<MemberContext>,
}

impl AuthUser {
    /// The caller's team context, or 403 for users who belong to no team.
    pub fn require_member(&self) -> Result<&MemberContext, ApiErr> {
        self.member
            .as_ref()
            .ok_or_else(|| ApiErr::forbidden("you are not a member of any team"))
    }

    /// The caller's team context, verified against a specific team.
    pub fn require_member_of(&self, team_id: &str) -> Result<&MemberContext, ApiErr> {
        let member = self.require_member()?;
        if member.team_id != team_id {
            return Err(ApiErr::forbidden("you are not a member of this team"));
        }
        Ok(member)
    }
}

fn unauthorized(detail: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"message": "Unauthorized", "error": detail})),
    )
        .into_response()
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Db: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = Db::from_ref(state);
        let config = AppConfig::from_ref(state);

        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("missing or invalid Authorization header"))?
            .to_string();

        let user_id = service::resolve_bearer(&token, &config.jwt_secret, now_unix())
            .map_err(|e| unauthorized(e.message()))?;

        let conn = db.conn();
        let (user_id, email, display_name, _created_at) =
            sq_query_row(&conn, db::users::get_by_id(&user_id), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|_| unauthorized("unknown user"))?;

        let member = sq_query_row(&conn, db::teams::member_for_user(&user_id), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .ok()
        .and_then(|(member_id, team_id, role)| {
            role.parse::<TeamRole>().ok().map(|role| MemberContext {
                member_id,
                team_id,
                role,
            })
        });

        Ok(AuthUser {
            user_id,
            display_name,
            email,
            member,
        })
    }
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

/// POST /api/auth/register — create an account and issue tokens.
pub async fn register(
    State(db): State<Db>,
    State(config): State<AppConfig>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthTokenResponse>), ApiErr> {
    let email = service::validate_email(&req.email).map_err(ApiErr::from)?;
    service::validate_password(&req.password).map_err(ApiErr::from)?;
    let display_name = service::validate_display_name(&req.display_name).map_err(ApiErr::from)?;

    let (password_hash, password_salt) =
        crypto::hash_password(&req.password).map_err(ApiErr::from)?;
    let user_id = Uuid::new_v4().to_string();

    let conn = db.conn();
    let result = sq_execute(
        &conn,
        db::users::insert(&user_id, &email, &display_name, &password_hash, &password_salt),
    );

    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            return Err(ApiErr::conflict("an account with this email already exists"));
        }
        Err(e) => {
            tracing::error!("register: {e}");
            return Err(ApiErr::internal("internal server error"));
        }
    }

    let tokens = issue_tokens(&conn, &config, &user_id, &display_name)?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// Issue an access/refresh token pair, persisting the refresh token hash.
fn issue_tokens(
    conn: &rusqlite::Connection,
    config: &AppConfig,
    user_id: &str,
    display_name: &str,
) -> Result<AuthTokenResponse, ApiErr> {
    let bundle =
        service::prepare_token_bundle(&config.jwt_secret, user_id, display_name, now_unix())
            .map_err(ApiErr::from)?;

    sq_execute(
        conn,
        db::users::insert_refresh_token(
            &bundle.token_id,
            user_id,
            &bundle.token_hash,
            &bundle.expires_at,
        ),
    )
    .map_err(ApiErr::from_db("insert refresh token"))?;

    Ok(bundle.response)
}

// ---------------------------------------------------------------------------
// Login / refresh / logout
// ---------------------------------------------------------------------------

/// POST /api/auth/login — verify credentials and issue tokens.
pub async fn login(
    State(db): State<Db>,
    State(config): State<AppConfig>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthTokenResponse>, ApiErr> {
    let email = service::validate_email(&req.email).map_err(ApiErr::from)?;

    let conn = db.conn();
    let row = sq_query_row(&conn, db::users::get_by_email_for_login(&email), |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    });

    let (user_id, display_name, hash, salt) = match row {
        Ok(r) => r,
        Err(_) => return Err(ApiErr::unauthorized("invalid email or password")),
    };

    if !crypto::verify_password(&req.password, &hash, &salt) {
        return Err(ApiErr::unauthorized("invalid email or password"));
    }

    let tokens = issue_tokens(&conn, &config, &user_id, &display_name)?;
    Ok(Json(tokens))
}

/// POST /api/auth/refresh — rotate a refresh token.
pub async fn refresh(
    State(db): State<Db>,
    State(config): State<AppConfig>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthTokenResponse>, ApiErr> {
    let token_hash = crypto::hash_token(&req.refresh_token);

    let conn = db.conn();
    let row = sq_query_row(&conn, db::users::lookup_refresh_token(&token_hash), |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    });

    let (token_id, user_id, expires_at, display_name) = match row {
        Ok(r) => r,
        Err(_) => return Err(ApiErr::unauthorized("invalid refresh token")),
    };

    if expires_at < service::now_sqlite() {
        let _ = sq_execute(&conn, db::users::delete_refresh_token_by_id(&token_id));
        return Err(ApiErr::unauthorized("refresh token expired"));
    }

    // Rotate: the old token is single-use.
    sq_execute(&conn, db::users::delete_refresh_token_by_id(&token_id))
        .map_err(ApiErr::from_db("rotate refresh token"))?;

    let tokens = issue_tokens(&conn, &config, &user_id, &display_name)?;
    Ok(Json(tokens))
}

/// POST /api/auth/logout — invalidate a refresh token (idempotent).
pub async fn logout(
    State(db): State<Db>,
    _user: AuthUser,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<OkResponse>, ApiErr> {
    let token_hash = crypto::hash_token(&req.refresh_token);
    let conn = db.conn();
    let _ = sq_execute(&conn, db::users::delete_refresh_token(&token_hash));
    Ok(Json(OkResponse { ok: true }))
}

// ---------------------------------------------------------------------------
// Change password
// ---------------------------------------------------------------------------

/// PUT /api/auth/password — change password after verifying the current one.
pub async fn change_password(
    State(db): State<Db>,
    user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<OkResponse>, ApiErr> {
    service::validate_password(&req.new_password).map_err(ApiErr::from)?;

    let conn = db.conn();
    let (hash, salt) = sq_query_row(
        &conn,
        db::users::get_password_fields(&user.user_id),
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
    )
    .map_err(ApiErr::from_db("load password fields"))?;

    if !crypto::verify_password(&req.current_password, &hash, &salt) {
        return Err(ApiErr::unauthorized("current password is incorrect"));
    }

    let (new_hash, new_salt) = crypto::hash_password(&req.new_password).map_err(ApiErr::from)?;
    sq_execute(
        &conn,
        db::users::update_password(&user.user_id, &new_hash, &new_salt),
    )
    .map_err(ApiErr::from_db("update password"))?;

    Ok(Json(OkResponse { ok: true }))
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// GET /api/auth/profile — user identity plus team context.
pub async fn profile(State(db): State<Db>, user: AuthUser) -> Result<Json<ProfileResponse>, ApiErr> {
    let conn = db.conn();
    let created_at: String = sq_query_row(&conn, db::users::get_by_id(&user.user_id), |row| {
        row.get(3)
    })
    .map_err(ApiErr::from_db("load user"))?;

    Ok(Json(ProfileResponse {
        user_id: user.user_id,
        email: user.email,
        display_name: user.display_name,
        created_at,
        team: user.member.map(|m| TeamContext {
            team_id: m.team_id,
            team_member_id: m.member_id,
            role: m.role,
        }),
    }))
}
