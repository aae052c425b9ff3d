use anyhow::{ensure, Result};

use arrowhead_api::{AuthTokenResponse, LoginRequest, ProfileResponse};

use crate::client::TestContext;

/// Register then log in with the same credentials.
pub async fn register_then_login(ctx: &TestContext) -> Result<()> {
    let user = ctx.register_user().await?;

    let resp = ctx
        .post_json(
            "/auth/login",
            &LoginRequest {
                email: user.email.clone(),
                password: user.password.clone(),
            },
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let tokens: AuthTokenResponse = resp.json().await?;
    ensure!(tokens.user_id == user.user_id);
    ensure!(!tokens.access_token.is_empty());
    ensure!(tokens.expires_in > 0);
    Ok(())
}

/// Registering the same email twice → 409.
pub async fn register_duplicate_email_conflict(ctx: &TestContext) -> Result<()> {
    let user = ctx.register_user().await?;

    let resp = ctx
        .post_json(
            "/auth/register",
            &serde_json::json!({
                "email": user.email,
                "password": "anotherpass1",
                "display_name": "someone else",
            }),
        )
        .await?;
    ensure!(resp.status() == 409, "expected 409, got {}", resp.status());

    let body: serde_json::Value = resp.json().await?;
    ensure!(body["message"] == "Conflict");
    ensure!(body["error"].is_string());
    Ok(())
}

/// A wrong password → 401 with the generic message.
pub async fn login_wrong_password_rejected(ctx: &TestContext) -> Result<()> {
    let user = ctx.register_user().await?;

    let resp = ctx
        .post_json(
            "/auth/login",
            &LoginRequest {
                email: user.email.clone(),
                password: "definitely-wrong".into(),
            },
        )
        .await?;
    ensure!(resp.status() == 401, "expected 401, got {}", resp.status());
    Ok(())
}

/// Refreshing rotates: the new pair works, the old refresh token does not.
pub async fn refresh_rotates_tokens(ctx: &TestContext) -> Result<()> {
    let user = ctx.register_user().await?;

    let resp = ctx
        .post_json(
            "/auth/refresh",
            &serde_json::json!({ "refresh_token": user.refresh_token }),
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    let tokens: AuthTokenResponse = resp.json().await?;
    ensure!(tokens.refresh_token != user.refresh_token);

    // The consumed token must be rejected.
    let resp = ctx
        .post_json(
            "/auth/refresh",
            &serde_json::json!({ "refresh_token": user.refresh_token }),
        )
        .await?;
    ensure!(resp.status() == 401, "old refresh token must be invalid");
    Ok(())
}

/// Password change requires the current password and takes effect.
pub async fn change_password_requires_current(ctx: &TestContext) -> Result<()> {
    let user = ctx.register_user().await?;

    let resp = ctx
        .put_json_authed(
            "/auth/password",
            &user.access_token,
            &serde_json::json!({
                "current_password": "wrong-current",
                "new_password": "newpassword1",
            }),
        )
        .await?;
    ensure!(resp.status() == 401, "expected 401, got {}", resp.status());

    let resp = ctx
        .put_json_authed(
            "/auth/password",
            &user.access_token,
            &serde_json::json!({
                "current_password": user.password,
                "new_password": "newpassword1",
            }),
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let resp = ctx
        .post_json(
            "/auth/login",
            &LoginRequest {
                email: user.email.clone(),
                password: "newpassword1".into(),
            },
        )
        .await?;
    ensure!(resp.status() == 200, "new password must log in");
    Ok(())
}

/// Profile has no team before one exists, then reports role + member id.
pub async fn profile_reports_team_context(ctx: &TestContext) -> Result<()> {
    let user = ctx.register_user().await?;

    let profile: ProfileResponse = ctx
        .get_authed("/auth/profile", &user.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(profile.team.is_none(), "fresh user must have no team");

    let (owner, team_id) = ctx.setup_owner_with_team().await?;
    let profile: ProfileResponse = ctx
        .get_authed("/auth/profile", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let team = profile.team.expect("owner must have team context");
    ensure!(team.team_id == team_id);
    ensure!(team.role.as_str() == "Account Owner");
    ensure!(!team.team_member_id.is_empty());
    Ok(())
}
