use anyhow::{ensure, Result};

use arrowhead_api::ListTouchbasesResponse;

use crate::client::TestContext;

/// Touchbases record per-objective history, newest first, with names.
pub async fn create_and_list_newest_first(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, _project_id, objective_id) = ctx.setup_objective().await?;

    for (date, blocker) in [
        ("2026-07-01 09:00:00", "waiting on legal"),
        ("2026-07-08 09:00:00", "none"),
    ] {
        let resp = ctx
            .post_json_authed(
                &format!("/objectives/{objective_id}/touchbases"),
                &owner.access_token,
                &serde_json::json!({
                    "touchbase_date": date,
                    "responses": { "progress": "on track", "blockers": blocker },
                }),
            )
            .await?;
        ensure!(resp.status() == 201, "expected 201, got {}", resp.status());
    }

    let listed: ListTouchbasesResponse = ctx
        .get_authed(
            &format!("/objectives/{objective_id}/touchbases"),
            &owner.access_token,
        )
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(listed.touchbases.len() == 2);
    ensure!(listed.touchbases[0].touchbase_date > listed.touchbases[1].touchbase_date);
    ensure!(listed.touchbases[0].team_member_name == owner.display_name);
    ensure!(
        listed.touchbases[0].responses.get("blockers").map(String::as_str) == Some("none")
    );
    Ok(())
}

/// Outsiders cannot read or write another team's touchbases.
pub async fn touchbases_require_membership(ctx: &TestContext) -> Result<()> {
    let (_owner, _team_id, _project_id, objective_id) = ctx.setup_objective().await?;
    let outsider = ctx.register_user().await?;

    let resp = ctx
        .get_authed(
            &format!("/objectives/{objective_id}/touchbases"),
            &outsider.access_token,
        )
        .await?;
    ensure!(resp.status() == 403, "expected 403, got {}", resp.status());

    let resp = ctx
        .post_json_authed(
            &format!("/objectives/{objective_id}/touchbases"),
            &outsider.access_token,
            &serde_json::json!({ "responses": { "progress": "?" } }),
        )
        .await?;
    ensure!(resp.status() == 403, "expected 403, got {}", resp.status());
    Ok(())
}
