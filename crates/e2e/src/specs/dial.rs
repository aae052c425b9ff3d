use anyhow::{anyhow, ensure, Result};

use arrowhead_api::{DialMineResponse, ListPlansResponse, MemberRrgtResponse, TaskResponse};

use crate::client::{TestContext, TestUser};
use crate::fixtures;

/// An owner with a provisioned plan. Returns (owner, team_id, plan_id).
async fn setup_plan(ctx: &TestContext) -> Result<(TestUser, String, String)> {
    let (owner, team_id, _project_id, objective_id) = ctx.setup_objective().await?;
    let owner_member = ctx.member_id(&owner).await?;

    let _task: TaskResponse = ctx
        .post_json_authed(
            &format!("/objectives/{objective_id}/tasks"),
            &owner.access_token,
            &serde_json::json!({
                "title": format!("task-{}", fixtures::short_id()),
                "assigned_member_ids": [owner_member],
            }),
        )
        .await?
        .error_for_status()?
        .json()
        .await?;

    let mine: ListPlansResponse = ctx
        .get_authed("/rrgt/mine", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let plan_id = mine
        .plans
        .first()
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow!("no plan provisioned"))?;

    Ok((owner, team_id, plan_id))
}

/// Dial starts null, PUT persists, GET echoes with the task title resolved.
pub async fn dial_round_trips(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, plan_id) = setup_plan(ctx).await?;

    let mine: DialMineResponse = ctx
        .get_authed("/dial/mine", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(mine.dial_state.is_none(), "dial must start empty");

    let resp = ctx
        .put_json_authed(
            "/dial/mine",
            &owner.access_token,
            &serde_json::json!({
                "left_plan_id": plan_id,
                "left_column_index": 2,
                "left_text": "focus item",
                "selected_slot": "left",
            }),
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let mine: DialMineResponse = ctx
        .get_authed("/dial/mine", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let state = mine.dial_state.ok_or_else(|| anyhow!("dial missing"))?;
    ensure!(state.left_plan_id.as_deref() == Some(plan_id.as_str()));
    ensure!(state.left_column_index == Some(2));
    ensure!(state.left_task_title.is_some(), "task title must resolve");
    ensure!(state.selected_slot.map(|s| s.as_str()) == Some("left"));
    ensure!(state.right_plan_id.is_none());
    Ok(())
}

/// Pinning a plan that belongs to someone else → 400.
pub async fn dial_rejects_foreign_plan(ctx: &TestContext) -> Result<()> {
    let (_owner_a, _team_a, plan_a) = setup_plan(ctx).await?;
    let (owner_b, _team_b, _plan_b) = setup_plan(ctx).await?;

    let resp = ctx
        .put_json_authed(
            "/dial/mine",
            &owner_b.access_token,
            &serde_json::json!({ "left_plan_id": plan_a, "left_column_index": 1 }),
        )
        .await?;
    ensure!(resp.status() == 400, "expected 400, got {}", resp.status());
    Ok(())
}

/// Private slots are blanked in the manager god-view but not for the owner.
pub async fn privacy_blanks_god_view(ctx: &TestContext) -> Result<()> {
    let (owner, team_id, plan_id) = setup_plan(ctx).await?;
    let owner_member = ctx.member_id(&owner).await?;
    // A second Account Manager to look at the owner's dial.
    let (manager, _) = ctx
        .add_team_member(&owner, &team_id, "Account Manager")
        .await?;

    let resp = ctx
        .put_json_authed(
            "/dial/mine",
            &owner.access_token,
            &serde_json::json!({
                "left_plan_id": plan_id,
                "left_column_index": 1,
                "left_text": "secret side project",
                "is_left_private": true,
            }),
        )
        .await?;
    ensure!(resp.status() == 200);

    // The owner still sees their own text.
    let mine: DialMineResponse = ctx
        .get_authed("/dial/mine", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let state = mine.dial_state.ok_or_else(|| anyhow!("dial missing"))?;
    ensure!(state.left_text.as_deref() == Some("secret side project"));

    // The manager's god-view gets the blanked version.
    let view: MemberRrgtResponse = ctx
        .get_authed(&format!("/rrgt/{owner_member}"), &manager.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let dial = view.dial_state.ok_or_else(|| anyhow!("dial missing"))?;
    ensure!(dial.is_left_private);
    ensure!(dial.left_text.is_none(), "private text must be blanked");
    ensure!(dial.left_task_title.is_none(), "private title must be blanked");
    Ok(())
}
