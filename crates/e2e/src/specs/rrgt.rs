use anyhow::{anyhow, ensure, Result};

use arrowhead_api::{ListPlansResponse, TaskResponse};

use crate::client::{TestContext, TestUser};
use crate::fixtures;

/// Create an objective plus a task assigned to the owner.
/// Returns (owner, team_id, objective_id, task_id).
async fn setup_assigned_task(ctx: &TestContext) -> Result<(TestUser, String, String, String)> {
    let (owner, team_id, _project_id, objective_id) = ctx.setup_objective().await?;
    let owner_member = ctx.member_id(&owner).await?;

    let task: TaskResponse = ctx
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

    Ok((owner, team_id, objective_id, task.id))
}

/// GET /api/rrgt/mine provisions a plan per assigned task: rabbit at the
/// Start column, empty subtask cells 1-5.
pub async fn mine_provisions_plans_for_assigned_tasks(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, _objective_id, task_id) = setup_assigned_task(ctx).await?;

    let mine: ListPlansResponse = ctx
        .get_authed("/rrgt/mine", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(mine.total == 1);
    let plan = &mine.plans[0];
    ensure!(plan.task_id == task_id);
    ensure!(plan.max_column_index == 6);
    let rabbit = plan.rabbit.as_ref().ok_or_else(|| anyhow!("no rabbit"))?;
    ensure!(rabbit.current_column_index == 0);
    ensure!(plan.subtasks.len() == 5);
    ensure!(plan.subtasks.iter().map(|s| s.column_index).eq(1..=5));

    // A second fetch must not provision duplicates.
    let again: ListPlansResponse = ctx
        .get_authed("/rrgt/mine", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(again.total == 1);
    Ok(())
}

/// Rabbit moves within 0..=max_column_index; out-of-range → 400.
pub async fn rabbit_moves_within_range(ctx: &TestContext) -> Result<()> {
    let (owner, ..) = setup_assigned_task(ctx).await?;

    let mine: ListPlansResponse = ctx
        .get_authed("/rrgt/mine", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let plan_id = &mine.plans[0].id;

    let resp = ctx
        .put_json_authed(
            &format!("/rrgt/plans/{plan_id}/rabbit"),
            &owner.access_token,
            &serde_json::json!({ "column_index": 3 }),
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    let rabbit: serde_json::Value = resp.json().await?;
    ensure!(rabbit["current_column_index"] == 3);

    let resp = ctx
        .put_json_authed(
            &format!("/rrgt/plans/{plan_id}/rabbit"),
            &owner.access_token,
            &serde_json::json!({ "column_index": 7 }),
        )
        .await?;
    ensure!(resp.status() == 400, "expected 400, got {}", resp.status());
    Ok(())
}

/// Subtask cells upsert: write, overwrite, read back in the grid.
pub async fn subtask_cell_upserts(ctx: &TestContext) -> Result<()> {
    let (owner, ..) = setup_assigned_task(ctx).await?;

    let mine: ListPlansResponse = ctx
        .get_authed("/rrgt/mine", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let plan_id = mine.plans[0].id.clone();

    for text in ["draft outline", "final outline"] {
        let resp = ctx
            .put_json_authed(
                &format!("/rrgt/plans/{plan_id}/subtasks"),
                &owner.access_token,
                &serde_json::json!({ "column_index": 2, "text": text }),
            )
            .await?;
        ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    }

    let mine: ListPlansResponse = ctx
        .get_authed("/rrgt/mine", &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let cell = mine.plans[0]
        .subtasks
        .iter()
        .find(|s| s.column_index == 2)
        .ok_or_else(|| anyhow!("cell missing"))?;
    ensure!(cell.text.as_deref() == Some("final outline"));
    Ok(())
}

/// GET /api/rrgt/{member_id} is restricted to Account Owner/Manager.
pub async fn god_view_requires_account_admin(ctx: &TestContext) -> Result<()> {
    let (owner, team_id, ..) = setup_assigned_task(ctx).await?;
    let owner_member = ctx.member_id(&owner).await?;
    let (member, member_member_id) =
        ctx.add_team_member(&owner, &team_id, "Team Member").await?;

    let resp = ctx
        .get_authed(&format!("/rrgt/{owner_member}"), &member.access_token)
        .await?;
    ensure!(resp.status() == 403, "expected 403, got {}", resp.status());

    let resp = ctx
        .get_authed(&format!("/rrgt/{member_member_id}"), &owner.access_token)
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    Ok(())
}
