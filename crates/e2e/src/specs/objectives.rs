use anyhow::{ensure, Result};

use arrowhead_api::{CreateObjectiveRequest, ObjectiveDetailResponse, ObjectiveResponse, ResumeResponse};

use crate::client::TestContext;
use crate::fixtures;

/// Skipping Brainstorm/Choose starts the journey at step 11.
pub async fn create_skipping_brainstorm_starts_at_11(ctx: &TestContext) -> Result<()> {
    let (owner, _, project_id) = ctx.setup_project().await?;

    let resp = ctx
        .post_json_authed(
            &format!("/projects/{project_id}/objectives"),
            &owner.access_token,
            &CreateObjectiveRequest {
                name: format!("objective-{}", fixtures::short_id()),
                start_with_brainstorm: false,
                target_date: None,
            },
        )
        .await?;
    ensure!(resp.status() == 201);
    let objective: ObjectiveResponse = resp.json().await?;
    ensure!(objective.current_step == 11);
    ensure!(objective.journey_status.as_str() == "draft");
    Ok(())
}

/// Starting with Brainstorm begins at step 1.
pub async fn create_with_brainstorm_starts_at_1(ctx: &TestContext) -> Result<()> {
    let (owner, _, project_id) = ctx.setup_project().await?;

    let resp = ctx
        .post_json_authed(
            &format!("/projects/{project_id}/objectives"),
            &owner.access_token,
            &CreateObjectiveRequest {
                name: format!("objective-{}", fixtures::short_id()),
                start_with_brainstorm: true,
                target_date: None,
            },
        )
        .await?;
    ensure!(resp.status() == 201);
    let objective: ObjectiveResponse = resp.json().await?;
    ensure!(objective.current_step == 1);
    Ok(())
}

/// Partial saves merge per field: a later save of one field keeps others.
pub async fn step_save_merges_answers(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, _project_id, objective_id) = ctx.setup_objective().await?;

    let resp = ctx
        .put_json_authed(
            &format!("/objectives/{objective_id}"),
            &owner.access_token,
            &serde_json::json!({
                "objectives_data": {
                    "step1_objective": "win the market",
                    "step2_delegate": "alice owns research",
                },
                "current_step": 12,
            }),
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let resp = ctx
        .put_json_authed(
            &format!("/objectives/{objective_id}"),
            &owner.access_token,
            &serde_json::json!({
                "objectives_data": { "step2_delegate": "bob owns research" },
            }),
        )
        .await?;
    ensure!(resp.status() == 200);
    let detail: ObjectiveDetailResponse = resp.json().await?;
    ensure!(detail.objectives_data.get("step1_objective") == Some("win the market"));
    ensure!(detail.objectives_data.get("step2_delegate") == Some("bob owns research"));
    ensure!(detail.objective.current_step == 12);
    Ok(())
}

/// A field that belongs to no step of the module → 400.
pub async fn unknown_step_field_rejected(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, _project_id, objective_id) = ctx.setup_objective().await?;

    let resp = ctx
        .put_json_authed(
            &format!("/objectives/{objective_id}"),
            &owner.access_token,
            &serde_json::json!({
                "brainstorm_data": { "step1_scenarios": "wrong module" },
            }),
        )
        .await?;
    ensure!(resp.status() == 400, "expected 400, got {}", resp.status());
    Ok(())
}

/// journey_status=complete stamps actual_completion_date.
pub async fn completing_journey_stamps_date(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, _project_id, objective_id) = ctx.setup_objective().await?;

    let resp = ctx
        .put_json_authed(
            &format!("/objectives/{objective_id}"),
            &owner.access_token,
            &serde_json::json!({ "journey_status": "complete", "current_step": 17 }),
        )
        .await?;
    ensure!(resp.status() == 200);
    let detail: ObjectiveDetailResponse = resp.json().await?;
    ensure!(detail.objective.journey_status.as_str() == "complete");
    ensure!(detail.objective.actual_completion_date.is_some());
    Ok(())
}

/// A live lock blocks other members from locking and saving (423).
pub async fn lock_blocks_other_member(ctx: &TestContext) -> Result<()> {
    let (owner, team_id, _project_id, objective_id) = ctx.setup_objective().await?;
    let (member, _) = ctx.add_team_member(&owner, &team_id, "Team Member").await?;

    let resp = ctx
        .post_authed(&format!("/objectives/{objective_id}/lock"), &owner.access_token)
        .await?;
    ensure!(resp.status() == 200, "owner acquires lock");

    // Renewal by the holder succeeds.
    let resp = ctx
        .post_authed(&format!("/objectives/{objective_id}/lock"), &owner.access_token)
        .await?;
    ensure!(resp.status() == 200, "holder renews lock");

    let resp = ctx
        .post_authed(&format!("/objectives/{objective_id}/lock"), &member.access_token)
        .await?;
    ensure!(resp.status() == 423, "expected 423, got {}", resp.status());

    let resp = ctx
        .put_json_authed(
            &format!("/objectives/{objective_id}"),
            &member.access_token,
            &serde_json::json!({ "current_step": 13 }),
        )
        .await?;
    ensure!(resp.status() == 423, "saves blocked while locked");

    // Release, then the other member may take it.
    let resp = ctx
        .delete_authed(&format!("/objectives/{objective_id}/lock"), &owner.access_token)
        .await?;
    ensure!(resp.status() == 200);

    let resp = ctx
        .post_authed(&format!("/objectives/{objective_id}/lock"), &member.access_token)
        .await?;
    ensure!(resp.status() == 200, "lock is free after release");
    Ok(())
}

/// Resume reports who holds the lock.
pub async fn resume_reports_lock_state(ctx: &TestContext) -> Result<()> {
    let (owner, team_id, _project_id, objective_id) = ctx.setup_objective().await?;
    let (member, _) = ctx.add_team_member(&owner, &team_id, "Team Member").await?;

    let resume: ResumeResponse = ctx
        .get_authed(&format!("/objectives/{objective_id}/resume"), &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(!resume.lock.locked_by_me && !resume.lock.locked_by_other);

    let resp = ctx
        .post_authed(&format!("/objectives/{objective_id}/lock"), &owner.access_token)
        .await?;
    ensure!(resp.status() == 200);

    let resume: ResumeResponse = ctx
        .get_authed(&format!("/objectives/{objective_id}/resume"), &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(resume.lock.locked_by_me);
    ensure!(resume.lock.expires_at.is_some());

    let resume: ResumeResponse = ctx
        .get_authed(&format!("/objectives/{objective_id}/resume"), &member.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(resume.lock.locked_by_other);
    ensure!(resume.lock.holder_display_name.is_some());
    Ok(())
}
