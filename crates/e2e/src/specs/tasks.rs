use anyhow::{ensure, Result};

use arrowhead_api::{ListTasksResponse, TaskResponse};

use crate::client::TestContext;
use crate::fixtures;

/// Tasks append at the end of the objective's sort order.
pub async fn create_and_list_in_order(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, _project_id, objective_id) = ctx.setup_objective().await?;

    for title in ["first", "second", "third"] {
        let resp = ctx
            .post_json_authed(
                &format!("/objectives/{objective_id}/tasks"),
                &owner.access_token,
                &fixtures::task(title),
            )
            .await?;
        ensure!(resp.status() == 201, "expected 201, got {}", resp.status());
    }

    let listed: ListTasksResponse = ctx
        .get_authed(&format!("/objectives/{objective_id}/tasks"), &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let titles: Vec<&str> = listed.tasks.iter().map(|t| t.title.as_str()).collect();
    ensure!(titles == vec!["first", "second", "third"]);
    ensure!(listed.tasks[0].status.as_str() == "todo");
    Ok(())
}

/// PUT /tasks/reorder persists the submitted order.
pub async fn reorder_persists_new_order(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, _project_id, objective_id) = ctx.setup_objective().await?;

    let mut ids = Vec::new();
    for title in ["a", "b", "c"] {
        let task: TaskResponse = ctx
            .post_json_authed(
                &format!("/objectives/{objective_id}/tasks"),
                &owner.access_token,
                &fixtures::task(title),
            )
            .await?
            .error_for_status()?
            .json()
            .await?;
        ids.push(task.id);
    }

    let reversed: Vec<&String> = ids.iter().rev().collect();
    let resp = ctx
        .put_json_authed(
            &format!("/objectives/{objective_id}/tasks/reorder"),
            &owner.access_token,
            &serde_json::json!({ "task_ids": reversed }),
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let listed: ListTasksResponse = ctx
        .get_authed(&format!("/objectives/{objective_id}/tasks"), &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    let titles: Vec<&str> = listed.tasks.iter().map(|t| t.title.as_str()).collect();
    ensure!(titles == vec!["c", "b", "a"]);
    Ok(())
}

/// Reorder with a wrong id set → 400.
pub async fn reorder_rejects_mismatched_ids(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, _project_id, objective_id) = ctx.setup_objective().await?;

    let task: TaskResponse = ctx
        .post_json_authed(
            &format!("/objectives/{objective_id}/tasks"),
            &owner.access_token,
            &fixtures::task("only"),
        )
        .await?
        .error_for_status()?
        .json()
        .await?;

    let resp = ctx
        .put_json_authed(
            &format!("/objectives/{objective_id}/tasks/reorder"),
            &owner.access_token,
            &serde_json::json!({ "task_ids": [task.id, "not-a-task"] }),
        )
        .await?;
    ensure!(resp.status() == 400, "expected 400, got {}", resp.status());
    Ok(())
}

/// assigned_member_ids replaces the whole assignment set.
pub async fn assignments_replace_as_a_set(ctx: &TestContext) -> Result<()> {
    let (owner, team_id, _project_id, objective_id) = ctx.setup_objective().await?;
    let owner_member = ctx.member_id(&owner).await?;
    let (_user, other_member) = ctx.add_team_member(&owner, &team_id, "Team Member").await?;

    let task: TaskResponse = ctx
        .post_json_authed(
            &format!("/objectives/{objective_id}/tasks"),
            &owner.access_token,
            &serde_json::json!({
                "title": "shared work",
                "assigned_member_ids": [owner_member],
            }),
        )
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(task.assigned_members.len() == 1);

    let task: TaskResponse = ctx
        .put_json_authed(
            &format!("/tasks/{}", task.id),
            &owner.access_token,
            &serde_json::json!({ "assigned_member_ids": [other_member] }),
        )
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(task.assigned_members.len() == 1);
    ensure!(task.assigned_members[0].team_member_id == other_member);

    // Assignees outside the team are rejected.
    let resp = ctx
        .put_json_authed(
            &format!("/tasks/{}", task.id),
            &owner.access_token,
            &serde_json::json!({ "assigned_member_ids": ["no-such-member"] }),
        )
        .await?;
    ensure!(resp.status() == 400, "expected 400, got {}", resp.status());
    Ok(())
}

/// DELETE /api/tasks/{id} → 204, then the task is gone.
pub async fn delete_task(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, _project_id, objective_id) = ctx.setup_objective().await?;

    let task: TaskResponse = ctx
        .post_json_authed(
            &format!("/objectives/{objective_id}/tasks"),
            &owner.access_token,
            &fixtures::task("doomed"),
        )
        .await?
        .error_for_status()?
        .json()
        .await?;

    let resp = ctx
        .delete_authed(&format!("/tasks/{}", task.id), &owner.access_token)
        .await?;
    ensure!(resp.status() == 204, "expected 204, got {}", resp.status());

    let listed: ListTasksResponse = ctx
        .get_authed(&format!("/objectives/{objective_id}/tasks"), &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(listed.tasks.is_empty());
    Ok(())
}
