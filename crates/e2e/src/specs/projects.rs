use anyhow::{ensure, Result};

use arrowhead_api::{CreateProjectRequest, ListProjectsResponse, ProjectResponse};

use crate::client::TestContext;
use crate::fixtures;

/// POST /api/teams/{id}/projects → 201 with defaults.
pub async fn create_project(ctx: &TestContext) -> Result<()> {
    let (owner, team_id) = ctx.setup_owner_with_team().await?;
    let name = format!("project-{}", fixtures::short_id());

    let resp = ctx
        .post_json_authed(
            &format!("/teams/{team_id}/projects"),
            &owner.access_token,
            &CreateProjectRequest {
                name: name.clone(),
                vision: Some("ship the thing".into()),
                estimated_completion_date: None,
            },
        )
        .await?;
    ensure!(resp.status() == 201, "expected 201, got {}", resp.status());
    let project: ProjectResponse = resp.json().await?;
    ensure!(project.name == name);
    ensure!(project.completion_status.as_str() == "not_started");
    ensure!(!project.is_archived);
    Ok(())
}

/// Duplicate name within a team → 409.
pub async fn duplicate_project_name_conflict(ctx: &TestContext) -> Result<()> {
    let (owner, team_id) = ctx.setup_owner_with_team().await?;
    let name = format!("project-{}", fixtures::short_id());
    let req = CreateProjectRequest {
        name,
        vision: None,
        estimated_completion_date: None,
    };

    let resp = ctx
        .post_json_authed(&format!("/teams/{team_id}/projects"), &owner.access_token, &req)
        .await?;
    ensure!(resp.status() == 201);

    let resp = ctx
        .post_json_authed(&format!("/teams/{team_id}/projects"), &owner.access_token, &req)
        .await?;
    ensure!(resp.status() == 409, "expected 409, got {}", resp.status());
    Ok(())
}

/// Archived projects only show up with include_archived=true.
pub async fn archived_projects_hidden_by_default(ctx: &TestContext) -> Result<()> {
    let (owner, team_id, project_id) = ctx.setup_project().await?;

    let resp = ctx
        .put_json_authed(
            &format!("/projects/{project_id}"),
            &owner.access_token,
            &serde_json::json!({ "is_archived": true }),
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());

    let listed: ListProjectsResponse = ctx
        .get_authed(&format!("/teams/{team_id}/projects"), &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(listed.projects.iter().all(|p| p.id != project_id));

    let listed: ListProjectsResponse = ctx
        .get_authed(
            &format!("/teams/{team_id}/projects?include_archived=true"),
            &owner.access_token,
        )
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(listed.projects.iter().any(|p| p.id == project_id));
    Ok(())
}

/// Plain Team Members cannot create projects → 403.
pub async fn team_member_cannot_create_project(ctx: &TestContext) -> Result<()> {
    let (owner, team_id) = ctx.setup_owner_with_team().await?;
    let (member, _) = ctx.add_team_member(&owner, &team_id, "Team Member").await?;

    let resp = ctx
        .post_json_authed(
            &format!("/teams/{team_id}/projects"),
            &member.access_token,
            &CreateProjectRequest {
                name: format!("project-{}", fixtures::short_id()),
                vision: None,
                estimated_completion_date: None,
            },
        )
        .await?;
    ensure!(resp.status() == 403, "expected 403, got {}", resp.status());
    Ok(())
}

/// PUT /api/projects/{id} updates fields and bumps updated_at.
pub async fn update_project_fields(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id, project_id) = ctx.setup_project().await?;

    let resp = ctx
        .put_json_authed(
            &format!("/projects/{project_id}"),
            &owner.access_token,
            &serde_json::json!({
                "vision": "a clearer vision",
                "completion_status": "in_progress",
            }),
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    let project: ProjectResponse = resp.json().await?;
    ensure!(project.vision.as_deref() == Some("a clearer vision"));
    ensure!(project.completion_status.as_str() == "in_progress");
    Ok(())
}
