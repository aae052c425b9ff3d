use anyhow::{ensure, Result};

use arrowhead_api::{CreateTeamRequest, ListMembersResponse, TeamResponse, UpdateTeamRequest};

use crate::client::TestContext;
use crate::fixtures;

/// POST /api/teams → 201; creator is the Account Owner member.
pub async fn create_team_makes_creator_owner(ctx: &TestContext) -> Result<()> {
    let user = ctx.register_user().await?;
    let name = format!("team-{}", fixtures::short_id());

    let resp = ctx
        .post_json_authed(
            "/teams",
            &user.access_token,
            &CreateTeamRequest {
                name: name.clone(),
                description: None,
            },
        )
        .await?;
    ensure!(resp.status() == 201, "expected 201, got {}", resp.status());
    let team: TeamResponse = resp.json().await?;
    ensure!(team.name == name);
    ensure!(team.created_by == user.user_id);

    let members: ListMembersResponse = ctx
        .get_authed(&format!("/teams/{}/members", team.id), &user.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(members.members.len() == 1);
    ensure!(members.members[0].role.as_str() == "Account Owner");
    ensure!(members.members[0].user_id == user.user_id);
    Ok(())
}

/// A user already in a team cannot create another → 409.
pub async fn second_team_is_conflict(ctx: &TestContext) -> Result<()> {
    let (owner, _team_id) = ctx.setup_owner_with_team().await?;

    let resp = ctx
        .post_json_authed(
            "/teams",
            &owner.access_token,
            &CreateTeamRequest {
                name: format!("team-{}", fixtures::short_id()),
                description: None,
            },
        )
        .await?;
    ensure!(resp.status() == 409, "expected 409, got {}", resp.status());
    Ok(())
}

/// GET /api/teams/{id} → detail with member_count; non-members get 403.
pub async fn get_team_detail_counts_members(ctx: &TestContext) -> Result<()> {
    let (owner, team_id) = ctx.setup_owner_with_team().await?;

    let resp = ctx
        .get_authed(&format!("/teams/{team_id}"), &owner.access_token)
        .await?;
    ensure!(resp.status() == 200);
    let detail: serde_json::Value = resp.json().await?;
    ensure!(detail["member_count"] == 1);

    let outsider = ctx.register_user().await?;
    let resp = ctx
        .get_authed(&format!("/teams/{team_id}"), &outsider.access_token)
        .await?;
    ensure!(resp.status() == 403, "outsider must get 403");
    Ok(())
}

/// PUT /api/teams/{id} is admin-gated.
pub async fn update_team_requires_account_admin(ctx: &TestContext) -> Result<()> {
    let (owner, team_id) = ctx.setup_owner_with_team().await?;
    let (member, _member_id) = ctx.add_team_member(&owner, &team_id, "Team Member").await?;

    let resp = ctx
        .put_json_authed(
            &format!("/teams/{team_id}"),
            &member.access_token,
            &UpdateTeamRequest {
                name: Some("renamed".into()),
                description: None,
            },
        )
        .await?;
    ensure!(resp.status() == 403, "expected 403, got {}", resp.status());

    let resp = ctx
        .put_json_authed(
            &format!("/teams/{team_id}"),
            &owner.access_token,
            &UpdateTeamRequest {
                name: Some(format!("renamed-{}", fixtures::short_id())),
                description: Some("updated".into()),
            },
        )
        .await?;
    ensure!(resp.status() == 200, "expected 200, got {}", resp.status());
    Ok(())
}

/// POST /api/teams/{id}/members adds an existing account by email.
pub async fn add_member_by_email(ctx: &TestContext) -> Result<()> {
    let (owner, team_id) = ctx.setup_owner_with_team().await?;
    let (added, _member_id) = ctx
        .add_team_member(&owner, &team_id, "Project Owner")
        .await?;

    let members: ListMembersResponse = ctx
        .get_authed(&format!("/teams/{team_id}/members"), &owner.access_token)
        .await?
        .error_for_status()?
        .json()
        .await?;
    ensure!(members.members.len() == 2);
    ensure!(members
        .members
        .iter()
        .any(|m| m.user_id == added.user_id && m.role.as_str() == "Project Owner"));

    // A user in a team cannot be added again.
    let resp = ctx
        .post_json_authed(
            &format!("/teams/{team_id}/members"),
            &owner.access_token,
            &serde_json::json!({ "email": added.email }),
        )
        .await?;
    ensure!(resp.status() == 409, "expected 409, got {}", resp.status());
    Ok(())
}

/// The last Account Owner can be neither removed nor demoted.
pub async fn last_owner_cannot_be_removed(ctx: &TestContext) -> Result<()> {
    let (owner, team_id) = ctx.setup_owner_with_team().await?;
    let owner_member_id = ctx.member_id(&owner).await?;

    let resp = ctx
        .delete_authed(
            &format!("/teams/{team_id}/members/{owner_member_id}"),
            &owner.access_token,
        )
        .await?;
    ensure!(resp.status() == 409, "expected 409, got {}", resp.status());

    let resp = ctx
        .put_json_authed(
            &format!("/teams/{team_id}/members/{owner_member_id}"),
            &owner.access_token,
            &serde_json::json!({ "role": "Team Member" }),
        )
        .await?;
    ensure!(resp.status() == 409, "expected 409, got {}", resp.status());
    Ok(())
}
