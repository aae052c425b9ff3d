use anyhow::{anyhow, Result};
use serde::Serialize;
use uuid::Uuid;

use arrowhead_api::{
    AuthTokenResponse, CreateObjectiveRequest, CreateProjectRequest, CreateTeamRequest,
    ObjectiveResponse, ProfileResponse, ProjectResponse, RegisterRequest, TeamResponse,
};
use arrowhead_api_client::ApiClient;

/// Holds connection info for a test run.
pub struct TestContext {
    pub api: ApiClient,
}

/// A registered test user with credentials.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestContext {
    pub fn new(base_url: String) -> Self {
        Self {
            api: ApiClient::with_client(reqwest::Client::new(), &base_url),
        }
    }

    /// Build a full API URL from a path like `/health`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.api.base_url(), path)
    }

    // ── Raw request helpers ───────────────────────────────────────────────

    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        self.api.get_raw(path).await
    }

    pub async fn get_authed(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        self.api.get_with_auth(path, token).await
    }

    pub async fn post_authed(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        self.api.post_with_auth(path, token).await
    }

    pub async fn post_json(&self, path: &str, body: &impl Serialize) -> Result<reqwest::Response> {
        self.api.post_json_raw(path, body).await
    }

    pub async fn put_json(&self, path: &str, body: &impl Serialize) -> Result<reqwest::Response> {
        self.api.put_json_raw(path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<reqwest::Response> {
        self.api.delete_raw(path).await
    }

    pub async fn post_json_authed(
        &self,
        path: &str,
        token: &str,
        body: &impl Serialize,
    ) -> Result<reqwest::Response> {
        self.api.post_json_with_auth(path, token, body).await
    }

    pub async fn put_json_authed(
        &self,
        path: &str,
        token: &str,
        body: &impl Serialize,
    ) -> Result<reqwest::Response> {
        self.api.put_json_with_auth(path, token, body).await
    }

    pub async fn delete_authed(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        self.api.delete_with_auth(path, token).await
    }

    // ── Fixtures ──────────────────────────────────────────────────────────

    /// Register a fresh user with a unique email and display name.
    pub async fn register_user(&self) -> Result<TestUser> {
        let id = Uuid::new_v4();
        let short = &id.to_string()[..8];
        let email = format!("e2e-{id}@e2e.local");
        let display_name = format!("e2e-{short}");
        let password = "testpass99".to_string();

        let resp = self
            .post_json(
                "/auth/register",
                &RegisterRequest {
                    email: email.clone(),
                    password: password.clone(),
                    display_name: display_name.clone(),
                },
            )
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("register failed ({status}): {body}"));
        }
        let tokens: AuthTokenResponse = resp.json().await?;

        Ok(TestUser {
            user_id: tokens.user_id,
            display_name: tokens.display_name,
            email,
            password,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Register a user and create a team. Returns (owner, team_id).
    pub async fn setup_owner_with_team(&self) -> Result<(TestUser, String)> {
        let user = self.register_user().await?;
        let short = &Uuid::new_v4().to_string()[..8];

        let resp = self
            .post_json_authed(
                "/teams",
                &user.access_token,
                &CreateTeamRequest {
                    name: format!("team-{short}"),
                    description: Some("e2e team".into()),
                },
            )
            .await?;
        let status = resp.status();
        if status.as_u16() != 201 {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("create team failed ({status}): {body}"));
        }
        let team: TeamResponse = resp.json().await?;
        Ok((user, team.id))
    }

    /// The caller's team_member_id, from the profile endpoint.
    pub async fn member_id(&self, user: &TestUser) -> Result<String> {
        let profile: ProfileResponse = self
            .get_authed("/auth/profile", &user.access_token)
            .await?
            .error_for_status()?
            .json()
            .await?;
        profile
            .team
            .map(|t| t.team_member_id)
            .ok_or_else(|| anyhow!("user has no team context"))
    }

    /// Owner + team + project. Returns (owner, team_id, project_id).
    pub async fn setup_project(&self) -> Result<(TestUser, String, String)> {
        let (owner, team_id) = self.setup_owner_with_team().await?;
        let short = &Uuid::new_v4().to_string()[..8];

        let resp = self
            .post_json_authed(
                &format!("/teams/{team_id}/projects"),
                &owner.access_token,
                &CreateProjectRequest {
                    name: format!("project-{short}"),
                    vision: None,
                    estimated_completion_date: None,
                },
            )
            .await?;
        let status = resp.status();
        if status.as_u16() != 201 {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("create project failed ({status}): {body}"));
        }
        let project: ProjectResponse = resp.json().await?;
        Ok((owner, team_id, project.id))
    }

    /// Owner + team + project + objective.
    /// Returns (owner, team_id, project_id, objective_id).
    pub async fn setup_objective(&self) -> Result<(TestUser, String, String, String)> {
        let (owner, team_id, project_id) = self.setup_project().await?;
        let short = &Uuid::new_v4().to_string()[..8];

        let resp = self
            .post_json_authed(
                &format!("/projects/{project_id}/objectives"),
                &owner.access_token,
                &CreateObjectiveRequest {
                    name: format!("objective-{short}"),
                    start_with_brainstorm: false,
                    target_date: None,
                },
            )
            .await?;
        let status = resp.status();
        if status.as_u16() != 201 {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("create objective failed ({status}): {body}"));
        }
        let objective: ObjectiveResponse = resp.json().await?;
        Ok((owner, team_id, project_id, objective.id))
    }

    /// Add a freshly registered user to a team as `role` (owner acts).
    /// Returns the new member's user and team_member_id.
    pub async fn add_team_member(
        &self,
        owner: &TestUser,
        team_id: &str,
        role: &str,
    ) -> Result<(TestUser, String)> {
        let user = self.register_user().await?;
        let resp = self
            .post_json_authed(
                &format!("/teams/{team_id}/members"),
                &owner.access_token,
                &serde_json::json!({ "email": user.email, "role": role }),
            )
            .await?;
        let status = resp.status();
        if status.as_u16() != 201 {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("add member failed ({status}): {body}"));
        }
        let member: serde_json::Value = resp.json().await?;
        let member_id = member["id"]
            .as_str()
            .ok_or_else(|| anyhow!("member response missing id"))?
            .to_string();
        Ok((user, member_id))
    }
}
